use std::collections::BTreeMap;

use nalgebra::{Matrix3, Vector3};
use tracing::debug;

use crate::config::NormalizeConfig;
use crate::joint::JointSnapshot;

/// 共通座標系に正規化された関節セット
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSet {
    pub joints: BTreeMap<String, Vector3<f32>>,
    /// 中心化に使った元スナップショットの重心
    pub centroid: Vector3<f32>,
    /// 正面・側面共通のスケール
    pub scale: f32,
}

impl NormalizedSet {
    pub fn get(&self, name: &str) -> Option<&Vector3<f32>> {
        self.joints.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    /// 2関節間のユークリッド距離。どちらかが無ければ None
    pub fn distance(&self, a: &str, b: &str) -> Option<f32> {
        let pa = self.joints.get(a)?;
        let pb = self.joints.get(b)?;
        Some((pa - pb).norm())
    }
}

/// 正面・側面の正規化結果（常にペアで生成）
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedPair {
    pub front: NormalizedSet,
    pub side: NormalizedSet,
}

/// 鉛直(Y)軸まわりの回転行列
///
/// x' = x·cosθ − z·sinθ, z' = x·sinθ + z·cosθ
#[rustfmt::skip]
pub fn vertical_rotation(theta: f32) -> Matrix3<f32> {
    let (s, c) = theta.sin_cos();
    Matrix3::new(
        c, 0.0, -s,
        0.0, 1.0, 0.0,
        s, 0.0, c,
    )
}

pub fn rotate_about_vertical(point: &Vector3<f32>, theta: f32) -> Vector3<f32> {
    vertical_rotation(theta) * point
}

/// 正面・側面スナップショットを共通座標系に揃える
///
/// 1. スナップショットごとの重心を引く
/// 2. 頭〜足の高さから求めたスケールを正面・側面で平均し、両方に同じ値を掛ける
/// 3. 側面のみ鉛直軸まわりに回転して正面と同じ向きにする
///
/// 関節が欠けていても失敗しない（空のセットになるだけ）
pub fn normalize(
    front: &JointSnapshot,
    side: &JointSnapshot,
    config: &NormalizeConfig,
) -> NormalizedPair {
    let front_scale = front.height_scale_estimate().unwrap_or(1.0);
    let side_scale = side.height_scale_estimate().unwrap_or(1.0);
    let scale = (front_scale + side_scale) / 2.0;

    debug!(
        front_joints = front.len(),
        side_joints = side.len(),
        front_scale,
        side_scale,
        scale,
        "normalizing capture pair"
    );

    let rotation = vertical_rotation(config.side_rotation_deg.to_radians());

    NormalizedPair {
        front: shift_and_scale(front, scale, None),
        side: shift_and_scale(side, scale, Some(&rotation)),
    }
}

fn shift_and_scale(
    snapshot: &JointSnapshot,
    scale: f32,
    rotation: Option<&Matrix3<f32>>,
) -> NormalizedSet {
    let centroid = snapshot.centroid();
    let joints = snapshot
        .iter()
        .map(|(name, p)| {
            let shifted = (p - centroid) * scale;
            let placed = match rotation {
                Some(r) => r * shifted,
                None => shifted,
            };
            (name.to_string(), placed)
        })
        .collect();

    NormalizedSet {
        joints,
        centroid,
        scale,
    }
}
