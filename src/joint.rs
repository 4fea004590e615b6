use std::collections::BTreeMap;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// トラッカーのスケルトン関節名
///
/// ボディトラッキングエンジンが出力する名前そのまま。
/// パイプラインが参照する関節のみ定義する。
pub mod names {
    pub const HEAD: &str = "head_joint";
    pub const NECK: &str = "neck_1_joint";
    pub const HIPS: &str = "hips_joint";
    pub const SPINE_1: &str = "spine_1_joint";
    pub const SPINE_4: &str = "spine_4_joint";
    pub const SPINE_7: &str = "spine_7_joint";

    pub const LEFT_SHOULDER: &str = "left_shoulder_1_joint";
    pub const RIGHT_SHOULDER: &str = "right_shoulder_1_joint";
    pub const LEFT_ARM: &str = "left_arm_joint";
    pub const RIGHT_ARM: &str = "right_arm_joint";
    pub const LEFT_FOREARM: &str = "left_forearm_joint";
    pub const RIGHT_FOREARM: &str = "right_forearm_joint";
    pub const LEFT_HAND: &str = "left_hand_joint";
    pub const RIGHT_HAND: &str = "right_hand_joint";

    pub const LEFT_UP_LEG: &str = "left_upLeg_joint";
    pub const RIGHT_UP_LEG: &str = "right_upLeg_joint";
    pub const LEFT_LEG: &str = "left_leg_joint";
    pub const RIGHT_LEG: &str = "right_leg_joint";
    pub const LEFT_FOOT: &str = "left_foot_joint";
    pub const RIGHT_FOOT: &str = "right_foot_joint";
}

/// 撮影の向き
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaptureView {
    Front,
    Side,
}

impl std::fmt::Display for CaptureView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaptureView::Front => write!(f, "front"),
            CaptureView::Side => write!(f, "side"),
        }
    }
}

/// 1回の撮影で得た関節スナップショット
///
/// 関節名 → トラッカーのローカル座標 (x, y, z)。
/// 信頼度の低い関節はトラッカーが出力しないため、キーは撮影ごとに異なりうる。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JointSnapshot {
    joints: BTreeMap<String, [f32; 3]>,
}

impl JointSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_joints<I, S>(joints: I) -> Self
    where
        I: IntoIterator<Item = (S, [f32; 3])>,
        S: Into<String>,
    {
        Self {
            joints: joints.into_iter().map(|(name, p)| (name.into(), p)).collect(),
        }
    }

    /// トラッカーの1フレームからスナップショットを作成
    ///
    /// 非有限値を含む関節は捨てる（重心計算が全関節に波及するため）
    pub fn from_tracker_frame<I, S>(frame: I) -> Self
    where
        I: IntoIterator<Item = (S, [f64; 3])>,
        S: Into<String>,
    {
        let mut joints = BTreeMap::new();
        for (name, p) in frame {
            let name = name.into();
            // f32 に収まらない値も inf になるのでキャスト後に判定
            let position = [p[0] as f32, p[1] as f32, p[2] as f32];
            if position.iter().all(|v| v.is_finite()) {
                joints.insert(name, position);
            } else {
                debug!(joint = %name, "non-finite joint position dropped");
            }
        }
        Self { joints }
    }

    pub fn with_joint(mut self, name: impl Into<String>, position: [f32; 3]) -> Self {
        self.joints.insert(name.into(), position);
        self
    }

    /// 名前で関節位置を取得
    pub fn get(&self, name: &str) -> Option<Vector3<f32>> {
        self.joints.get(name).map(|p| Vector3::from(*p))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.joints.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.joints.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Vector3<f32>)> {
        self.joints.iter().map(|(k, p)| (k.as_str(), Vector3::from(*p)))
    }

    /// 全関節の座標平均。空なら原点
    pub fn centroid(&self) -> Vector3<f32> {
        if self.joints.is_empty() {
            return Vector3::zeros();
        }
        let sum = self
            .joints
            .values()
            .fold(Vector3::zeros(), |acc, p| acc + Vector3::from(*p));
        sum / self.joints.len() as f32
    }

    /// 頭と足の縦方向距離の逆数からスケールを推定
    ///
    /// 足は left_foot → right_foot の順に探す。
    /// 頭か足が無い、または高さ差がゼロの場合は None
    pub fn height_scale_estimate(&self) -> Option<f32> {
        let head = self.get(names::HEAD)?;
        let foot = self
            .get(names::LEFT_FOOT)
            .or_else(|| self.get(names::RIGHT_FOOT))?;
        let dy = (head.y - foot.y).abs();
        if dy > 0.0 && dy.is_finite() {
            Some(1.0 / dy)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centroid_empty_is_origin() {
        let snap = JointSnapshot::new();
        assert_eq!(snap.centroid(), Vector3::zeros());
    }

    #[test]
    fn test_centroid_mean() {
        let snap = JointSnapshot::new()
            .with_joint("a", [0.0, 0.0, 0.0])
            .with_joint("b", [2.0, 4.0, -6.0]);
        assert_eq!(snap.centroid(), Vector3::new(1.0, 2.0, -3.0));
    }

    #[test]
    fn test_height_scale_prefers_left_foot() {
        let snap = JointSnapshot::new()
            .with_joint(names::HEAD, [0.0, 2.0, 0.0])
            .with_joint(names::LEFT_FOOT, [0.0, 0.0, 0.0])
            .with_joint(names::RIGHT_FOOT, [0.0, 1.0, 0.0]);
        assert_eq!(snap.height_scale_estimate(), Some(0.5));
    }

    #[test]
    fn test_height_scale_falls_back_to_right_foot() {
        let snap = JointSnapshot::new()
            .with_joint(names::HEAD, [0.0, 1.0, 0.0])
            .with_joint(names::RIGHT_FOOT, [0.0, -1.0, 0.0]);
        assert_eq!(snap.height_scale_estimate(), Some(0.5));
    }

    #[test]
    fn test_height_scale_missing_or_flat() {
        let no_foot = JointSnapshot::new().with_joint(names::HEAD, [0.0, 1.0, 0.0]);
        assert_eq!(no_foot.height_scale_estimate(), None);

        let flat = JointSnapshot::new()
            .with_joint(names::HEAD, [0.0, 1.0, 0.0])
            .with_joint(names::LEFT_FOOT, [0.5, 1.0, 0.0]);
        assert_eq!(flat.height_scale_estimate(), None);
    }

    #[test]
    fn test_from_tracker_frame_drops_non_finite() {
        let snap = JointSnapshot::from_tracker_frame(vec![
            ("head_joint", [0.0, 1.7, 0.1]),
            ("left_hand_joint", [f64::NAN, 1.0, 0.0]),
        ]);
        assert_eq!(snap.len(), 1);
        assert!(snap.contains("head_joint"));
        assert!(!snap.contains("left_hand_joint"));
    }

    #[test]
    fn test_from_tracker_frame_drops_f32_overflow() {
        let snap = JointSnapshot::from_tracker_frame(vec![
            ("head_joint", [0.0, 1.7, 0.0]),
            ("left_hand_joint", [1e40, 1.0, 0.0]),
        ]);
        assert_eq!(snap.len(), 1);
        assert!(!snap.contains("left_hand_joint"));
        let c = snap.centroid();
        assert!(c.iter().all(|v| v.is_finite()));
        assert_eq!(c, Vector3::new(0.0, 1.7, 0.0));
    }

    #[test]
    fn test_json_is_flat_object() {
        let snap = JointSnapshot::new().with_joint("head_joint", [0.0, 1.5, 0.0]);
        let json = serde_json::to_string(&snap).unwrap();
        assert_eq!(json, r#"{"head_joint":[0.0,1.5,0.0]}"#);
        let back: JointSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snap);
    }
}
