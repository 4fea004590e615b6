use tracing::info;

use crate::config::Config;
use crate::error::{MeasureError, SessionError};
use crate::joint::{CaptureView, JointSnapshot};
use crate::measure::{calibrate_to_height, derive_core, derive_extended, MeasurementReport};
use crate::normalize::{normalize, NormalizedPair};
use crate::vertex::{build_vertices, VertexCloud};

/// 1回の採寸フローの計算結果
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementOutcome {
    pub normalized: NormalizedPair,
    /// 可視化用
    pub vertices: VertexCloud,
    pub report: MeasurementReport,
}

/// 正面・側面スナップショットから採寸結果まで一括で計算
///
/// 正規化 → 頂点クラウド → コア採寸 → 拡張採寸 → 身長補正
pub fn run_pipeline(
    front: &JointSnapshot,
    side: &JointSnapshot,
    target_height_cm: f32,
    config: &Config,
) -> Result<MeasurementOutcome, MeasureError> {
    let normalized = normalize(front, side, &config.normalize);
    let vertices = build_vertices(&normalized, &config.vertex);

    let core = derive_core(&normalized, target_height_cm / 100.0, &config.measure)?;
    let extended = derive_extended(&normalized, &core);
    let report = calibrate_to_height(target_height_cm, &core, &extended, &config.measure)?;

    Ok(MeasurementOutcome {
        normalized,
        vertices,
        report,
    })
}

/// 撮影セッションの状態
///
/// 画面遷移をまたいで正面・側面の撮影結果と計算結果を保持する。
/// アプリ側が所有し、やり直し時は `reset` で明示的に破棄する
#[derive(Debug, Default)]
pub struct MeasurementSession {
    front: Option<JointSnapshot>,
    side: Option<JointSnapshot>,
    outcome: Option<MeasurementOutcome>,
}

impl MeasurementSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// 正面撮影を記録（撮り直しは上書き）。前回の計算結果は破棄
    pub fn capture_front(&mut self, snapshot: JointSnapshot) {
        info!(joints = snapshot.len(), "front pose captured");
        self.front = Some(snapshot);
        self.outcome = None;
    }

    pub fn capture_side(&mut self, snapshot: JointSnapshot) {
        info!(joints = snapshot.len(), "side pose captured");
        self.side = Some(snapshot);
        self.outcome = None;
    }

    pub fn front(&self) -> Option<&JointSnapshot> {
        self.front.as_ref()
    }

    pub fn side(&self) -> Option<&JointSnapshot> {
        self.side.as_ref()
    }

    /// 両方撮影済みか
    pub fn is_ready(&self) -> bool {
        self.front.is_some() && self.side.is_some()
    }

    pub fn results(&self) -> Option<&MeasurementOutcome> {
        self.outcome.as_ref()
    }

    /// 表示用の採寸結果。未計算なら空
    pub fn displayed(&self) -> Vec<(&'static str, f32)> {
        self.outcome
            .as_ref()
            .map(|o| o.report.displayed())
            .unwrap_or_default()
    }

    /// 撮影済みの2ポーズから採寸を計算して保持
    ///
    /// 失敗時は前回の結果も破棄する
    pub fn compute(
        &mut self,
        target_height_cm: f32,
        config: &Config,
    ) -> Result<&MeasurementOutcome, SessionError> {
        self.outcome = None;
        let front = self
            .front
            .as_ref()
            .ok_or(SessionError::MissingCapture(CaptureView::Front))?;
        let side = self
            .side
            .as_ref()
            .ok_or(SessionError::MissingCapture(CaptureView::Side))?;

        let outcome = run_pipeline(front, side, target_height_cm, config)?;
        Ok(self.outcome.insert(outcome))
    }

    pub fn reset(&mut self) {
        self.front = None;
        self.side = None;
        self.outcome = None;
    }
}
