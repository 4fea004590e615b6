use tracing::debug;

use super::catalog::{Measurement, MeasurementSpec, Shape};
use super::{measure_pair, MeasurementSet};
use crate::config::MeasureConfig;
use crate::error::MeasureError;
use crate::joint::{names, CaptureView};
use crate::normalize::NormalizedPair;

/// コア採寸の結果
#[derive(Debug, Clone, PartialEq)]
pub struct CoreMeasurements {
    /// 正規化座標1単位あたりのメートル
    pub scale_factor: f32,
    pub values: MeasurementSet,
}

impl CoreMeasurements {
    /// 正規化座標1単位あたりの cm
    pub fn cm_per_unit(&self) -> f32 {
        self.scale_factor * 100.0
    }
}

/// コア項目の関節ペアと補正倍率
pub fn core_specs(config: &MeasureConfig) -> [(MeasurementSpec, f32); 6] {
    let spec = |measurement, view, from, to| MeasurementSpec {
        measurement,
        view,
        from,
        to,
        shape: Shape::Length,
    };
    [
        (
            spec(Measurement::Height, CaptureView::Front, names::HEAD, names::LEFT_FOOT),
            1.0,
        ),
        (
            spec(
                Measurement::Shoulders,
                CaptureView::Front,
                names::LEFT_SHOULDER,
                names::RIGHT_SHOULDER,
            ),
            config.shoulders_multiplier,
        ),
        (
            spec(Measurement::Chest, CaptureView::Front, names::LEFT_ARM, names::RIGHT_ARM),
            config.chest_multiplier,
        ),
        (
            spec(Measurement::Waist, CaptureView::Front, names::LEFT_UP_LEG, names::RIGHT_UP_LEG),
            config.waist_multiplier,
        ),
        (
            spec(Measurement::Hips, CaptureView::Front, names::LEFT_UP_LEG, names::RIGHT_UP_LEG),
            config.hips_multiplier,
        ),
        (
            spec(Measurement::Inseam, CaptureView::Side, names::LEFT_UP_LEG, names::LEFT_FOOT),
            config.inseam_multiplier,
        ),
    ]
}

/// 正面セットの頭〜左足の高さ差から実寸スケール（m/単位）を求める
pub fn scale_factor(pair: &NormalizedPair, height_m: f32) -> Result<f32, MeasureError> {
    if !height_m.is_finite() || height_m <= 0.0 {
        return Err(MeasureError::InvalidHeight(height_m));
    }
    let (Some(head), Some(foot)) = (
        pair.front.get(names::HEAD),
        pair.front.get(names::LEFT_FOOT),
    ) else {
        return Err(MeasureError::ScaleUndetermined("head or left foot joint missing"));
    };
    let dy = (head.y - foot.y).abs();
    if dy <= 0.0 || !dy.is_finite() {
        return Err(MeasureError::ScaleUndetermined("head and left foot at the same height"));
    }
    Ok(height_m / dy)
}

/// コア項目（身長・肩幅・胸囲・ウエスト・ヒップ・股下）を算出
///
/// 関節が欠けた項目は None。スケールが決まらない場合のみエラー
pub fn derive_core(
    pair: &NormalizedPair,
    height_m: f32,
    config: &MeasureConfig,
) -> Result<CoreMeasurements, MeasureError> {
    let scale_factor = scale_factor(pair, height_m)?;
    let cm_per_unit = scale_factor * 100.0;

    let mut values = MeasurementSet::new();
    for (spec, multiplier) in core_specs(config) {
        values.insert(spec.measurement, measure_pair(pair, &spec, cm_per_unit, multiplier));
    }

    debug!(scale_factor, computed = values.displayed().len(), "core measurements derived");

    Ok(CoreMeasurements {
        scale_factor,
        values,
    })
}
