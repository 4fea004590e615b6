use tracing::{debug, info};

use super::catalog::Measurement;
use super::primary::CoreMeasurements;
use super::MeasurementSet;
use crate::config::MeasureConfig;
use crate::error::MeasureError;

/// 身長補正後の最終結果
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementReport {
    /// 目標身長 / 推定身長
    pub ratio: f32,
    pub core: MeasurementSet,
    pub extended: MeasurementSet,
}

impl MeasurementReport {
    pub fn get(&self, measurement: Measurement) -> Option<f32> {
        self.core
            .get(measurement)
            .or_else(|| self.extended.get(measurement))
    }

    /// コア・拡張を合わせた全項目
    pub fn all(&self) -> MeasurementSet {
        let mut all = self.core.clone();
        all.merge(&self.extended);
        all
    }

    /// 表示用 (ラベル, cm)。計測不能な項目は含まない
    pub fn displayed(&self) -> Vec<(&'static str, f32)> {
        self.all().displayed()
    }
}

/// 既知の身長に合わせて全項目を一律にスケーリング
///
/// カメラ由来の絶対スケールは信用できないが体の比率は比較的正確なので、
/// 比率を保ったまま実寸を身長に合わせる。
/// 推定身長が無い（または0以下の）場合は `fallback_height_cm` を使う
pub fn calibrate_to_height(
    target_height_cm: f32,
    core: &CoreMeasurements,
    extended: &MeasurementSet,
    config: &MeasureConfig,
) -> Result<MeasurementReport, MeasureError> {
    if !target_height_cm.is_finite() || target_height_cm <= 0.0 {
        return Err(MeasureError::InvalidHeight(target_height_cm));
    }

    let current = match core.values.get(Measurement::Height) {
        Some(h) if h.is_finite() && h > 0.0 => h,
        _ => {
            debug!(fallback = config.fallback_height_cm, "height estimate unavailable");
            config.fallback_height_cm
        }
    };
    let ratio = target_height_cm / current;

    let report = MeasurementReport {
        ratio,
        core: core.values.scaled(ratio),
        extended: extended.scaled(ratio),
    };

    info!(
        target_height_cm,
        estimated_height_cm = current,
        ratio,
        displayed = report.displayed().len(),
        "measurements calibrated"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn make_core(height: Option<f32>) -> CoreMeasurements {
        let mut values = MeasurementSet::new();
        values.insert(Measurement::Height, height);
        values.insert(Measurement::Chest, Some(90.0));
        values.insert(Measurement::Waist, None);
        CoreMeasurements {
            scale_factor: 1.0,
            values,
        }
    }

    #[test]
    fn test_ratio_from_core_height() {
        let core = make_core(Some(160.0));
        let mut ext = MeasurementSet::new();
        ext.insert(Measurement::ArmSpan, Some(150.0));

        let report = calibrate_to_height(176.0, &core, &ext, &MeasureConfig::default()).unwrap();
        assert_relative_eq!(report.ratio, 1.1);
        assert_relative_eq!(report.get(Measurement::Height).unwrap(), 176.0, epsilon = 1e-3);
        assert_relative_eq!(report.get(Measurement::Chest).unwrap(), 99.0, epsilon = 1e-3);
        assert_relative_eq!(report.get(Measurement::ArmSpan).unwrap(), 165.0, epsilon = 1e-3);
        assert_eq!(report.get(Measurement::Waist), None);
    }

    #[test]
    fn test_fallback_height() {
        let core = make_core(None);
        let report =
            calibrate_to_height(187.0, &core, &MeasurementSet::new(), &MeasureConfig::default())
                .unwrap();
        // 187 / 170
        assert_relative_eq!(report.ratio, 1.1, epsilon = 1e-6);

        let zero = make_core(Some(0.0));
        let report =
            calibrate_to_height(170.0, &zero, &MeasurementSet::new(), &MeasureConfig::default())
                .unwrap();
        assert_relative_eq!(report.ratio, 1.0);
    }

    #[test]
    fn test_displayed_has_no_non_positive() {
        let mut values = MeasurementSet::new();
        values.insert(Measurement::Height, Some(170.0));
        values.insert(Measurement::Hips, Some(0.0));
        let core = CoreMeasurements { scale_factor: 1.0, values };
        let report =
            calibrate_to_height(180.0, &core, &MeasurementSet::new(), &MeasureConfig::default())
                .unwrap();
        assert!(report.displayed().iter().all(|(_, v)| *v > 0.0));
        assert_eq!(report.displayed().len(), 1);
    }

    #[test]
    fn test_invalid_target_height() {
        let core = make_core(Some(170.0));
        let extended = MeasurementSet::new();
        let err = calibrate_to_height(-1.0, &core, &extended, &MeasureConfig::default());
        assert_eq!(err.unwrap_err(), MeasureError::InvalidHeight(-1.0));
    }
}
