use super::catalog::EXTENDED;
use super::primary::CoreMeasurements;
use super::{measure_pair, MeasurementSet};
use crate::normalize::NormalizedPair;

/// 拡張項目（腕・脚・胴の長さ、幅、周囲長の近似）を算出
///
/// スケールはコア採寸で決めたものを使う
pub fn derive_extended(pair: &NormalizedPair, core: &CoreMeasurements) -> MeasurementSet {
    let cm_per_unit = core.cm_per_unit();
    let mut values = MeasurementSet::new();
    for spec in EXTENDED {
        values.insert(spec.measurement, measure_pair(pair, spec, cm_per_unit, 1.0));
    }
    values
}
