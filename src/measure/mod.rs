pub mod calibrate;
pub mod catalog;
pub mod extended;
pub mod primary;

pub use calibrate::{calibrate_to_height, MeasurementReport};
pub use catalog::{Measurement, MeasurementSpec, Shape, Tier, EXTENDED};
pub use extended::derive_extended;
pub use primary::{core_specs, derive_core, CoreMeasurements};

use std::collections::BTreeMap;

use tracing::debug;

use crate::joint::CaptureView;
use crate::normalize::NormalizedPair;

/// 採寸結果 (項目 → cm)
///
/// None は「このポーズからは計測不能」を表す
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementSet {
    values: BTreeMap<Measurement, Option<f32>>,
}

impl MeasurementSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, measurement: Measurement, value: Option<f32>) {
        self.values.insert(measurement, value);
    }

    /// 計測済みの値。未計測・計測不能なら None
    pub fn get(&self, measurement: Measurement) -> Option<f32> {
        self.values.get(&measurement).copied().flatten()
    }

    pub fn contains(&self, measurement: Measurement) -> bool {
        self.values.contains_key(&measurement)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Measurement, Option<f32>)> + '_ {
        self.values.iter().map(|(m, v)| (*m, *v))
    }

    /// 全ての値に同じ比率を掛けたコピー
    pub fn scaled(&self, ratio: f32) -> Self {
        Self {
            values: self
                .values
                .iter()
                .map(|(m, v)| (*m, v.map(|x| x * ratio)))
                .collect(),
        }
    }

    pub fn merge(&mut self, other: &MeasurementSet) {
        self.values.extend(other.values.iter().map(|(m, v)| (*m, *v)));
    }

    /// 表示用 (ラベル, cm)。計測不能・非正の値は除く
    pub fn displayed(&self) -> Vec<(&'static str, f32)> {
        self.values
            .iter()
            .filter_map(|(m, v)| match v {
                Some(x) if x.is_finite() && *x > 0.0 => Some((m.label(), *x)),
                _ => None,
            })
            .collect()
    }
}

/// 関節ペアの距離を cm に換算
///
/// `cm_per_unit` は正規化座標1単位あたりの cm。
/// 関節が欠けている、または両端が同一関節の場合は None
pub(crate) fn measure_pair(
    pair: &NormalizedPair,
    spec: &MeasurementSpec,
    cm_per_unit: f32,
    multiplier: f32,
) -> Option<f32> {
    if spec.is_degenerate() {
        debug!(measurement = ?spec.measurement, joint = spec.from, "degenerate joint pair");
        return None;
    }
    let set = match spec.view {
        CaptureView::Front => &pair.front,
        CaptureView::Side => &pair.side,
    };
    match set.distance(spec.from, spec.to) {
        Some(d) => Some(d * cm_per_unit * spec.shape.factor() * multiplier),
        None => {
            debug!(
                measurement = ?spec.measurement,
                from = spec.from,
                to = spec.to,
                view = %spec.view,
                "joint missing, measurement skipped"
            );
            None
        }
    }
}
