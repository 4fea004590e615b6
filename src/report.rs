use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::joint::JointSnapshot;
use crate::measure::{Measurement, MeasurementReport};

/// 採寸結果の保存用ペイロード（PUT リクエストのボディ）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chest: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waist: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hip: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shoulder_width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inseam: Option<f32>,
    /// 表示対象の全項目 (ラベル → cm)
    pub all_measurements: BTreeMap<String, f32>,
}

impl MeasurementPayload {
    pub fn from_report(report: &MeasurementReport) -> Self {
        let all_measurements: BTreeMap<String, f32> = report
            .displayed()
            .into_iter()
            .map(|(label, value)| (label.to_string(), value))
            .collect();
        // 表示対象外（計測不能・非正）の値は送らない
        let pick = |m: Measurement| all_measurements.get(m.label()).copied();

        Self {
            chest: pick(Measurement::Chest),
            waist: pick(Measurement::Waist),
            hip: pick(Measurement::Hips),
            shoulder_width: pick(Measurement::Shoulders),
            inseam: pick(Measurement::Inseam),
            all_measurements,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub fn save_payload<P: AsRef<Path>>(path: P, payload: &MeasurementPayload) -> Result<()> {
    let json = payload.to_json()?;
    fs::write(path, json).context("Failed to write measurement payload")?;
    Ok(())
}

/// 記録済み撮影データ（オフライン再計算用）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureBundle {
    pub front: JointSnapshot,
    pub side: JointSnapshot,
    /// ユーザー申告の身長（cm）
    pub height_cm: f32,
}

pub fn save_capture<P: AsRef<Path>>(path: P, bundle: &CaptureBundle) -> Result<()> {
    let json = serde_json::to_string_pretty(bundle)?;
    fs::write(path, json).context("Failed to write capture file")?;
    Ok(())
}

pub fn load_capture<P: AsRef<Path>>(path: P) -> Result<CaptureBundle> {
    let content = fs::read_to_string(path).context("Failed to read capture file")?;
    let bundle: CaptureBundle =
        serde_json::from_str(&content).context("Failed to parse capture file")?;
    Ok(bundle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::MeasurementSet;

    fn make_report() -> MeasurementReport {
        let mut core = MeasurementSet::new();
        core.insert(Measurement::Height, Some(175.0));
        core.insert(Measurement::Chest, Some(96.5));
        core.insert(Measurement::Waist, None);
        core.insert(Measurement::Hips, Some(0.0));
        core.insert(Measurement::Shoulders, Some(44.0));
        let mut extended = MeasurementSet::new();
        extended.insert(Measurement::ArmSpan, Some(172.0));
        MeasurementReport {
            ratio: 1.0,
            core,
            extended,
        }
    }

    #[test]
    fn test_payload_fields() {
        let payload = MeasurementPayload::from_report(&make_report());
        assert_eq!(payload.chest, Some(96.5));
        assert_eq!(payload.shoulder_width, Some(44.0));
        assert_eq!(payload.waist, None);
        assert_eq!(payload.hip, None);
        assert_eq!(payload.all_measurements.len(), 4);
        assert_eq!(payload.all_measurements.get("Arm Span"), Some(&172.0));
    }

    #[test]
    fn test_payload_json_shape() {
        let payload = MeasurementPayload::from_report(&make_report());
        let value: serde_json::Value = serde_json::from_str(&payload.to_json().unwrap()).unwrap();
        assert_eq!(value["chest"], serde_json::json!(96.5));
        assert_eq!(value["shoulder_width"], serde_json::json!(44.0));
        assert!(value.get("waist").is_none());
        assert!(value.get("inseam").is_none());
        assert_eq!(value["all_measurements"]["Height"], serde_json::json!(175.0));
    }

    #[test]
    fn test_capture_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capture.json");
        let bundle = CaptureBundle {
            front: JointSnapshot::new().with_joint("head_joint", [0.0, 1.7, 0.0]),
            side: JointSnapshot::new().with_joint("head_joint", [0.1, 1.7, 0.4]),
            height_cm: 172.0,
        };
        save_capture(&path, &bundle).unwrap();
        assert_eq!(load_capture(&path).unwrap(), bundle);
    }

    #[test]
    fn test_load_capture_missing_file() {
        assert!(load_capture("no/such/capture.json").is_err());
    }
}
