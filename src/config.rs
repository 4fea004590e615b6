use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub normalize: NormalizeConfig,
    #[serde(default)]
    pub vertex: VertexConfig,
    #[serde(default)]
    pub measure: MeasureConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NormalizeConfig {
    /// 横向き撮影を正面に揃えるための鉛直軸まわり回転（度）
    #[serde(default = "default_side_rotation_deg")]
    pub side_rotation_deg: f32,
}

/// 頂点クラウドの見た目調整用定数
///
/// 正面の横幅は実際の体幅より狭く出るため広げ、
/// 側面の奥行きは厚く出すぎるため縮める。
#[derive(Debug, Clone, Deserialize)]
pub struct VertexConfig {
    /// X（横幅）倍率
    #[serde(default = "default_spread_factor")]
    pub spread_factor: f32,
    /// Z（奥行き）倍率
    #[serde(default = "default_depth_scale")]
    pub depth_scale: f32,
    #[serde(default = "default_y_offset")]
    pub y_offset: f32,
    #[serde(default = "default_z_offset")]
    pub z_offset: f32,
    /// 除外する関節名の部分文字列（指・つま先・眼球）
    #[serde(default = "default_noise_filters")]
    pub noise_filters: Vec<String>,
}

/// 採寸の補正係数
///
/// 関節間の幅は周囲長の代用としては不正確なため、項目ごとに経験的な倍率を掛ける
#[derive(Debug, Clone, Deserialize)]
pub struct MeasureConfig {
    #[serde(default = "default_shoulders_multiplier")]
    pub shoulders_multiplier: f32,
    #[serde(default = "default_chest_multiplier")]
    pub chest_multiplier: f32,
    #[serde(default = "default_waist_multiplier")]
    pub waist_multiplier: f32,
    #[serde(default = "default_hips_multiplier")]
    pub hips_multiplier: f32,
    #[serde(default = "default_inseam_multiplier")]
    pub inseam_multiplier: f32,
    /// 身長推定が無いときに使う仮の身長（cm）
    #[serde(default = "default_fallback_height_cm")]
    pub fallback_height_cm: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// 送信用JSONの保存先
    #[serde(default = "default_report_output")]
    pub output_path: String,
}

fn default_side_rotation_deg() -> f32 { -90.0 }

fn default_spread_factor() -> f32 { 1.35 }
fn default_depth_scale() -> f32 { 0.55 }
fn default_y_offset() -> f32 { 0.0 }
fn default_z_offset() -> f32 { 0.0 }
fn default_noise_filters() -> Vec<String> {
    vec!["finger".to_string(), "toe".to_string(), "eyeball".to_string()]
}

fn default_shoulders_multiplier() -> f32 { 1.0 }
fn default_chest_multiplier() -> f32 { 2.05 }
fn default_waist_multiplier() -> f32 { 2.0 }
fn default_hips_multiplier() -> f32 { 2.1 }
fn default_inseam_multiplier() -> f32 { 1.0 }
fn default_fallback_height_cm() -> f32 { 170.0 }

fn default_report_output() -> String { "measurements.json".to_string() }

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            side_rotation_deg: default_side_rotation_deg(),
        }
    }
}

impl Default for VertexConfig {
    fn default() -> Self {
        Self {
            spread_factor: default_spread_factor(),
            depth_scale: default_depth_scale(),
            y_offset: default_y_offset(),
            z_offset: default_z_offset(),
            noise_filters: default_noise_filters(),
        }
    }
}

impl Default for MeasureConfig {
    fn default() -> Self {
        Self {
            shoulders_multiplier: default_shoulders_multiplier(),
            chest_multiplier: default_chest_multiplier(),
            waist_multiplier: default_waist_multiplier(),
            hips_multiplier: default_hips_multiplier(),
            inseam_multiplier: default_inseam_multiplier(),
            fallback_height_cm: default_fallback_height_cm(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_path: default_report_output(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// ファイルが無い・読めない場合はデフォルト設定
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!("config not loaded ({:#}), using defaults", e);
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("vertex.spread_factor", self.vertex.spread_factor),
            ("vertex.depth_scale", self.vertex.depth_scale),
            ("measure.shoulders_multiplier", self.measure.shoulders_multiplier),
            ("measure.chest_multiplier", self.measure.chest_multiplier),
            ("measure.waist_multiplier", self.measure.waist_multiplier),
            ("measure.hips_multiplier", self.measure.hips_multiplier),
            ("measure.inseam_multiplier", self.measure.inseam_multiplier),
            ("measure.fallback_height_cm", self.measure.fallback_height_cm),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                bail!("{} must be a positive number, got {}", name, value);
            }
        }
        let finite = [
            ("normalize.side_rotation_deg", self.normalize.side_rotation_deg),
            ("vertex.y_offset", self.vertex.y_offset),
            ("vertex.z_offset", self.vertex.z_offset),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                bail!("{} must be finite, got {}", name, value);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.normalize.side_rotation_deg, -90.0);
        assert_eq!(config.measure.chest_multiplier, 2.05);
        assert_eq!(config.vertex.noise_filters, vec!["finger", "toe", "eyeball"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_section_override() {
        let config: Config = toml::from_str(
            r#"
            [measure]
            waist_multiplier = 2.2

            [vertex]
            noise_filters = ["Thumb"]
            "#,
        )
        .unwrap();
        assert_eq!(config.measure.waist_multiplier, 2.2);
        assert_eq!(config.measure.hips_multiplier, 2.1);
        assert_eq!(config.vertex.noise_filters, vec!["Thumb"]);
        assert_eq!(config.vertex.spread_factor, default_spread_factor());
    }

    #[test]
    fn test_validate_rejects_non_positive_multiplier() {
        let mut config = Config::default();
        config.measure.hips_multiplier = 0.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.vertex.depth_scale = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = Config::load_or_default("definitely/not/here.toml");
        assert_eq!(config.measure.fallback_height_cm, 170.0);
    }
}
