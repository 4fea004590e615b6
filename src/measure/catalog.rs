use crate::joint::{names, CaptureView};

use self::Measurement as M;

/// 採寸項目
///
/// 宣言順がそのまま表示順になる（コア項目 → 拡張項目）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Measurement {
    // コア
    Height,
    Shoulders,
    Chest,
    Waist,
    Hips,
    Inseam,
    // 拡張: 長さ
    ArmLength,
    UpperArmLength,
    ForearmLength,
    NeckToShoulder,
    HeadToNeck,
    TorsoLength,
    BackLength,
    ShoulderToWaist,
    LegLength,
    Outseam,
    ThighLength,
    LowerLegLength,
    // 拡張: 幅・奥行き
    ArmSpan,
    ElbowSpan,
    HipWidth,
    KneeSpan,
    AnkleSpan,
    ChestDepth,
    WaistDepth,
    // 拡張: 周囲長
    Underbust,
    BicepCircumference,
    ForearmCircumference,
    ThighCircumference,
    CalfCircumference,
    WristCircumference,
    KneeCircumference,
    AnkleCircumference,
    NeckCircumference,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Core,
    Extended,
}

impl Measurement {
    /// 高さ補正の基準にも使うコア項目
    pub const CORE: [Measurement; 6] = [
        Measurement::Height,
        Measurement::Shoulders,
        Measurement::Chest,
        Measurement::Waist,
        Measurement::Hips,
        Measurement::Inseam,
    ];

    pub fn label(&self) -> &'static str {
        use Measurement::*;
        match self {
            Height => "Height",
            Shoulders => "Shoulders",
            Chest => "Chest",
            Waist => "Waist Circumference",
            Hips => "Hips",
            Inseam => "Inseam",
            ArmLength => "Arm Length",
            UpperArmLength => "Upper Arm Length",
            ForearmLength => "Forearm Length",
            NeckToShoulder => "Neck To Shoulder",
            HeadToNeck => "Head To Neck",
            TorsoLength => "Torso Length",
            BackLength => "Back Length",
            ShoulderToWaist => "Shoulder To Waist",
            LegLength => "Leg Length",
            Outseam => "Outseam",
            ThighLength => "Thigh Length",
            LowerLegLength => "Lower Leg Length",
            ArmSpan => "Arm Span",
            ElbowSpan => "Elbow Span",
            HipWidth => "Hip Width",
            KneeSpan => "Knee Span",
            AnkleSpan => "Ankle Span",
            ChestDepth => "Chest Depth",
            WaistDepth => "Waist Depth",
            Underbust => "Underbust",
            BicepCircumference => "Bicep Circumference",
            ForearmCircumference => "Forearm Circumference",
            ThighCircumference => "Thigh Circumference",
            CalfCircumference => "Calf Circumference",
            WristCircumference => "Wrist Circumference",
            KneeCircumference => "Knee Circumference",
            AnkleCircumference => "Ankle Circumference",
            NeckCircumference => "Neck Circumference",
        }
    }

    pub fn tier(&self) -> Tier {
        if Self::CORE.contains(self) {
            Tier::Core
        } else {
            Tier::Extended
        }
    }
}

/// 距離の換算方法
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// 関節間距離そのまま
    Length,
    /// 距離を直径とみなした円周 × 経験的補正
    Circumference { correction: f32 },
}

impl Shape {
    pub fn factor(&self) -> f32 {
        match self {
            Shape::Length => 1.0,
            Shape::Circumference { correction } => std::f32::consts::PI * correction,
        }
    }
}

/// 1項目の定義: どちらの撮影のどの関節ペアから測るか
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasurementSpec {
    pub measurement: Measurement,
    pub view: CaptureView,
    pub from: &'static str,
    pub to: &'static str,
    pub shape: Shape,
}

impl MeasurementSpec {
    const fn new(
        measurement: Measurement,
        view: CaptureView,
        from: &'static str,
        to: &'static str,
        shape: Shape,
    ) -> Self {
        Self { measurement, view, from, to, shape }
    }

    /// 両端が同じ関節（距離が構造的にゼロになる）
    pub fn is_degenerate(&self) -> bool {
        self.from == self.to
    }
}

const fn length(
    m: Measurement,
    view: CaptureView,
    from: &'static str,
    to: &'static str,
) -> MeasurementSpec {
    MeasurementSpec::new(m, view, from, to, Shape::Length)
}

const fn circumference(
    m: Measurement,
    from: &'static str,
    to: &'static str,
    correction: f32,
) -> MeasurementSpec {
    let shape = Shape::Circumference { correction };
    MeasurementSpec::new(m, CaptureView::Front, from, to, shape)
}

/// 拡張項目の関節ペア
///
/// 手首・膝・足首・首の周囲長は左右ペアとなる関節がトラッカーに無く、
/// 同じ関節を両端に指定している（計測不能として扱われる）
pub const EXTENDED: &[MeasurementSpec] = &[
    length(M::ArmLength, CaptureView::Front, names::LEFT_SHOULDER, names::LEFT_HAND),
    length(M::UpperArmLength, CaptureView::Front, names::LEFT_ARM, names::LEFT_FOREARM),
    length(M::ForearmLength, CaptureView::Front, names::LEFT_FOREARM, names::LEFT_HAND),
    length(M::NeckToShoulder, CaptureView::Front, names::NECK, names::LEFT_SHOULDER),
    length(M::HeadToNeck, CaptureView::Front, names::HEAD, names::NECK),
    length(M::TorsoLength, CaptureView::Front, names::NECK, names::HIPS),
    length(M::BackLength, CaptureView::Side, names::NECK, names::HIPS),
    length(M::ShoulderToWaist, CaptureView::Front, names::LEFT_SHOULDER, names::LEFT_UP_LEG),
    length(M::LegLength, CaptureView::Front, names::LEFT_UP_LEG, names::LEFT_FOOT),
    length(M::Outseam, CaptureView::Side, names::HIPS, names::LEFT_FOOT),
    length(M::ThighLength, CaptureView::Front, names::LEFT_UP_LEG, names::LEFT_LEG),
    length(M::LowerLegLength, CaptureView::Front, names::LEFT_LEG, names::LEFT_FOOT),
    length(M::ArmSpan, CaptureView::Front, names::LEFT_HAND, names::RIGHT_HAND),
    length(M::ElbowSpan, CaptureView::Front, names::LEFT_FOREARM, names::RIGHT_FOREARM),
    length(M::HipWidth, CaptureView::Front, names::LEFT_UP_LEG, names::RIGHT_UP_LEG),
    length(M::KneeSpan, CaptureView::Front, names::LEFT_LEG, names::RIGHT_LEG),
    length(M::AnkleSpan, CaptureView::Front, names::LEFT_FOOT, names::RIGHT_FOOT),
    length(M::ChestDepth, CaptureView::Side, names::LEFT_SHOULDER, names::SPINE_7),
    length(M::WaistDepth, CaptureView::Side, names::SPINE_1, names::LEFT_UP_LEG),
    circumference(M::Underbust, names::LEFT_ARM, names::RIGHT_ARM, 0.9),
    circumference(M::BicepCircumference, names::LEFT_ARM, names::LEFT_FOREARM, 0.3),
    circumference(M::ForearmCircumference, names::LEFT_FOREARM, names::LEFT_HAND, 0.3),
    circumference(M::ThighCircumference, names::LEFT_UP_LEG, names::RIGHT_UP_LEG, 1.0),
    circumference(M::CalfCircumference, names::LEFT_LEG, names::LEFT_FOOT, 0.3),
    circumference(M::WristCircumference, names::LEFT_HAND, names::LEFT_HAND, 1.0),
    circumference(M::KneeCircumference, names::LEFT_LEG, names::LEFT_LEG, 1.0),
    circumference(M::AnkleCircumference, names::LEFT_FOOT, names::LEFT_FOOT, 1.0),
    circumference(M::NeckCircumference, names::NECK, names::NECK, 1.0),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extended_excludes_core() {
        assert!(EXTENDED.iter().all(|s| s.measurement.tier() == Tier::Extended));
    }

    #[test]
    fn test_extended_measurements_unique() {
        let mut seen: Vec<Measurement> = EXTENDED.iter().map(|s| s.measurement).collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), EXTENDED.len());
    }

    #[test]
    fn test_degenerate_entries() {
        let degenerate: Vec<Measurement> = EXTENDED
            .iter()
            .filter(|s| s.is_degenerate())
            .map(|s| s.measurement)
            .collect();
        assert_eq!(
            degenerate,
            vec![
                Measurement::WristCircumference,
                Measurement::KneeCircumference,
                Measurement::AnkleCircumference,
                Measurement::NeckCircumference,
            ]
        );
    }

    #[test]
    fn test_circumference_factor() {
        let shape = Shape::Circumference { correction: 0.9 };
        assert!((shape.factor() - std::f32::consts::PI * 0.9).abs() < 1e-6);
        assert_eq!(Shape::Length.factor(), 1.0);
    }
}
