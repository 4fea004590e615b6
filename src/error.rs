use thiserror::Error;

use crate::joint::CaptureView;

/// 採寸計算のエラー
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeasureError {
    /// 頭・足の高さ差から実寸スケールを決められない
    #[error("scale undetermined: {0}")]
    ScaleUndetermined(&'static str),

    #[error("invalid height: {0}")]
    InvalidHeight(f32),
}

/// 撮影セッションのエラー
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("{0} capture is missing")]
    MissingCapture(CaptureView),

    #[error(transparent)]
    Measure(#[from] MeasureError),
}
