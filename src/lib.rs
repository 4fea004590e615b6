pub mod config;
pub mod error;
pub mod joint;
pub mod measure;
pub mod normalize;
pub mod report;
pub mod session;
pub mod vertex;

pub use error::{MeasureError, SessionError};
pub use joint::{CaptureView, JointSnapshot};
pub use session::{run_pipeline, MeasurementOutcome, MeasurementSession};
