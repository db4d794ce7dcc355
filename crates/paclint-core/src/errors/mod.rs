//! Error handling for paclint.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod config_error;
pub mod detection_error;
pub mod error_code;
pub mod pipeline_error;
pub mod scan_error;
pub mod storage_error;

pub use config_error::ConfigError;
pub use detection_error::DetectionError;
pub use error_code::PaclintErrorCode;
pub use pipeline_error::{PipelineError, PipelineResult};
pub use scan_error::ScanError;
pub use storage_error::StorageError;
