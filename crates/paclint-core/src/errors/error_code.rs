//! PaclintErrorCode trait and the stable code strings reported to hosts.

/// Every error enum implements this to expose a stable, machine-readable code.
pub trait PaclintErrorCode {
    /// Returns the error code string (e.g., "SCAN_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns `[ERROR_CODE] message`, the form hosts print in their logs.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const SCAN_ERROR: &str = "SCAN_ERROR";
pub const FILE_TOO_LARGE: &str = "FILE_TOO_LARGE";
pub const CANCELLED: &str = "CANCELLED";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const DETECTION_ERROR: &str = "DETECTION_ERROR";
pub const DETECTOR_PANIC: &str = "DETECTOR_PANIC";
pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const SINK_CLOSED: &str = "SINK_CLOSED";
pub const SINK_STALLED: &str = "SINK_STALLED";
pub const PIPELINE_ERROR: &str = "PIPELINE_ERROR";
