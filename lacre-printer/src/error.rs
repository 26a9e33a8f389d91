//! Error types for the printer library

use thiserror::Error;

/// Errors establishing a printer connection
#[derive(Debug, Error)]
pub enum ConnectError {
    /// The operator dismissed the device picker - callers treat this as
    /// a no-op, not a failure
    #[error("device selection cancelled")]
    Cancelled,

    /// The claimed interface exposes no bulk OUT endpoint
    #[error("printer has no usable output endpoint")]
    NoOutputEndpoint,

    /// The print-service daemon is not running or not reachable
    #[error("print service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The print-service daemon has no default printer configured
    #[error("print service has no default printer")]
    NoDefaultDevice,

    /// Invalid printer address
    #[error("invalid printer address: {0}")]
    InvalidAddr(String),

    /// Timeout reaching the printer
    #[error("timeout: {0}")]
    Timeout(String),

    /// USB stack error
    #[error("usb error: {0}")]
    Usb(#[from] rusb::Error),

    /// IO error during connection setup
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors submitting data to a connected printer
#[derive(Debug, Error)]
pub enum SendError {
    /// No connection is currently held - connect first
    #[error("printer not connected")]
    NotConnected,

    /// The transfer to the device failed
    #[error("transfer failed: {0}")]
    Transfer(String),

    /// The print-service daemon is not running or not reachable
    #[error("print service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The print-service daemon rejected the job
    #[error("print service rejected job: {0}")]
    Rejected(String),

    /// Timeout during the transfer
    #[error("timeout: {0}")]
    Timeout(String),

    /// IO error during the transfer
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for connection operations
pub type ConnectResult<T> = Result<T, ConnectError>;

/// Result type for send operations
pub type SendResult<T> = Result<T, SendError>;
