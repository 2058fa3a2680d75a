use thiserror::Error;

/// Errors raised by the sensor seam and configuration.
#[derive(Error, Debug)]
pub enum Error {
    /// Sensor construction or `initialize()` failed. Terminal for the reader.
    #[error("BME680 initialization failed: {0:#}")]
    Init(anyhow::Error),

    /// A single acquisition failed. Terminal for the current tick only.
    #[error("BME680 read error: {0:#}")]
    Read(anyhow::Error),

    /// A read was attempted before the sensor became ready.
    #[error("BME680 not initialized")]
    NotInitialized,

    /// The poll period must be at least one second.
    #[error("refresh interval must be greater than 0 seconds, got {0}")]
    InvalidRefreshInterval(u64),
}

pub type Result<T> = std::result::Result<T, Error>;
