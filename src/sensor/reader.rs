use async_trait::async_trait;

use crate::{Result, sensor::Measurement};

/// An environmental sensor that can be brought up once and sampled repeatedly.
///
/// Reads may overlap when a read outlasts the poll period, so implementations
/// take `&self` and must tolerate concurrent calls.
#[async_trait]
pub trait SensorReader: Send + Sync {
    /// Brings the device up. A failure (`Error::Init`) is terminal for this
    /// reader instance.
    async fn initialize(&self) -> Result<()>;

    /// Performs one acquisition cycle. A failure (`Error::Read`) only affects
    /// the current poll tick.
    async fn read_sample(&self) -> Result<Measurement>;
}
