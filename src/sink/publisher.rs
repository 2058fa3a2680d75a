use std::sync::{Mutex, PoisonError};

use anyhow::Result;
use async_trait::async_trait;
use indexmap::IndexMap;
use tracing::info;

use crate::{config::DisplayNames, sink::Metric};

/// Receives per-metric scalar updates for the host's live accessory state.
#[async_trait]
pub trait LiveStatePublisher: Send + Sync {
    async fn set_characteristic(&self, metric: Metric, value: f64) -> Result<()>;
}

/// Keeps the latest value of every characteristic and logs each update under
/// the service's display name.
#[derive(Debug)]
pub struct LogPublisher {
    names: DisplayNames,
    values: Mutex<IndexMap<Metric, f64>>,
}

impl LogPublisher {
    pub fn new(names: DisplayNames) -> Self {
        Self {
            names,
            values: Mutex::new(IndexMap::new()),
        }
    }

    /// Latest values, in the order the metrics were first published.
    pub fn snapshot(&self) -> IndexMap<Metric, f64> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl LiveStatePublisher for LogPublisher {
    async fn set_characteristic(&self, metric: Metric, value: f64) -> Result<()> {
        info!("{}: {metric} = {value}", self.names.for_metric(metric));

        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(metric, value);

        Ok(())
    }
}
