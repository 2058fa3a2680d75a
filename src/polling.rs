//! The poll cycle: read the sensor, derive air quality, emit to both sinks.
//!
//! A tick moves `Idle -> Polling -> Idle`. Ticks are driven by
//! [`schedule_periodic`](crate::scheduler::schedule_periodic) and may overlap
//! when a read takes longer than the poll period, so the loop tracks the number
//! of reads in flight rather than a single state variable.

use std::sync::{
    Arc, Mutex, PoisonError,
    atomic::{AtomicU64, AtomicUsize, Ordering},
};

use anyhow::anyhow;
use tracing::{debug, error, info, trace, warn};

use crate::{
    Error, Result,
    config::BridgeConfig,
    scheduler::{CancellationHandle, schedule_periodic},
    sensor::SensorReader,
    sink::{HistoryLogger, LiveStatePublisher, Reading},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Idle,
    Polling,
}

/// Readiness of the sensor as seen by the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorState {
    /// `initialize()` has not resolved yet.
    Pending,
    Ready,
    /// Construction or initialization failed; reads are never attempted.
    Failed,
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    Emitted(Reading),
    Unstable,
    ReadFailed,
    NotInitialized,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollStats {
    pub ticks: u64,
    pub emitted: u64,
    pub unstable: u64,
    pub read_failures: u64,
    pub not_initialized: u64,
    pub sink_failures: u64,
}

#[derive(Debug, Default)]
struct Counters {
    ticks: AtomicU64,
    emitted: AtomicU64,
    unstable: AtomicU64,
    read_failures: AtomicU64,
    not_initialized: AtomicU64,
    sink_failures: AtomicU64,
}

impl Counters {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> PollStats {
        PollStats {
            ticks: self.ticks.load(Ordering::Relaxed),
            emitted: self.emitted.load(Ordering::Relaxed),
            unstable: self.unstable.load(Ordering::Relaxed),
            read_failures: self.read_failures.load(Ordering::Relaxed),
            not_initialized: self.not_initialized.load(Ordering::Relaxed),
            sink_failures: self.sink_failures.load(Ordering::Relaxed),
        }
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(count: &'a AtomicUsize) -> Self {
        count.fetch_add(1, Ordering::SeqCst);
        Self(count)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

pub struct PollingLoop {
    config: BridgeConfig,
    sensor: Option<Arc<dyn SensorReader>>,
    sensor_state: Mutex<SensorState>,
    publisher: Arc<dyn LiveStatePublisher>,
    history: Arc<dyn HistoryLogger>,
    in_flight: AtomicUsize,
    counters: Counters,
}

impl PollingLoop {
    /// `sensor` is `None` when the device could not even be constructed;
    /// `initialize` then fails and every tick reports not initialized.
    pub fn new(
        config: BridgeConfig,
        sensor: Option<Arc<dyn SensorReader>>,
        publisher: Arc<dyn LiveStatePublisher>,
        history: Arc<dyn HistoryLogger>,
    ) -> Self {
        Self {
            config,
            sensor,
            sensor_state: Mutex::new(SensorState::Pending),
            publisher,
            history,
            in_flight: AtomicUsize::new(0),
            counters: Counters::default(),
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Brings the sensor up. A failure is terminal: the loop keeps running with
    /// every tick skipped, and later calls return `Error::NotInitialized`
    /// without touching the sensor.
    pub async fn initialize(&self) -> Result<()> {
        if self.sensor_state() == SensorState::Failed {
            return Err(Error::NotInitialized);
        }

        let Some(sensor) = &self.sensor else {
            let err = Error::Init(anyhow!("no sensor available"));
            error!("{err}");
            self.set_sensor_state(SensorState::Failed);
            return Err(err);
        };

        match sensor.initialize().await {
            Ok(()) => {
                info!("BME680 initialization succeeded");
                self.set_sensor_state(SensorState::Ready);
                Ok(())
            }
            Err(err) => {
                error!("{err}");
                self.set_sensor_state(SensorState::Failed);
                Err(err)
            }
        }
    }

    /// Runs one poll tick to completion.
    pub async fn tick(&self) -> TickOutcome {
        debug!("polling BME680");
        Counters::bump(&self.counters.ticks);

        let sensor = match (&self.sensor, self.sensor_state()) {
            (Some(sensor), SensorState::Ready) => sensor,
            _ => {
                warn!("Error: BME680 not initialized");
                Counters::bump(&self.counters.not_initialized);
                return TickOutcome::NotInitialized;
            }
        };

        let measurement = {
            let _in_flight = InFlight::enter(&self.in_flight);
            match sensor.read_sample().await {
                Ok(m) => m,
                Err(err) => {
                    error!("{err}");
                    Counters::bump(&self.counters.read_failures);
                    return TickOutcome::ReadFailed;
                }
            }
        };

        if !measurement.stable {
            trace!("dropping reading taken before the gas heater stabilized");
            Counters::bump(&self.counters.unstable);
            return TickOutcome::Unstable;
        }

        let reading = Reading::from_measurement(&measurement);
        info!(
            "{}: temperature = {} C, pressure = {} hPa, humidity = {} %, air quality = {}, VOC density = {}",
            self.config.names.name,
            reading.temperature_celsius,
            reading.pressure_hpa,
            reading.humidity_percent,
            reading.air_quality_index,
            reading.voc_density,
        );

        self.emit(&reading).await;
        Counters::bump(&self.counters.emitted);

        TickOutcome::Emitted(reading)
    }

    /// Starts ticking every `config.refresh` seconds.
    pub fn spawn(self: &Arc<Self>) -> CancellationHandle {
        let this = Arc::clone(self);
        schedule_periodic(self.config.refresh, move || {
            let this = Arc::clone(&this);
            async move {
                this.tick().await;
            }
        })
    }

    pub fn state(&self) -> PollState {
        if self.in_flight.load(Ordering::SeqCst) == 0 {
            PollState::Idle
        } else {
            PollState::Polling
        }
    }

    pub fn sensor_state(&self) -> SensorState {
        *self
            .sensor_state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn stats(&self) -> PollStats {
        self.counters.snapshot()
    }

    fn set_sensor_state(&self, state: SensorState) {
        *self
            .sensor_state
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = state;
    }

    async fn emit(&self, reading: &Reading) {
        if let Err(err) = self.history.add_entry(reading.history_entry()).await {
            error!("failed to add history entry: {err:#}");
            Counters::bump(&self.counters.sink_failures);
        }

        for (metric, value) in reading.characteristics() {
            if let Err(err) = self.publisher.set_characteristic(metric, value).await {
                error!("failed to publish {metric}: {err:#}");
                Counters::bump(&self.counters.sink_failures);
            }
        }
    }
}
