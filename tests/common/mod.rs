// tests/common/mod.rs

#![allow(dead_code)]

use std::{
    collections::VecDeque,
    io,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use anyhow::{anyhow, bail};
use async_trait::async_trait;
use tokio::time::{Duration, Instant, sleep};
use tracing::subscriber::DefaultGuard;

use bme680_bridge::{
    Error, Result,
    config::{BridgeConfig, DisplayNames, RefreshInterval},
    polling::PollingLoop,
    sensor::{Measurement, SensorReader},
    sink::{HistoryEntry, HistoryLogger, LiveStatePublisher, Metric},
};

pub enum Step {
    Sample(Measurement),
    Fail,
}

pub fn stable(gas_resistance_ohms: f64, humidity_percent: f64) -> Step {
    Step::Sample(Measurement {
        timestamp_seconds: 1_700_000_000,
        temperature_celsius: 21.26,
        pressure_hpa: 1013.25,
        humidity_percent,
        gas_resistance_ohms,
        stable: true,
    })
}

pub fn unstable() -> Step {
    Step::Sample(Measurement {
        timestamp_seconds: 1_700_000_000,
        temperature_celsius: 21.26,
        pressure_hpa: 1013.25,
        humidity_percent: 45.0,
        gas_resistance_ohms: 12_000.0,
        stable: false,
    })
}

/// Sensor that plays back a fixed script of samples and failures.
pub struct ScriptedSensor {
    fail_init: AtomicBool,
    init_calls: AtomicUsize,
    delay: Duration,
    script: Mutex<VecDeque<Step>>,
    reads: Mutex<Vec<Instant>>,
}

impl ScriptedSensor {
    pub fn new(script: impl IntoIterator<Item = Step>) -> Self {
        Self {
            fail_init: AtomicBool::new(false),
            init_calls: AtomicUsize::new(0),
            delay: Duration::ZERO,
            script: Mutex::new(script.into_iter().collect()),
            reads: Mutex::new(Vec::new()),
        }
    }

    /// Fails the first `initialize()` only; a retry would succeed.
    pub fn failing_init(self) -> Self {
        self.fail_init.store(true, Ordering::SeqCst);
        self
    }

    pub fn init_calls(&self) -> usize {
        self.init_calls.load(Ordering::SeqCst)
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn reads(&self) -> Vec<Instant> {
        self.reads.lock().unwrap().clone()
    }
}

#[async_trait]
impl SensorReader for ScriptedSensor {
    async fn initialize(&self) -> Result<()> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_init.swap(false, Ordering::SeqCst) {
            return Err(Error::Init(anyhow!("no device at 0x77")));
        }
        Ok(())
    }

    async fn read_sample(&self) -> Result<Measurement> {
        self.reads.lock().unwrap().push(Instant::now());

        let step = self.script.lock().unwrap().pop_front();
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match step {
            Some(Step::Sample(m)) => Ok(m),
            Some(Step::Fail) => Err(Error::Read(anyhow!("i2c bus timeout"))),
            None => Err(Error::Read(anyhow!("script exhausted"))),
        }
    }
}

#[derive(Default)]
pub struct RecordingPublisher {
    fail: bool,
    updates: Mutex<Vec<(Metric, f64)>>,
}

impl RecordingPublisher {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn updates(&self) -> Vec<(Metric, f64)> {
        self.updates.lock().unwrap().clone()
    }
}

#[async_trait]
impl LiveStatePublisher for RecordingPublisher {
    async fn set_characteristic(&self, metric: Metric, value: f64) -> anyhow::Result<()> {
        if self.fail {
            bail!("accessory unreachable");
        }
        self.updates.lock().unwrap().push((metric, value));
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingHistory {
    fail: bool,
    entries: Mutex<Vec<HistoryEntry>>,
}

impl RecordingHistory {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl HistoryLogger for RecordingHistory {
    async fn add_entry(&self, entry: HistoryEntry) -> anyhow::Result<()> {
        if self.fail {
            bail!("history storage full");
        }
        self.entries.lock().unwrap().push(entry);
        Ok(())
    }
}

pub fn config(refresh_secs: u64) -> BridgeConfig {
    BridgeConfig::new("test-pi", DisplayNames::new("BME680"))
        .with_refresh(RefreshInterval::new(refresh_secs).expect("non-zero refresh"))
}

pub struct Harness {
    pub sensor: Arc<ScriptedSensor>,
    pub publisher: Arc<RecordingPublisher>,
    pub history: Arc<RecordingHistory>,
    pub polling: Arc<PollingLoop>,
}

impl Harness {
    pub fn new(sensor: ScriptedSensor, refresh_secs: u64) -> Self {
        Self::with_sinks(
            sensor,
            RecordingPublisher::default(),
            RecordingHistory::default(),
            refresh_secs,
        )
    }

    pub fn with_sinks(
        sensor: ScriptedSensor,
        publisher: RecordingPublisher,
        history: RecordingHistory,
        refresh_secs: u64,
    ) -> Self {
        let sensor = Arc::new(sensor);
        let publisher = Arc::new(publisher);
        let history = Arc::new(history);

        let polling = Arc::new(PollingLoop::new(
            config(refresh_secs),
            Some(sensor.clone() as Arc<dyn SensorReader>),
            publisher.clone(),
            history.clone(),
        ));

        Self {
            sensor,
            publisher,
            history,
            polling,
        }
    }
}

/// Collects formatted log lines emitted on the current thread while held.
#[derive(Clone, Default)]
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    pub fn install() -> (Self, DefaultGuard) {
        let capture = Self::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .without_time()
            .finish();

        (capture, tracing::subscriber::set_default(subscriber))
    }

    pub fn lines(&self) -> Vec<String> {
        let buffer = self.buffer.lock().unwrap();
        String::from_utf8_lossy(&buffer)
            .lines()
            .map(str::to_owned)
            .collect()
    }

    pub fn lines_at(&self, level: &str) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|line| line.trim_start().starts_with(level))
            .collect()
    }

    pub fn clear(&self) {
        self.buffer.lock().unwrap().clear();
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
