use std::{
    path::{Path, PathBuf},
    sync::{
        OnceLock,
        atomic::{AtomicUsize, Ordering},
    },
};

use anyhow::{Context as _, Result, anyhow, bail};
use async_trait::async_trait;
use chrono::Utc;
use csv::{Reader, StringRecord};
use tracing::debug;

use crate::{
    Error,
    sensor::{Measurement, SensorData, SensorOptions, SensorReader},
};

const TEMPERATURE_INDEX: usize = 0;
const PRESSURE_INDEX: usize = 1;
const HUMIDITY_INDEX: usize = 2;
const GAS_RESISTANCE_INDEX: usize = 3;
const HEAT_STABLE_INDEX: usize = 4;

/// Replays raw BME680 samples recorded in a CSV file, one row per read.
///
/// The file needs a header row followed by
/// `temperature,pressure,humidity,gas_resistance,heat_stable` records. Rows are
/// loaded on `initialize()` and cycle once exhausted. Each sample is stamped with
/// the time it is read.
#[derive(Debug)]
pub struct CsvReplaySensor {
    path: PathBuf,
    options: SensorOptions,
    samples: OnceLock<Vec<SensorData>>,
    cursor: AtomicUsize,
}

impl CsvReplaySensor {
    pub fn new(path: impl Into<PathBuf>, options: SensorOptions) -> Self {
        Self {
            path: path.into(),
            options,
            samples: OnceLock::new(),
            cursor: AtomicUsize::new(0),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn options(&self) -> SensorOptions {
        self.options
    }

    async fn load(&self) -> Result<Vec<SensorData>> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("failed to read replay file: {:?}", self.path))?;

        parse_samples(&bytes).with_context(|| format!("failed to parse replay file: {:?}", self.path))
    }
}

#[async_trait]
impl SensorReader for CsvReplaySensor {
    async fn initialize(&self) -> crate::Result<()> {
        if self.samples.get().is_some() {
            return Ok(());
        }

        let samples = self.load().await.map_err(Error::Init)?;
        debug!(
            "loaded {} replay samples from {:?} ({})",
            samples.len(),
            self.path,
            self.options
        );

        // A concurrent initialize may have won; both loaded the same file.
        let _ = self.samples.set(samples);

        Ok(())
    }

    async fn read_sample(&self) -> crate::Result<Measurement> {
        let samples = self.samples.get().ok_or(Error::NotInitialized)?;

        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % samples.len();
        let data = samples
            .get(index)
            .ok_or_else(|| Error::Read(anyhow!("replay sample {index} out of range")))?;

        Ok(Measurement::from_sensor_data(Utc::now().timestamp(), data))
    }
}

/// Parses replay rows. An input without any data row is rejected.
pub fn parse_samples(bytes: &[u8]) -> Result<Vec<SensorData>> {
    let mut reader = Reader::from_reader(bytes);

    let samples = reader
        .records()
        .enumerate()
        .map(|(i, row)| {
            let row = row.with_context(|| format!("failed to read row {}", i + 1))?;
            parse_row(&row).with_context(|| format!("failed to parse row {}", i + 1))
        })
        .collect::<Result<Vec<_>>>()?;

    if samples.is_empty() {
        bail!("replay file contains no samples");
    }

    Ok(samples)
}

fn parse_row(row: &StringRecord) -> Result<SensorData> {
    let temperature = field(row, TEMPERATURE_INDEX, "temperature")?;
    let pressure = field(row, PRESSURE_INDEX, "pressure")?;
    let humidity = field(row, HUMIDITY_INDEX, "humidity")?;
    let gas_resistance = field(row, GAS_RESISTANCE_INDEX, "gas_resistance")?;
    let heat_stable = field(row, HEAT_STABLE_INDEX, "heat_stable")?;

    Ok(SensorData {
        temperature: temperature
            .parse()
            .with_context(|| format!("failed to parse temperature: {temperature}"))?,
        pressure: pressure
            .parse()
            .with_context(|| format!("failed to parse pressure: {pressure}"))?,
        humidity: humidity
            .parse()
            .with_context(|| format!("failed to parse humidity: {humidity}"))?,
        gas_resistance: gas_resistance
            .parse()
            .with_context(|| format!("failed to parse gas resistance: {gas_resistance}"))?,
        heat_stable: parse_flag(heat_stable)
            .with_context(|| format!("failed to parse heat_stable: {heat_stable}"))?,
    })
}

fn field<'a>(row: &'a StringRecord, index: usize, name: &str) -> Result<&'a str> {
    row.get(index)
        .map(str::trim)
        .ok_or_else(|| anyhow!("missing {name} column"))
}

fn parse_flag(s: &str) -> Result<bool> {
    match s {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => bail!("expected true/false or 1/0"),
    }
}
