use std::{
    fs::{File, OpenOptions},
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use anyhow::{Context as _, Result, anyhow};
use async_trait::async_trait;
use chrono::DateTime;
use chrono_tz::Tz;
use csv::{Writer, WriterBuilder};

use crate::sink::HistoryEntry;

const HEADER: [&str; 6] = [
    "time",
    "measured_at",
    "temp",
    "pressure",
    "humidity",
    "air_quality",
];

/// Persists one entry per stable reading.
#[async_trait]
pub trait HistoryLogger: Send + Sync {
    async fn add_entry(&self, entry: HistoryEntry) -> Result<()>;
}

/// Appends history entries to a CSV file, writing the header when the file is
/// new or empty.
#[derive(Debug)]
pub struct CsvHistoryLogger {
    path: PathBuf,
    timezone: Tz,
    writer: Mutex<Writer<File>>,
}

impl CsvHistoryLogger {
    pub fn open(path: impl AsRef<Path>, timezone: Tz) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("failed to open history file: {path:?}"))?;
        let is_empty = file
            .metadata()
            .with_context(|| format!("failed to stat history file: {path:?}"))?
            .len()
            == 0;

        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        if is_empty {
            writer
                .write_record(HEADER)
                .context("failed to write history header")?;
            writer.flush().context("failed to flush history header")?;
        }

        Ok(Self {
            path,
            timezone,
            writer: Mutex::new(writer),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl HistoryLogger for CsvHistoryLogger {
    async fn add_entry(&self, entry: HistoryEntry) -> Result<()> {
        let measured_at = DateTime::from_timestamp(entry.time, 0)
            .ok_or_else(|| anyhow!("timestamp out of range: {}", entry.time))?
            .with_timezone(&self.timezone);

        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writer
            .write_record([
                entry.time.to_string(),
                measured_at.to_rfc3339(),
                entry.temp.to_string(),
                entry.pressure.to_string(),
                entry.humidity.to_string(),
                entry.air_quality.to_string(),
            ])
            .with_context(|| format!("failed to write history entry to {:?}", self.path))?;
        writer
            .flush()
            .with_context(|| format!("failed to flush history file: {:?}", self.path))?;

        Ok(())
    }
}
