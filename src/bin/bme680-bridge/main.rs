mod args;

use std::{process::ExitCode, sync::Arc};

use anyhow::{Context as _, Result, anyhow};
use args::{Args, Storage};
use bme680_bridge::{
    db::{PgHistoryLogger, ensure_schema, new_pool},
    polling::PollingLoop,
    sensor::{CsvReplaySensor, SensorReader},
    sink::{CsvHistoryLogger, HistoryLogger, LogPublisher},
};
use clap::Parser as _;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt as tracing_format};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_format()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_line_number(true)
        .init();

    if let Err(e) = run().await {
        eprintln!("{e:#}");
        return ExitCode::from(1);
    }

    ExitCode::from(0)
}

async fn run() -> Result<()> {
    let args = Args::parse();

    let config = args.bridge_config().context("invalid configuration")?;
    info!("BME680 sensor options: {}", config.sensor);

    let accessory = config.accessory_info();
    info!(
        "accessory: manufacturer = {}, model = {}, serial = {}, firmware = {}",
        accessory.manufacturer,
        accessory.model,
        accessory.serial_number,
        accessory.firmware_revision
    );

    let sensor: Option<Arc<dyn SensorReader>> = match &args.replay_file {
        Some(path) => Some(Arc::new(CsvReplaySensor::new(path, config.sensor))),
        None => None,
    };

    let history: Arc<dyn HistoryLogger> = match args.storage {
        Storage::Fs => Arc::new(
            CsvHistoryLogger::open(&args.history_file, args.timezone)
                .context("failed to open history file")?,
        ),
        Storage::Postgres => {
            let database_url = args
                .database_url
                .as_deref()
                .ok_or_else(|| anyhow!("--database-url is required for postgres storage"))?;
            let pool = new_pool(database_url)
                .await
                .context("failed to connect to database")?;
            ensure_schema(&pool)
                .await
                .context("failed to prepare history table")?;
            Arc::new(PgHistoryLogger::new(pool, config.device_id.clone()))
        }
    };
    info!(
        "history window: {} minutes per entry",
        config.history_minutes()
    );

    let publisher = Arc::new(LogPublisher::new(config.names.clone()));

    let polling = Arc::new(PollingLoop::new(config, sensor, publisher, history));
    let handle = polling.spawn();

    if polling.initialize().await.is_err() {
        warn!("continuing without a ready sensor");
    }

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    handle.cancel();

    info!("shutting down: {:?}", polling.stats());

    Ok(())
}
