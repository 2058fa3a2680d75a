use std::{num::ParseIntError, path::PathBuf};

use bme680_bridge::{
    Result,
    config::{BridgeConfig, DisplayNames, RefreshInterval},
    sensor::SensorOptions,
};
use chrono_tz::Tz;
use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Storage {
    /// Append history to a CSV file.
    Fs,
    /// Insert history into PostgreSQL.
    Postgres,
}

#[derive(Debug, Parser)]
pub struct Args {
    #[arg(long, env = "BME680_NAME", default_value = "BME680")]
    pub name: String,

    #[arg(long)]
    pub name_temperature: Option<String>,

    #[arg(long)]
    pub name_humidity: Option<String>,

    #[arg(long)]
    pub name_air_quality: Option<String>,

    #[arg(long, env = "HOSTNAME", default_value = "bme680")]
    pub device_id: String,

    /// Poll period in seconds.
    #[arg(
        long,
        env = "BME680_REFRESH",
        default_value_t = RefreshInterval::DEFAULT_SECS,
        value_parser = clap::value_parser!(u64).range(1..),
    )]
    pub refresh: u64,

    #[arg(long)]
    pub i2c_bus_no: Option<u8>,

    /// Decimal or `0x`-prefixed hex.
    #[arg(long, value_parser = parse_i2c_address)]
    pub i2c_address: Option<u16>,

    /// CSV of raw samples to replay as the sensor.
    #[arg(long, env = "BME680_REPLAY_FILE")]
    pub replay_file: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Storage::Fs)]
    pub storage: Storage,

    #[arg(long, default_value = "bme680-history.csv")]
    pub history_file: PathBuf,

    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    #[arg(long, env = "TZ", default_value = "UTC")]
    pub timezone: Tz,
}

impl Args {
    pub fn bridge_config(&self) -> Result<BridgeConfig> {
        let mut names = DisplayNames::new(&self.name);
        if let Some(name) = &self.name_temperature {
            names = names.with_temperature(name);
        }
        if let Some(name) = &self.name_humidity {
            names = names.with_humidity(name);
        }
        if let Some(name) = &self.name_air_quality {
            names = names.with_air_quality(name);
        }

        Ok(BridgeConfig::new(&self.device_id, names)
            .with_refresh(RefreshInterval::new(self.refresh)?)
            .with_sensor(SensorOptions {
                i2c_bus_no: self.i2c_bus_no,
                i2c_address: self.i2c_address,
            }))
    }
}

fn parse_i2c_address(s: &str) -> std::result::Result<u16, ParseIntError> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => s.parse(),
    }
}
