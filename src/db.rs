use anyhow::{Context as _, Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::sink::{HistoryEntry, HistoryLogger};

pub async fn new_pool(database_url: &str) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url)
        .await
        .context("failed to connect to database")
}

pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS bme680_history (
            device_id TEXT NOT NULL,
            measured_at TIMESTAMPTZ NOT NULL,
            temperature_celsius FLOAT8 NOT NULL,
            pressure_hpa FLOAT8 NOT NULL,
            humidity_percent FLOAT8 NOT NULL,
            air_quality FLOAT8 NOT NULL,
            PRIMARY KEY (device_id, measured_at)
        )
        "#,
    )
    .execute(pool)
    .await
    .context("failed to create bme680_history table")?;

    Ok(())
}

pub async fn bulk_insert_history_entries(
    pool: &PgPool,
    device_id: &str,
    entries: &[HistoryEntry],
) -> Result<()> {
    if entries.is_empty() {
        return Ok(());
    }

    let device_ids: Vec<String> = entries.iter().map(|_| device_id.to_owned()).collect();
    let measured_ats: Vec<DateTime<Utc>> = entries
        .iter()
        .map(|e| {
            DateTime::from_timestamp(e.time, 0)
                .ok_or_else(|| anyhow!("timestamp out of range: {}", e.time))
        })
        .collect::<Result<_>>()?;
    let temperature_celsiuses: Vec<f64> = entries.iter().map(|e| e.temp).collect();
    let pressure_hpas: Vec<f64> = entries.iter().map(|e| e.pressure).collect();
    let humidity_percents: Vec<f64> = entries.iter().map(|e| e.humidity).collect();
    let air_qualities: Vec<f64> = entries.iter().map(|e| e.air_quality).collect();

    let mut tx = pool.begin().await.context("failed to begin transaction")?;

    sqlx::query(
        r#"
        INSERT INTO bme680_history (device_id, measured_at, temperature_celsius, pressure_hpa, humidity_percent, air_quality)
        SELECT * FROM UNNEST($1::TEXT[], $2::TIMESTAMPTZ[], $3::FLOAT8[], $4::FLOAT8[], $5::FLOAT8[], $6::FLOAT8[])
        ON CONFLICT (device_id, measured_at) DO NOTHING
        "#,
    )
    .bind(device_ids)
    .bind(measured_ats)
    .bind(temperature_celsiuses)
    .bind(pressure_hpas)
    .bind(humidity_percents)
    .bind(air_qualities)
    .execute(&mut *tx)
    .await
    .context("failed to execute bulk insert query")?;

    tx.commit().await.context("failed to commit transaction")?;

    Ok(())
}

/// Writes history entries to the `bme680_history` table.
#[derive(Debug, Clone)]
pub struct PgHistoryLogger {
    pool: PgPool,
    device_id: String,
}

impl PgHistoryLogger {
    pub fn new(pool: PgPool, device_id: impl Into<String>) -> Self {
        Self {
            pool,
            device_id: device_id.into(),
        }
    }
}

#[async_trait]
impl HistoryLogger for PgHistoryLogger {
    async fn add_entry(&self, entry: HistoryEntry) -> Result<()> {
        bulk_insert_history_entries(&self.pool, &self.device_id, &[entry])
            .await
            .context("failed to insert history entry")
    }
}
