//! DurableStore implementation for PostgreSQL

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;
use walkshed_core::error::{Result, WalkshedError};
use walkshed_core::models::{DurableEntry, LookupResponse, QuantizedCoordinate};

use super::PostgresStore;
use crate::ports::DurableStore;

#[async_trait]
impl DurableStore for PostgresStore {
    async fn insert(&self, entry: &DurableEntry) -> Result<()> {
        let response = serde_json::to_value(&entry.response).map_err(|e| {
            WalkshedError::Serialization(format!("Failed to serialize response: {}", e))
        })?;

        sqlx::query(
            r#"
            INSERT INTO lookup_cache
                (id, cache_key, quantized_lat, quantized_lon, decimals, response, created_at, expires_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(entry.key.cache_key())
        .bind(entry.key.lat())
        .bind(entry.key.lon())
        .bind(entry.key.decimals() as i32)
        .bind(response)
        .bind(entry.created_at)
        .bind(entry.expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| WalkshedError::Persistence(format!("Failed to insert cache entry: {}", e)))?;

        Ok(())
    }

    async fn find(&self, key: &QuantizedCoordinate) -> Result<Option<DurableEntry>> {
        let row = sqlx::query(
            r#"
            SELECT response, created_at, expires_at
            FROM lookup_cache
            WHERE quantized_lat = $1
              AND quantized_lon = $2
              AND decimals = $3
              AND expires_at > NOW()
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(key.lat())
        .bind(key.lon())
        .bind(key.decimals() as i32)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| WalkshedError::Persistence(format!("Failed to query cache entry: {}", e)))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let response: serde_json::Value = row
            .try_get("response")
            .map_err(|e| WalkshedError::Persistence(format!("Failed to read response: {}", e)))?;
        let created_at: DateTime<Utc> = row
            .try_get("created_at")
            .map_err(|e| WalkshedError::Persistence(format!("Failed to read created_at: {}", e)))?;
        let expires_at: DateTime<Utc> = row
            .try_get("expires_at")
            .map_err(|e| WalkshedError::Persistence(format!("Failed to read expires_at: {}", e)))?;

        let response: LookupResponse = serde_json::from_value(response).map_err(|e| {
            WalkshedError::Serialization(format!("Failed to deserialize response: {}", e))
        })?;

        Ok(Some(DurableEntry {
            key: *key,
            response,
            created_at,
            expires_at,
        }))
    }

    async fn purge_expired(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM lookup_cache WHERE expires_at <= NOW()")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                WalkshedError::Persistence(format!("Failed to purge expired entries: {}", e))
            })?;

        Ok(result.rows_affected())
    }

    async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| WalkshedError::Persistence(format!("Health check failed: {}", e)))?;
        Ok(())
    }
}
