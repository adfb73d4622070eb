use async_trait::async_trait;
use chrono::{Duration, DurationRound, NaiveDateTime, Utc};
use log::debug;
use sqlx::mysql::MySqlPool;

use super::models::LedgerRow;
use super::{select_entries_sql, LedgerStore, StoreError};
use crate::ledger::{JobScope, LedgerEntryView, NewLedgerEntry};

/// MySQL 세탁 기록 저장소 (QBCore players 테이블과 조인)
pub struct MySqlLedgerRepository {
    pool: MySqlPool,
}

impl MySqlLedgerRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

/// DATETIME(3) 정밀도에 맞춘 현재 시각 (밀리초 올림)
///
/// 버림이면 저장값이 요청 시작 시각보다 앞설 수 있다.
fn insert_timestamp() -> NaiveDateTime {
    let now = Utc::now().naive_utc();
    match now.duration_trunc(Duration::milliseconds(1)) {
        Ok(truncated) if truncated < now => truncated + Duration::milliseconds(1),
        Ok(truncated) => truncated,
        Err(_) => now,
    }
}

#[async_trait]
impl LedgerStore for MySqlLedgerRepository {
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS laundry_logs (
                id INT NOT NULL AUTO_INCREMENT,
                citizenid VARCHAR(50) NOT NULL,
                amount_dirty INT NOT NULL,
                amount_clean INT NOT NULL,
                rate DOUBLE NOT NULL,
                date DATETIME(3) NOT NULL DEFAULT CURRENT_TIMESTAMP(3),
                job VARCHAR(50) NOT NULL DEFAULT 'unknown',
                PRIMARY KEY (id),
                KEY idx_laundry_logs_job (job)
            ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4"
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn fetch_entries(&self, scope: &JobScope) -> Result<Vec<LedgerEntryView>, StoreError> {
        let sql = select_entries_sql(scope);
        let mut query = sqlx::query_as::<_, LedgerRow>(&sql);
        if let Some(job) = scope.job_filter() {
            query = query.bind(job);
        }

        let rows = query.fetch_all(&self.pool).await?;
        debug!("세탁 기록 {}건 조회 ({:?})", rows.len(), scope);

        Ok(rows.into_iter().map(LedgerEntryView::from).collect())
    }

    async fn insert_entry(&self, entry: &NewLedgerEntry) -> Result<i64, StoreError> {
        let result = sqlx::query(
            "INSERT INTO laundry_logs (citizenid, amount_dirty, amount_clean, rate, date, job)
             VALUES (?, ?, ?, ?, ?, ?)"
        )
        .bind(&entry.citizen_id)
        .bind(entry.amount_dirty)
        .bind(entry.amount_clean)
        .bind(entry.rate)
        .bind(insert_timestamp())
        .bind(&entry.job)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_id() as i64)
    }
}
