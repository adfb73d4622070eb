use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use sqlx::sqlite::SqlitePool;

use super::models::LedgerRow;
use super::{select_entries_sql, LedgerStore, StoreError};
use crate::ledger::{JobScope, LedgerEntryView, NewLedgerEntry};

/// SQLite 세탁 기록 저장소 (개발 및 테스트용)
pub struct SqliteLedgerRepository {
    pool: SqlitePool,
}

impl SqliteLedgerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl LedgerStore for SqliteLedgerRepository {
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS laundry_logs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                citizenid TEXT NOT NULL,
                amount_dirty INTEGER NOT NULL,
                amount_clean INTEGER NOT NULL,
                rate REAL NOT NULL,
                date DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
                job TEXT NOT NULL DEFAULT 'unknown'
            )"
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_laundry_logs_job ON laundry_logs(job)")
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
        .bind(Utc::now().naive_utc())
        .bind(&entry.job)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn memory_repository() -> SqliteLedgerRepository {
        // 메모리 DB는 연결마다 따로 생기므로 연결을 하나로 고정
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::query("CREATE TABLE players (citizenid TEXT PRIMARY KEY, charinfo TEXT)")
            .execute(&pool)
            .await
            .unwrap();
        SqliteLedgerRepository::new(pool)
    }

    fn entry(citizen_id: &str, job: &str) -> NewLedgerEntry {
        NewLedgerEntry {
            citizen_id: citizen_id.into(),
            amount_dirty: 5000,
            amount_clean: 4000,
            rate: 0.8,
            job: job.into(),
        }
    }

    #[tokio::test]
    async fn test_ensure_schema_is_idempotent() {
        let repo = memory_repository().await;
        repo.ensure_schema().await.unwrap();
        repo.ensure_schema().await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_without_table_fails() {
        let repo = memory_repository().await;
        assert!(repo.fetch_entries(&JobScope::All).await.is_err());
    }

    #[tokio::test]
    async fn test_insert_and_fetch_newest_first() {
        let repo = memory_repository().await;
        repo.ensure_schema().await.unwrap();

        let first = repo.insert_entry(&entry("A1", "bope")).await.unwrap();
        let second = repo.insert_entry(&entry("A2", "tatico")).await.unwrap();
        assert!(second > first);

        let all = repo.fetch_entries(&JobScope::All).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, second);
        assert_eq!(all[1].id, first);

        let bope = repo.fetch_entries(&JobScope::Job("bope".into())).await.unwrap();
        assert_eq!(bope.len(), 1);
        assert_eq!(bope[0].citizen_id, "A1");
    }

    #[tokio::test]
    async fn test_join_resolves_names() {
        let repo = memory_repository().await;
        repo.ensure_schema().await.unwrap();
        sqlx::query("INSERT INTO players (citizenid, charinfo) VALUES (?, ?), (?, ?)")
            .bind("GOOD")
            .bind(r#"{"firstname":"Carlos","lastname":"Mendes"}"#)
            .bind("BAD")
            .bind("{broken")
            .execute(repo.pool())
            .await
            .unwrap();

        repo.insert_entry(&entry("GOOD", "vanilla")).await.unwrap();
        repo.insert_entry(&entry("BAD", "vanilla")).await.unwrap();
        repo.insert_entry(&entry("NOBODY", "vanilla")).await.unwrap();

        let entries = repo.fetch_entries(&JobScope::All).await.unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Unknown", "Unknown", "Carlos Mendes"]);
    }

    #[tokio::test]
    async fn test_fetch_is_capped() {
        let repo = memory_repository().await;
        repo.ensure_schema().await.unwrap();
        for i in 0..105 {
            repo.insert_entry(&entry(&format!("C{}", i), "prf1")).await.unwrap();
        }

        let entries = repo.fetch_entries(&JobScope::All).await.unwrap();
        assert_eq!(entries.len(), 100);
        assert!(entries.windows(2).all(|w| w[0].date >= w[1].date));
    }
}
