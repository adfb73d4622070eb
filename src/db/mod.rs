pub mod models;
pub mod mysql;
pub mod repository;

use std::sync::Arc;

use async_trait::async_trait;
use log::info;
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::sqlite::SqlitePoolOptions;

use crate::config::{DatabaseConfig, DbDriver};
use crate::ledger::{JobScope, LedgerEntryView, NewLedgerEntry, MAX_ENTRIES};

pub use mysql::MySqlLedgerRepository;
pub use repository::SqliteLedgerRepository;

/// 저장소 오류
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// 세탁 기록 저장소
///
/// 기록은 추가만 되고 수정/삭제되지 않는다.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// laundry_logs 테이블이 없으면 생성 (여러 번 호출해도 안전)
    async fn ensure_schema(&self) -> Result<(), StoreError>;

    /// 범위에 맞는 최신 기록을 최대 [`MAX_ENTRIES`]건 조회
    async fn fetch_entries(&self, scope: &JobScope) -> Result<Vec<LedgerEntryView>, StoreError>;

    /// 기록 추가 후 부여된 id 반환
    ///
    /// 테이블 존재 여부는 호출자가 [`LedgerStore::ensure_schema`]로 보장한다.
    async fn insert_entry(&self, entry: &NewLedgerEntry) -> Result<i64, StoreError>;
}

/// 조회 쿼리 생성
///
/// FLOAT 컬럼으로 만들어진 기존 테이블도 f64로 읽히도록 rate에 1.0을 곱한다.
pub(crate) fn select_entries_sql(scope: &JobScope) -> String {
    let mut query = String::from(
        "SELECT l.id, l.citizenid, p.charinfo,
                l.amount_dirty, l.amount_clean,
                l.rate * 1.0 AS rate, l.date, l.job
         FROM laundry_logs l
         LEFT JOIN players p ON l.citizenid = p.citizenid",
    );

    if scope.job_filter().is_some() {
        query.push_str(" WHERE l.job = ?");
    }

    query.push_str(&format!(" ORDER BY l.date DESC, l.id DESC LIMIT {}", MAX_ENTRIES));
    query
}

/// 설정에 맞는 저장소 연결
///
/// 테이블 생성은 첫 적재 시점까지 미룬다.
pub async fn init_database(config: &DatabaseConfig) -> Result<Arc<dyn LedgerStore>, StoreError> {
    info!("🗄️  데이터베이스 연결 중... ({})", config.describe());

    let store: Arc<dyn LedgerStore> = match config.driver {
        DbDriver::MySql => {
            let options = MySqlPoolOptions::new().max_connections(config.max_connections);
            let pool = match &config.url_override {
                Some(url) => options.connect(url).await?,
                None => {
                    let connect = MySqlConnectOptions::new()
                        .host(&config.host)
                        .port(config.port)
                        .username(&config.user)
                        .password(&config.password)
                        .database(&config.name);
                    options.connect_with(connect).await?
                }
            };
            Arc::new(MySqlLedgerRepository::new(pool))
        }
        DbDriver::Sqlite => {
            let url = config
                .url_override
                .clone()
                .unwrap_or_else(|| format!("sqlite://{}.db?mode=rwc", config.name));
            let pool = SqlitePoolOptions::new()
                .max_connections(config.max_connections)
                .connect(&url)
                .await?;
            Arc::new(SqliteLedgerRepository::new(pool))
        }
    };

    info!("✅ 데이터베이스 연결 완료");

    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_sql_unfiltered() {
        let sql = select_entries_sql(&JobScope::All);
        assert!(!sql.contains("WHERE"));
        assert!(sql.ends_with("ORDER BY l.date DESC, l.id DESC LIMIT 100"));
    }

    #[test]
    fn test_select_sql_filtered() {
        let sql = select_entries_sql(&JobScope::Job("bope".into()));
        assert!(sql.contains("WHERE l.job = ?"));
    }
}
