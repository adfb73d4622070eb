use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::ledger::{resolve_display_name, LedgerEntryView, UNKNOWN_JOB};

/// laundry_logs + players 조인 결과
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LedgerRow {
    pub id: i64,
    pub citizenid: String,
    pub charinfo: Option<String>,
    pub amount_dirty: i64,
    pub amount_clean: i64,
    pub rate: f64,
    /// UTC 기준으로 저장된다
    pub date: NaiveDateTime,
    pub job: Option<String>,
}

impl From<LedgerRow> for LedgerEntryView {
    fn from(row: LedgerRow) -> Self {
        Self {
            id: row.id,
            name: resolve_display_name(row.charinfo.as_deref()),
            citizen_id: row.citizenid,
            amount_dirty: row.amount_dirty,
            amount_clean: row.amount_clean,
            rate: row.rate,
            date: row.date.and_utc(),
            job: row
                .job
                .filter(|job| !job.is_empty())
                .unwrap_or_else(|| UNKNOWN_JOB.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(charinfo: Option<&str>, job: Option<&str>) -> LedgerRow {
        LedgerRow {
            id: 7,
            citizenid: "XYZ".into(),
            charinfo: charinfo.map(str::to_owned),
            amount_dirty: 1000,
            amount_clean: 800,
            rate: 0.8,
            date: NaiveDate::from_ymd_opt(2026, 1, 2)
                .unwrap()
                .and_hms_opt(3, 4, 5)
                .unwrap(),
            job: job.map(str::to_owned),
        }
    }

    #[test]
    fn test_row_to_view() {
        let view = LedgerEntryView::from(row(
            Some(r#"{"firstname":"Ana","lastname":"Costa"}"#),
            Some("vanilla"),
        ));
        assert_eq!(view.name, "Ana Costa");
        assert_eq!(view.job, "vanilla");
        assert_eq!(view.date.to_rfc3339(), "2026-01-02T03:04:05+00:00");
    }

    #[test]
    fn test_missing_job_and_identity() {
        let view = LedgerEntryView::from(row(None, None));
        assert_eq!(view.name, "Unknown");
        assert_eq!(view.job, "unknown");
    }
}
