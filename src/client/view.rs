//! 패널 표 필터와 통계
//!
//! 날짜 구간은 패널이 실행되는 지역 시간 기준이며 한 주는 일요일에 시작한다.

use std::collections::HashSet;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Days, Local, TimeZone, Utc};

use crate::ledger::LedgerEntryView;

/// job 필터에서 '전체'를 뜻하는 값
pub const ALL_JOBS: &str = "all";

/// 날짜 필터 구간
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateWindow {
    #[default]
    All,
    Today,
    Week,
    Month,
}

impl FromStr for DateWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(DateWindow::All),
            "today" => Ok(DateWindow::Today),
            "week" => Ok(DateWindow::Week),
            "month" => Ok(DateWindow::Month),
            other => Err(format!("unknown date window: {}", other)),
        }
    }
}

impl DateWindow {
    /// 구간 시작 시각 (전체면 None)
    pub fn start<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Option<DateTime<Utc>> {
        let today = now.date_naive();
        let first_day = match self {
            DateWindow::All => return None,
            DateWindow::Today => today,
            DateWindow::Week => {
                today.checked_sub_days(Days::new(today.weekday().num_days_from_sunday() as u64))?
            }
            DateWindow::Month => today.with_day(1)?,
        };

        let midnight = first_day.and_hms_opt(0, 0, 0)?;
        now.timezone()
            .from_local_datetime(&midnight)
            .earliest()
            .map(|start| start.with_timezone(&Utc))
    }
}

/// 표 아래 통계
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LedgerStats {
    pub total_dirty: i64,
    pub total_clean: i64,
    pub average_rate: f64,
    pub operations: usize,
}

impl LedgerStats {
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a LedgerEntryView>,
    {
        let mut stats = LedgerStats::default();
        let mut rate_sum = 0.0;
        for entry in entries {
            stats.total_dirty = stats.total_dirty.saturating_add(entry.amount_dirty);
            stats.total_clean = stats.total_clean.saturating_add(entry.amount_clean);
            rate_sum += entry.rate;
            stats.operations += 1;
        }
        if stats.operations > 0 {
            stats.average_rate = rate_sum / stats.operations as f64;
        }
        stats
    }
}

/// 필터가 적용된 패널 화면 데이터
#[derive(Debug, Clone, PartialEq)]
pub struct PanelView {
    pub rows: Vec<LedgerEntryView>,
    pub stats: LedgerStats,
    /// job 필터 선택지 (처음 등장한 순서)
    pub jobs: Vec<String>,
}

impl PanelView {
    pub fn build<Tz: TimeZone>(
        entries: &[LedgerEntryView],
        job_filter: &str,
        window: DateWindow,
        now: &DateTime<Tz>,
    ) -> Self {
        let rows = filter_entries(entries, job_filter, window, now);
        let stats = LedgerStats::from_entries(&rows);
        Self {
            rows,
            stats,
            jobs: distinct_jobs(entries),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub fn filter_entries<Tz: TimeZone>(
    entries: &[LedgerEntryView],
    job_filter: &str,
    window: DateWindow,
    now: &DateTime<Tz>,
) -> Vec<LedgerEntryView> {
    let since = window.start(now);
    entries
        .iter()
        .filter(|e| job_filter == ALL_JOBS || e.job == job_filter)
        .filter(|e| since.map_or(true, |start| e.date >= start))
        .cloned()
        .collect()
}

pub fn distinct_jobs(entries: &[LedgerEntryView]) -> Vec<String> {
    let mut seen = HashSet::new();
    entries
        .iter()
        .filter(|e| seen.insert(e.job.as_str()))
        .map(|e| e.job.clone())
        .collect()
}

/// job 태그의 표시 이름
pub fn job_display_name(job: Option<&str>) -> String {
    let job = match job {
        None | Some("") => return "Desconhecido".into(),
        Some(job) => job,
    };

    match job {
        "vanilla" => "Vanilla Unicorn".into(),
        "bope" => "BOPE".into(),
        "tatico" => "Tático".into(),
        "prf1" => "PRF Nível 1".into(),
        "prf2" => "PRF Nível 2".into(),
        "admin" => "Administrador".into(),
        "unknown" => "Desconhecido".into(),
        other => {
            let mut chars = other.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
    }
}

/// pt-BR 천 단위 표기 (1.234.567)
pub fn format_money(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    if value < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// 비율을 백분율로 (0.85 → "85.0%")
pub fn format_rate(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

/// 지역 시간 pt-BR 표기
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.with_timezone(&Local).format("%d/%m/%Y, %H:%M:%S").to_string()
}
