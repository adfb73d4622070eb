use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 한 번에 돌려주는 최대 기록 수
pub const MAX_ENTRIES: i64 = 100;

/// 신원 정보를 찾지 못했을 때의 표시 이름
pub const UNKNOWN_NAME: &str = "Unknown";

/// job 컬럼이 비어 있을 때의 표시값
pub const UNKNOWN_JOB: &str = "unknown";

/// 금액 상한 (저장 컬럼이 INT)
pub const MAX_AMOUNT: i64 = i32::MAX as i64;

/// 필터를 건너뛰는 권한 태그
const ELEVATED_SCOPES: [&str; 3] = ["admin", "god", "all"];

/// 조회 범위
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobScope {
    /// 직업 필터 없음
    All,
    /// 특정 직업 태그만
    Job(String),
}

impl JobScope {
    /// 요청 본문의 `job` 값으로부터 범위 결정
    ///
    /// 값이 없거나 비어 있으면 필터 없이 조회한다. 태그는 저장된 값과 그대로 비교한다.
    pub fn from_request(job: Option<&str>) -> Self {
        match job {
            None | Some("") => JobScope::All,
            Some(tag) if ELEVATED_SCOPES.contains(&tag) => JobScope::All,
            Some(tag) => JobScope::Job(tag.to_string()),
        }
    }

    pub fn job_filter(&self) -> Option<&str> {
        match self {
            JobScope::All => None,
            JobScope::Job(tag) => Some(tag.as_str()),
        }
    }
}

/// 응답용 세탁 기록
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntryView {
    pub id: i64,
    pub name: String,
    #[serde(rename = "citizenid")]
    pub citizen_id: String,
    pub amount_dirty: i64,
    pub amount_clean: i64,
    pub rate: f64,
    pub date: DateTime<Utc>,
    pub job: String,
}

/// 검증을 통과한 신규 기록 (id와 date는 저장 시 부여)
#[derive(Debug, Clone, PartialEq)]
pub struct NewLedgerEntry {
    pub citizen_id: String,
    pub amount_dirty: i64,
    pub amount_clean: i64,
    pub rate: f64,
    pub job: String,
}

/// 필수 필드 누락 판단 기준
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationPolicy {
    /// 0, 빈 문자열, false, null 모두 누락으로 취급 (기존 동작)
    #[default]
    Truthy,
    /// 값이 없거나 null일 때만 누락으로 취급
    PresenceOnly,
}

impl ValidationPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "truthy" => Some(ValidationPolicy::Truthy),
            "presence" | "presence-only" => Some(ValidationPolicy::PresenceOnly),
            _ => None,
        }
    }

    fn is_missing(&self, value: Option<&Value>) -> bool {
        match (self, value) {
            (_, None) | (_, Some(Value::Null)) => true,
            (ValidationPolicy::PresenceOnly, Some(_)) => false,
            (ValidationPolicy::Truthy, Some(Value::Bool(b))) => !b,
            (ValidationPolicy::Truthy, Some(Value::Number(n))) => n.as_f64() == Some(0.0),
            (ValidationPolicy::Truthy, Some(Value::String(s))) => s.is_empty(),
            (ValidationPolicy::Truthy, Some(_)) => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EntryValidationError {
    #[error("Dados incompletos")]
    Incomplete,
    #[error("Campo inválido: {0}")]
    InvalidField(&'static str),
}

impl NewLedgerEntry {
    /// 적재 요청 본문 검증
    ///
    /// 필드 순서는 citizenid, amountDirty, amountClean, rate, job.
    pub fn from_request(body: &Value, policy: ValidationPolicy) -> Result<Self, EntryValidationError> {
        let field = |name: &str| body.get(name);
        let required = ["citizenid", "amountDirty", "amountClean", "rate", "job"];
        if required.iter().any(|name| policy.is_missing(field(name))) {
            return Err(EntryValidationError::Incomplete);
        }

        let citizen_id = string_field(field("citizenid"), "citizenid")?;
        let amount_dirty = amount_field(field("amountDirty"), "amountDirty")?;
        let amount_clean = amount_field(field("amountClean"), "amountClean")?;
        let rate = field("rate")
            .and_then(Value::as_f64)
            .ok_or(EntryValidationError::InvalidField("rate"))?;
        let job = string_field(field("job"), "job")?;

        Ok(Self {
            citizen_id,
            amount_dirty,
            amount_clean,
            rate,
            job,
        })
    }
}

fn string_field(value: Option<&Value>, name: &'static str) -> Result<String, EntryValidationError> {
    match value {
        Some(Value::String(s)) => Ok(s.clone()),
        // 게임 쪽에서 숫자 citizenid를 보내는 경우가 있다
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => Err(EntryValidationError::InvalidField(name)),
    }
}

fn amount_field(value: Option<&Value>, name: &'static str) -> Result<i64, EntryValidationError> {
    let amount = value
        .and_then(Value::as_f64)
        .ok_or(EntryValidationError::InvalidField(name))?;
    if !amount.is_finite() || amount < 0.0 {
        return Err(EntryValidationError::InvalidField(name));
    }
    let rounded = amount.round();
    if rounded > MAX_AMOUNT as f64 {
        return Err(EntryValidationError::InvalidField(name));
    }
    Ok(rounded as i64)
}

/// players.charinfo JSON에서 "이름 성" 추출
pub fn resolve_display_name(charinfo: Option<&str>) -> String {
    let parsed = charinfo.and_then(|raw| serde_json::from_str::<Value>(raw).ok());
    let part = |info: &Value, key: &str| {
        info.get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
    };

    parsed
        .as_ref()
        .and_then(|info| Some(format!("{} {}", part(info, "firstname")?, part(info, "lastname")?)))
        .unwrap_or_else(|| UNKNOWN_NAME.to_string())
}
