use serde::{Deserialize, Serialize};

use crate::ledger::LedgerEntryView;

/// 세탁 기록 조회 요청
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct FetchEntriesRequest {
    pub job: Option<String>,
}

/// 세탁 기록 조회 응답
#[derive(Debug, Serialize, Deserialize)]
pub struct FetchEntriesResponse {
    pub success: bool,
    pub data: Vec<LedgerEntryView>,
}

/// 단순 성공/실패 응답
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// 헬스체크 응답
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub server_time: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub resource: Option<String>,
}

/// 루트 경로 안내 응답
#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub endpoints: Vec<&'static str>,
    pub timestamp: String,
}
