use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap},
    response::Json,
};
use chrono::{Local, SecondsFormat, Utc};
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::models::*;
use crate::api::routes::{COMPAT_RESOURCE, ENDPOINTS};
use crate::error::ApiError;
use crate::ledger::{JobScope, NewLedgerEntry};
use crate::server::ServerState;

/// 세탁 기록 조회 핸들러
pub async fn fetch_entries(
    State(state): State<ServerState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<FetchEntriesResponse>, ApiError> {
    let request: FetchEntriesRequest = json_body(&headers, &body)?;
    let scope = JobScope::from_request(request.job.as_deref());

    let data = state
        .store
        .fetch_entries(&scope)
        .await
        .map_err(|e| ApiError::storage("Erro ao buscar dados do banco de dados", e))?;

    Ok(Json(FetchEntriesResponse {
        success: true,
        data,
    }))
}

/// 세탁 기록 추가 핸들러
pub async fn add_entry(
    State(state): State<ServerState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<MessageResponse>, ApiError> {
    let body: Value = json_body(&headers, &body)?;
    let entry = NewLedgerEntry::from_request(&body, state.validation)?;

    let context = "Erro ao adicionar registro no banco de dados";
    state
        .store
        .ensure_schema()
        .await
        .map_err(|e| ApiError::storage(context, e))?;
    let id = state
        .store
        .insert_entry(&entry)
        .await
        .map_err(|e| ApiError::storage(context, e))?;

    info!(
        "💸 세탁 기록 추가 #{}: 플레이어 {} 세탁액 {} → {} (비율 {:.1}%, job {})",
        id,
        entry.citizen_id,
        entry.amount_dirty,
        entry.amount_clean,
        entry.rate * 100.0,
        entry.job
    );

    Ok(Json(MessageResponse::ok("Registro adicionado com sucesso")))
}

/// 헬스체크 핸들러
pub async fn health() -> Json<HealthResponse> {
    Json(health_payload(None))
}

/// 호환 경로용 헬스체크 (resource 태그 포함)
pub async fn compat_health() -> Json<HealthResponse> {
    Json(health_payload(Some(COMPAT_RESOURCE)))
}

/// 루트 경로 안내
pub async fn index() -> Json<IndexResponse> {
    Json(IndexResponse {
        status: "online",
        message: "Servidor de lavagem está funcionando",
        endpoints: ENDPOINTS.to_vec(),
        timestamp: iso_timestamp(),
    })
}

pub fn health_payload(resource: Option<&str>) -> HealthResponse {
    HealthResponse {
        status: "online".to_string(),
        timestamp: iso_timestamp(),
        server_time: Local::now().format("%d/%m/%Y, %H:%M:%S").to_string(),
        resource: resource.map(str::to_owned),
    }
}

fn iso_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// 요청 본문 해석
///
/// 본문이 비었거나 JSON 타입이 아니면 빈 요청(`T::default()`)으로 본다.
/// JSON이라고 선언했는데 깨져 있을 때만 400.
fn json_body<T: DeserializeOwned + Default>(headers: &HeaderMap, body: &Bytes) -> Result<T, ApiError> {
    if !is_json_content(headers) || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }

    serde_json::from_slice(body).map_err(|e| {
        warn!("잘못된 요청 본문: {}", e);
        ApiError::Validation(format!("Requisição inválida: {}", e))
    })
}

fn is_json_content(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|mime| {
            let mime = mime.trim().to_ascii_lowercase();
            mime == "application/json" || mime.ends_with("+json")
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn json_headers(content_type: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        headers
    }

    #[test]
    fn test_missing_body_is_empty_request() {
        let request: FetchEntriesRequest = json_body(&HeaderMap::new(), &Bytes::new()).unwrap();
        assert_eq!(request.job, None);

        let request: FetchEntriesRequest =
            json_body(&json_headers("application/json"), &Bytes::from_static(b"  ")).unwrap();
        assert_eq!(request.job, None);

        let request: FetchEntriesRequest =
            json_body(&json_headers("text/plain"), &Bytes::from_static(b"job=bope")).unwrap();
        assert_eq!(request.job, None);
    }

    #[test]
    fn test_json_body_parsed() {
        let request: FetchEntriesRequest = json_body(
            &json_headers("application/json; charset=utf-8"),
            &Bytes::from_static(br#"{"job":"bope"}"#),
        )
        .unwrap();
        assert_eq!(request.job.as_deref(), Some("bope"));

        let result: Result<FetchEntriesRequest, _> =
            json_body(&json_headers("application/json"), &Bytes::from_static(b"{job:"));
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }
}
