//! API 오류와 HTTP 응답 변환
//!
//! 모든 실패는 `{ success: false, message }` 형태로 응답한다.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::error;

use crate::api::models::MessageResponse;
use crate::db::StoreError;
use crate::ledger::EntryValidationError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 요청 값 검증 실패 (400)
    #[error("{0}")]
    Validation(String),

    /// 저장소 오류 (500), 원인 메시지를 그대로 전달
    #[error("{context}: {source}")]
    Storage {
        context: &'static str,
        #[source]
        source: StoreError,
    },
}

impl ApiError {
    pub fn storage(context: &'static str, source: StoreError) -> Self {
        ApiError::Storage { context, source }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<EntryValidationError> for ApiError {
    fn from(err: EntryValidationError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Storage { .. } = &self {
            error!("{}", self);
        }

        let status = self.status_code();
        (status, Json(MessageResponse::failure(self.to_string()))).into_response()
    }
}
