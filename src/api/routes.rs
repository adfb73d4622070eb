use axum::{
    http::StatusCode,
    routing::{get, post, MethodRouter},
    Router,
};

use crate::api::handlers::*;
use crate::server::ServerState;

/// 예전 리소스 이름으로 들어오는 요청용 경로 접두어
pub const COMPAT_PREFIX: &str = "/api/thug-lavagem2";

/// 호환 헬스체크 응답의 resource 값
pub const COMPAT_RESOURCE: &str = "thug-lavagem2";

/// 루트 경로에서 안내하는 엔드포인트 목록
pub const ENDPOINTS: [&str; 6] = [
    "/api/health - Verificar status do servidor",
    "/api/laundry/data - Obter dados de lavagem (POST)",
    "/api/laundry/add - Adicionar registro de lavagem (POST)",
    "/api/thug-lavagem2/health - Verificar status para thug-lavagem2",
    "/api/thug-lavagem2/data - Compatibilidade com thug-lavagem2",
    "/api/thug-lavagem2/add - Compatibilidade com thug-lavagem2",
];

/// OPTIONS 요청은 본문 없이 200으로 응답
async fn preflight() -> StatusCode {
    StatusCode::OK
}

fn with_options(route: MethodRouter<ServerState>) -> MethodRouter<ServerState> {
    route.options(preflight)
}

/// API 라우터 생성
pub fn create_api_router() -> Router<ServerState> {
    Router::new()
        .route("/", with_options(get(index)))

        // 헬스체크
        .route("/api/health", with_options(get(health)))
        .route(&format!("{}/health", COMPAT_PREFIX), with_options(get(compat_health)))

        // 세탁 기록 API
        .route("/api/laundry/data", with_options(post(fetch_entries)))
        .route("/api/laundry/add", with_options(post(add_entry)))

        // 호환 경로 (동일 핸들러)
        .route(&format!("{}/data", COMPAT_PREFIX), with_options(post(fetch_entries)))
        .route(&format!("{}/add", COMPAT_PREFIX), with_options(post(add_entry)))
}
