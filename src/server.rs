use std::sync::Arc;

use axum::http::Method;
use axum::Router;
use log::info;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::create_api_router;
use crate::config::ServerConfig;
use crate::db::{init_database, LedgerStore};
use crate::ledger::ValidationPolicy;

/// 서버 상태
#[derive(Clone)]
pub struct ServerState {
    pub store: Arc<dyn LedgerStore>,
    pub validation: ValidationPolicy,
}

impl ServerState {
    pub fn new(store: Arc<dyn LedgerStore>, validation: ValidationPolicy) -> Self {
        Self { store, validation }
    }
}

/// 모든 출처 허용 + 자격 증명 허용
///
/// 와일드카드 출처는 자격 증명과 함께 쓸 수 없어 요청 출처를 그대로 돌려준다.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// 라우터와 미들웨어 조립
pub fn build_app(state: ServerState) -> Router {
    create_api_router()
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// 서버 시작
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    info!("세탁 기록 서버 시작 중...");

    let store = init_database(&config.database).await?;
    let state = ServerState::new(store, config.validation);
    let app = build_app(state);

    let addr = format!("{}:{}", config.bind_addr, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("서버가 성공적으로 시작되었습니다! http://{}", addr);
    info!("연결 확인: http://localhost:{}/api/health", config.port);

    axum::serve(listener, app).await?;

    Ok(())
}
