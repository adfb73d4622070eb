use laundry_ledger::{start_server, ServerConfig};
use log::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env를 먼저 읽어야 RUST_LOG도 적용된다
    let config = ServerConfig::from_env()?;

    // 로깅 초기화
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("설정 로드 완료: 포트 {}, 저장소 {}", config.port, config.database.describe());

    start_server(config).await
}
