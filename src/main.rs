use order_store::config::ServerConfig;
use order_store::server::start_server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 환경 변수 로드 (.env 파일은 선택 사항)
    dotenv::dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::from_env();
    log::info!(
        "설정 로드 완료: port={}, database={}",
        config.rest_port, config.database_url
    );

    start_server(config).await
}
