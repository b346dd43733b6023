use std::env;
use std::str::FromStr;

use log::warn;

/// 서버 설정
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub rest_port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    /// GET 라우트의 IP별 초당 허용 요청 수
    pub get_rate_limit: u32,
    /// POST 라우트의 IP별 초당 허용 요청 수
    pub post_rate_limit: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            rest_port: 8080,
            database_url: "sqlite://orders.db?mode=rwc".into(),
            db_max_connections: 5,
            get_rate_limit: 100,
            post_rate_limit: 200,
        }
    }
}

impl ServerConfig {
    /// 환경 변수에서 설정 로드 (없거나 잘못된 값은 기본값 사용)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            rest_port: env_or("SERVER_PORT", defaults.rest_port),
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            db_max_connections: env_or("DB_MAX_CONNECTIONS", defaults.db_max_connections),
            get_rate_limit: env_or("RATE_LIMIT_GET_PER_SEC", defaults.get_rate_limit),
            post_rate_limit: env_or("RATE_LIMIT_POST_PER_SEC", defaults.post_rate_limit),
        }
    }
}

fn env_or<T: FromStr + Copy>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("환경 변수 {} 값이 올바르지 않음: {:?}, 기본값 사용", key, raw);
            default
        }),
        Err(_) => default,
    }
}
