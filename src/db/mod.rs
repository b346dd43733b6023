pub mod models;
pub mod repository;

use log::info;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::Error as SqlxError;

pub use repository::{OrderRepository, SqliteOrderRepository};

/// SQLite 데이터베이스 초기화 및 연결
pub async fn init_database(database_url: &str, max_connections: u32) -> Result<SqlitePool, SqlxError> {
    info!("🗄️  데이터베이스 초기화 중: {}", database_url);

    // 연결 풀 생성
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    // 테이블 생성
    create_tables(&pool).await?;

    info!("✅ 데이터베이스 초기화 완료");

    Ok(pool)
}

/// 필요한 테이블 생성 (여러 번 호출해도 안전)
///
/// 정렬 키는 일반 인덱스로만 두고 유일성 제약은 걸지 않는다.
/// 같은 식별자의 중복 저장은 허용된다.
pub async fn create_tables(pool: &SqlitePool) -> Result<(), SqlxError> {
    // 호가창 스냅샷 테이블
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS order_books (
            id INTEGER NOT NULL,
            exchange TEXT NOT NULL,
            pair TEXT NOT NULL,
            asks TEXT NOT NULL,
            bids TEXT NOT NULL
        )"
    )
    .execute(pool)
    .await?;

    // 주문 내역 테이블
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS history_orders (
            client_name TEXT NOT NULL,
            exchange_name TEXT NOT NULL,
            label TEXT NOT NULL,
            pair TEXT NOT NULL,
            side TEXT NOT NULL,
            \"type\" TEXT NOT NULL,
            base_qty REAL NOT NULL,
            price REAL NOT NULL,
            algorithm_name_placed TEXT NOT NULL,
            lowest_sell_prc REAL NOT NULL,
            highest_buy_prc REAL NOT NULL,
            commission_quote_qty REAL NOT NULL,
            time_placed DATETIME NOT NULL
        )"
    )
    .execute(pool)
    .await?;

    // 인덱스 생성
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_order_books_key ON order_books(exchange, pair)")
        .execute(pool)
        .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_history_orders_key
         ON history_orders(client_name, exchange_name, pair)"
    )
    .execute(pool)
    .await?;

    info!("📋 테이블 생성 완료");

    Ok(())
}
