use async_trait::async_trait;
use log::debug;
use sqlx::sqlite::SqlitePool;

use super::models::{HistoryOrder, OrderBook, OrderBookRow};
use crate::error::StoreError;
use crate::service::models::Client;

/// 주문 저장소 트레이트
///
/// 모든 연산은 저장소와 정확히 한 번 왕복한다. 재시도나 트랜잭션은 없다.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// 거래소/페어로 호가창 조회 (없으면 `StoreError::NotFound`)
    async fn find_order_book(&self, exchange: &str, pair: &str) -> Result<OrderBook, StoreError>;
    /// 호가창 저장 (삽입 전용)
    async fn save_order_book(&self, order: &OrderBook) -> Result<(), StoreError>;
    /// 클라이언트 식별 필드 4개로 주문 내역 조회 (없으면 `StoreError::NotFound`)
    async fn find_order_history(&self, client: &Client) -> Result<Vec<HistoryOrder>, StoreError>;
    /// 주문 내역 저장 (삽입 전용)
    async fn save_order_history(&self, order: &HistoryOrder) -> Result<(), StoreError>;
}

/// SQLite 기반 주문 저장소
pub struct SqliteOrderRepository {
    pool: SqlitePool,
}

impl SqliteOrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderRepository for SqliteOrderRepository {
    async fn find_order_book(&self, exchange: &str, pair: &str) -> Result<OrderBook, StoreError> {
        // 중복 저장이 허용되므로 가장 먼저 저장된 행을 반환
        let row = sqlx::query_as::<_, OrderBookRow>(
            "SELECT id, exchange, pair, asks, bids
             FROM order_books
             WHERE exchange = ? AND pair = ?
             ORDER BY rowid ASC
             LIMIT 1"
        )
        .bind(exchange)
        .bind(pair)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => OrderBook::try_from(row),
            None => {
                debug!("호가창 없음: exchange={}, pair={}", exchange, pair);
                Err(StoreError::NotFound)
            }
        }
    }

    async fn save_order_book(&self, order: &OrderBook) -> Result<(), StoreError> {
        let row = order.to_row()?;

        sqlx::query(
            "INSERT INTO order_books (id, exchange, pair, asks, bids)
             VALUES (?, ?, ?, ?, ?)"
        )
        .bind(row.id)
        .bind(&row.exchange)
        .bind(&row.pair)
        .bind(&row.asks)
        .bind(&row.bids)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_order_history(&self, client: &Client) -> Result<Vec<HistoryOrder>, StoreError> {
        let orders = sqlx::query_as::<_, HistoryOrder>(
            "SELECT client_name, exchange_name, label, pair, side, \"type\", base_qty, price,
                    algorithm_name_placed, lowest_sell_prc, highest_buy_prc,
                    commission_quote_qty, time_placed
             FROM history_orders
             WHERE client_name = ? AND exchange_name = ? AND label = ? AND pair = ?
             ORDER BY rowid ASC"
        )
        .bind(&client.client_name)
        .bind(&client.exchange_name)
        .bind(&client.label)
        .bind(&client.pair)
        .fetch_all(&self.pool)
        .await?;

        if orders.is_empty() {
            debug!("주문 내역 없음: client={}", client.client_name);
            return Err(StoreError::NotFound);
        }

        Ok(orders)
    }

    async fn save_order_history(&self, order: &HistoryOrder) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO history_orders
             (client_name, exchange_name, label, pair, side, \"type\", base_qty, price,
              algorithm_name_placed, lowest_sell_prc, highest_buy_prc,
              commission_quote_qty, time_placed)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(&order.client_name)
        .bind(&order.exchange_name)
        .bind(&order.label)
        .bind(&order.pair)
        .bind(&order.side)
        .bind(&order.order_type)
        .bind(order.base_qty)
        .bind(order.price)
        .bind(&order.algorithm_name_placed)
        .bind(order.lowest_sell_prc)
        .bind(order.highest_buy_prc)
        .bind(order.commission_quote_qty)
        .bind(order.time_placed)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_database;
    use chrono::{TimeZone, Utc};

    async fn setup() -> SqliteOrderRepository {
        let pool = init_database("sqlite::memory:", 1).await.unwrap();
        SqliteOrderRepository::new(pool)
    }

    fn sample_book() -> OrderBook {
        OrderBook {
            id: 1,
            exchange: "binance".to_string(),
            pair: "ETH-BTC".to_string(),
            asks: vec![(0.0521, 1.5), (0.0522, 0.25)],
            bids: vec![(0.052, 3.0), (0.0519, 10.0)],
        }
    }

    fn sample_history() -> HistoryOrder {
        HistoryOrder {
            client_name: "alice".to_string(),
            exchange_name: "binance".to_string(),
            label: "grid".to_string(),
            pair: "ETH-BTC".to_string(),
            side: "buy".to_string(),
            order_type: "limit".to_string(),
            base_qty: 1.25,
            price: 0.052,
            algorithm_name_placed: "twap".to_string(),
            lowest_sell_prc: 0.0521,
            highest_buy_prc: 0.0519,
            commission_quote_qty: 0.0001,
            time_placed: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        }
    }

    fn client_of(order: &HistoryOrder) -> Client {
        Client {
            client_name: order.client_name.clone(),
            exchange_name: order.exchange_name.clone(),
            label: order.label.clone(),
            pair: order.pair.clone(),
        }
    }

    #[tokio::test]
    async fn test_find_order_book() {
        let repo = setup().await;
        let book = sample_book();

        repo.save_order_book(&book).await.unwrap();

        let found = repo.find_order_book("binance", "ETH-BTC").await.unwrap();
        assert_eq!(found, book);
    }

    #[tokio::test]
    async fn test_find_order_book_not_found() {
        let repo = setup().await;
        repo.save_order_book(&sample_book()).await.unwrap();

        let result = repo.find_order_book("binance", "BTC-USDT").await;
        assert!(matches!(result, Err(StoreError::NotFound)));

        let result = repo.find_order_book("kraken", "ETH-BTC").await;
        assert!(matches!(result, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn test_empty_book_is_not_not_found() {
        let repo = setup().await;
        let book = OrderBook {
            id: 2,
            exchange: "binance".to_string(),
            pair: "SOL-USDT".to_string(),
            asks: vec![],
            bids: vec![],
        };
        repo.save_order_book(&book).await.unwrap();

        let found = repo.find_order_book("binance", "SOL-USDT").await.unwrap();
        assert!(found.asks.is_empty());
        assert!(found.bids.is_empty());
    }

    #[tokio::test]
    async fn test_save_order_book_allows_duplicates() {
        let repo = setup().await;
        let first = sample_book();
        let mut second = sample_book();
        second.asks = vec![(0.06, 1.0)];

        repo.save_order_book(&first).await.unwrap();
        repo.save_order_book(&second).await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_books")
            .fetch_one(&repo.pool)
            .await
            .unwrap();
        assert_eq!(count, 2);

        // 먼저 저장된 스냅샷이 조회됨
        let found = repo.find_order_book("binance", "ETH-BTC").await.unwrap();
        assert_eq!(found, first);
    }

    #[tokio::test]
    async fn test_find_order_history() {
        let repo = setup().await;
        let order = sample_history();
        repo.save_order_history(&order).await.unwrap();

        let found = repo.find_order_history(&client_of(&order)).await.unwrap();
        assert_eq!(found, vec![order]);
    }

    #[tokio::test]
    async fn test_find_order_history_requires_all_identity_fields() {
        let repo = setup().await;
        let order = sample_history();
        repo.save_order_history(&order).await.unwrap();

        let mut client = client_of(&order);
        client.label = "other".to_string();

        let result = repo.find_order_history(&client).await;
        assert!(matches!(result, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn test_save_order_history_allows_duplicates() {
        let repo = setup().await;
        let order = sample_history();

        repo.save_order_history(&order).await.unwrap();
        repo.save_order_history(&order).await.unwrap();

        let found = repo.find_order_history(&client_of(&order)).await.unwrap();
        assert_eq!(found.len(), 2);
    }

    #[tokio::test]
    async fn test_storage_failure_is_storage_error() {
        let repo = setup().await;
        repo.pool.close().await;

        let result = repo.find_order_book("binance", "ETH-BTC").await;
        assert!(matches!(result, Err(StoreError::Storage(_))));
    }
}
