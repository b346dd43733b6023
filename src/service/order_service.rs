use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use super::models::{Client, DepthOrder, OrderBookDto};
use crate::db::models::HistoryOrder;
use crate::db::OrderRepository;
use crate::error::StoreError;

/// 주문 서비스 트레이트
///
/// 저장소 에러는 감싸지 않고 그대로 전달한다.
#[async_trait]
pub trait OrderService: Send + Sync {
    async fn get_order_book(&self, exchange: &str, pair: &str) -> Result<OrderBookDto, StoreError>;
    async fn save_order_book(
        &self,
        id: i64,
        exchange: &str,
        pair: &str,
        asks: Vec<DepthOrder>,
        bids: Vec<DepthOrder>,
    ) -> Result<(), StoreError>;
    async fn get_order_history(&self, client: &Client) -> Result<Vec<HistoryOrder>, StoreError>;
    async fn save_order(&self, client: &Client, order: &HistoryOrder) -> Result<(), StoreError>;
}

/// 저장소 기반 주문 서비스
pub struct OrderServiceImpl {
    repo: Arc<dyn OrderRepository>,
}

impl OrderServiceImpl {
    pub fn new(repo: Arc<dyn OrderRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl OrderService for OrderServiceImpl {
    async fn get_order_book(&self, exchange: &str, pair: &str) -> Result<OrderBookDto, StoreError> {
        let book = self.repo.find_order_book(exchange, pair).await?;
        Ok(OrderBookDto::from(book))
    }

    async fn save_order_book(
        &self,
        id: i64,
        exchange: &str,
        pair: &str,
        asks: Vec<DepthOrder>,
        bids: Vec<DepthOrder>,
    ) -> Result<(), StoreError> {
        let dto = OrderBookDto {
            id,
            exchange: exchange.to_string(),
            pair: pair.to_string(),
            asks,
            bids,
        };

        self.repo.save_order_book(&dto.to_order_book()).await
    }

    async fn get_order_history(&self, client: &Client) -> Result<Vec<HistoryOrder>, StoreError> {
        self.repo.find_order_history(client).await
    }

    /// 주문 내역 저장
    ///
    /// 식별 필드(clientName, exchangeName, label, pair)는 항상 클라이언트 값으로 덮어쓴다.
    /// 페이로드에 담긴 값은 신뢰하지 않는다.
    async fn save_order(&self, client: &Client, order: &HistoryOrder) -> Result<(), StoreError> {
        let mut record = order.clone();
        record.client_name = client.client_name.clone();
        record.exchange_name = client.exchange_name.clone();
        record.label = client.label.clone();
        record.pair = client.pair.clone();

        debug!(
            "주문 내역 저장: client={}, exchange={}, pair={}",
            record.client_name, record.exchange_name, record.pair
        );

        self.repo.save_order_history(&record).await
    }
}
