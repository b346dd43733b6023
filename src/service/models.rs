use serde::{Deserialize, Serialize};

use crate::db::models::{HistoryOrder, OrderBook, PriceQty};

/// 클라이언트 식별 정보 (주문 내역 조회 키)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Client {
    pub client_name: String,
    pub exchange_name: String,
    pub label: String,
    pub pair: String,
}

/// 호가 한 단계
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DepthOrder {
    pub price: f64,
    pub base_qty: f64,
}

/// 호가창 API/서비스 모델
///
/// 대문자 키(`ID`, `Exchange`, ...)로 보내는 기존 클라이언트 본문도 받는다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderBookDto {
    #[serde(alias = "ID")]
    pub id: i64,
    #[serde(alias = "Exchange")]
    pub exchange: String,
    #[serde(alias = "Pair")]
    pub pair: String,
    #[serde(alias = "Asks")]
    pub asks: Vec<DepthOrder>,
    #[serde(alias = "Bids")]
    pub bids: Vec<DepthOrder>,
}

/// 주문 내역 저장 요청
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryOrderPayload {
    #[serde(alias = "Client")]
    pub client: Client,
    #[serde(alias = "History")]
    pub history: HistoryOrder,
}

impl OrderBookDto {
    /// 저장용 모델로 변환 (호가를 (가격, 수량) 튜플로 평탄화)
    pub fn to_order_book(&self) -> OrderBook {
        OrderBook {
            id: self.id,
            exchange: self.exchange.clone(),
            pair: self.pair.clone(),
            asks: depth_orders_to_tuples(&self.asks),
            bids: depth_orders_to_tuples(&self.bids),
        }
    }
}

impl From<OrderBook> for OrderBookDto {
    fn from(book: OrderBook) -> Self {
        Self {
            id: book.id,
            exchange: book.exchange,
            pair: book.pair,
            asks: tuples_to_depth_orders(&book.asks),
            bids: tuples_to_depth_orders(&book.bids),
        }
    }
}

fn depth_orders_to_tuples(orders: &[DepthOrder]) -> Vec<PriceQty> {
    orders.iter().map(|o| (o.price, o.base_qty)).collect()
}

fn tuples_to_depth_orders(tuples: &[PriceQty]) -> Vec<DepthOrder> {
    tuples
        .iter()
        .map(|&(price, base_qty)| DepthOrder { price, base_qty })
        .collect()
}
