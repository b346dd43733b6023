use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::StoreError;

/// 호가 한 단계의 (가격, 수량) 튜플
pub type PriceQty = (f64, f64);

/// 호가창 DB 모델
///
/// asks/bids는 구조체 대신 (가격, 수량) 튜플 배열로 저장된다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderBook {
    pub id: i64,
    pub exchange: String,
    pub pair: String,
    pub asks: Vec<PriceQty>,
    pub bids: Vec<PriceQty>,
}

/// order_books 테이블의 원시 행 (asks/bids는 JSON 텍스트)
#[derive(Debug, Clone, FromRow)]
pub struct OrderBookRow {
    pub id: i64,
    pub exchange: String,
    pub pair: String,
    pub asks: String,
    pub bids: String,
}

impl OrderBook {
    /// 저장용 행으로 변환 (튜플 배열 직렬화)
    pub fn to_row(&self) -> Result<OrderBookRow, StoreError> {
        Ok(OrderBookRow {
            id: self.id,
            exchange: self.exchange.clone(),
            pair: self.pair.clone(),
            asks: serde_json::to_string(&self.asks)?,
            bids: serde_json::to_string(&self.bids)?,
        })
    }
}

impl TryFrom<OrderBookRow> for OrderBook {
    type Error = StoreError;

    fn try_from(row: OrderBookRow) -> Result<Self, Self::Error> {
        Ok(OrderBook {
            id: row.id,
            exchange: row.exchange,
            pair: row.pair,
            asks: serde_json::from_str(&row.asks)?,
            bids: serde_json::from_str(&row.bids)?,
        })
    }
}

/// 주문 내역 DB 모델
///
/// (client_name, exchange_name)은 정렬 키일 뿐 유일성 제약이 아니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase", default)]
pub struct HistoryOrder {
    pub client_name: String,
    pub exchange_name: String,
    pub label: String,
    pub pair: String,
    pub side: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub order_type: String,
    pub base_qty: f64,
    pub price: f64,
    pub algorithm_name_placed: String,
    pub lowest_sell_prc: f64,
    pub highest_buy_prc: f64,
    pub commission_quote_qty: f64,
    pub time_placed: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_book_row_preserves_tuples() {
        let book = OrderBook {
            id: 7,
            exchange: "binance".to_string(),
            pair: "ETH-BTC".to_string(),
            asks: vec![(0.0521, 1.5), (0.0522, 0.25)],
            bids: vec![(0.052, 3.0)],
        };

        let row = book.to_row().unwrap();
        assert_eq!(row.asks, "[[0.0521,1.5],[0.0522,0.25]]");
        assert_eq!(row.bids, "[[0.052,3.0]]");

        let restored = OrderBook::try_from(row).unwrap();
        assert_eq!(restored, book);
    }

    #[test]
    fn test_corrupt_tuple_column_is_encoding_error() {
        let row = OrderBookRow {
            id: 1,
            exchange: "binance".to_string(),
            pair: "ETH-BTC".to_string(),
            asks: "not json".to_string(),
            bids: "[]".to_string(),
        };

        assert!(matches!(OrderBook::try_from(row), Err(StoreError::Encoding(_))));
    }

    #[test]
    fn test_history_order_json_field_names() {
        let json = r#"{
            "clientName": "alice",
            "exchangeName": "binance",
            "label": "grid",
            "pair": "ETH-BTC",
            "side": "buy",
            "type": "limit",
            "baseQty": 1.25,
            "price": 0.052,
            "algorithmNamePlaced": "twap",
            "lowestSellPrc": 0.0521,
            "highestBuyPrc": 0.0519,
            "commissionQuoteQty": 0.0001,
            "timePlaced": "2024-03-01T12:00:00Z"
        }"#;

        let order: HistoryOrder = serde_json::from_str(json).unwrap();
        assert_eq!(order.client_name, "alice");
        assert_eq!(order.order_type, "limit");
        assert_eq!(order.algorithm_name_placed, "twap");
        assert_eq!(order.time_placed.to_rfc3339(), "2024-03-01T12:00:00+00:00");
    }

    #[test]
    fn test_history_order_missing_fields_default() {
        let order: HistoryOrder = serde_json::from_str(r#"{"side": "sell"}"#).unwrap();
        assert_eq!(order.side, "sell");
        assert!(order.order_type.is_empty());
        assert_eq!(order.base_qty, 0.0);
        assert_eq!(order.time_placed.timestamp(), 0);
    }
}
