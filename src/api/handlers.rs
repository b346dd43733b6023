use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use log::{error, warn};
use serde::de::DeserializeOwned;

use crate::db::models::HistoryOrder;
use crate::error::{ApiError, StoreError};
use crate::server::ServerState;
use crate::service::models::{Client, HistoryOrderPayload, OrderBookDto};

/// JSON 본문 파싱 (실패 시 400)
fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| {
        warn!("요청 본문 파싱 실패: {}", e);
        ApiError::BadRequest
    })
}

/// 서비스 에러를 상태 코드로 변환 (404 / 500)
fn map_store_error(context: &str, err: StoreError) -> ApiError {
    if !matches!(err, StoreError::NotFound) {
        error!("{} 실패: {}", context, err);
    }
    ApiError::from(err)
}

/// 호가창 조회 핸들러
///
/// `GET /order/book?exchangeName=..&pair=..`
pub async fn get_order_book(
    State(state): State<ServerState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<OrderBookDto>, ApiError> {
    let exchange = params.get("exchangeName").map(String::as_str).unwrap_or("");
    let pair = params.get("pair").map(String::as_str).unwrap_or("");

    if exchange.is_empty() || pair.is_empty() {
        return Err(ApiError::BadRequest);
    }

    let order_book = state
        .service
        .get_order_book(exchange, pair)
        .await
        .map_err(|e| map_store_error("호가창 조회", e))?;

    Ok(Json(order_book))
}

/// 호가창 저장 핸들러
pub async fn save_order_book(
    State(state): State<ServerState>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let order: OrderBookDto = parse_body(&body)?;
    if order.pair.is_empty() {
        return Err(ApiError::BadRequest);
    }

    state
        .service
        .save_order_book(order.id, &order.exchange, &order.pair, order.asks, order.bids)
        .await
        .map_err(|e| map_store_error("호가창 저장", e))?;

    Ok(StatusCode::OK)
}

/// 주문 내역 조회 핸들러
///
/// 조회 조건은 쿼리 파라미터가 아닌 JSON 본문(Client)으로 받는다.
pub async fn get_order_history(
    State(state): State<ServerState>,
    body: Bytes,
) -> Result<Json<Vec<HistoryOrder>>, ApiError> {
    let client: Client = parse_body(&body)?;

    let orders = state
        .service
        .get_order_history(&client)
        .await
        .map_err(|e| map_store_error("주문 내역 조회", e))?;

    Ok(Json(orders))
}

/// 주문 내역 저장 핸들러
pub async fn save_order(
    State(state): State<ServerState>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let payload: HistoryOrderPayload = parse_body(&body)?;
    if payload.client.client_name.is_empty() || payload.history.order_type.is_empty() {
        return Err(ApiError::BadRequest);
    }

    state
        .service
        .save_order(&payload.client, &payload.history)
        .await
        .map_err(|e| map_store_error("주문 내역 저장", e))?;

    Ok(StatusCode::OK)
}
