use axum::{
    routing::get,
    Router,
};

use crate::api::handlers::*;
use crate::server::ServerState;

/// API 라우터 생성
pub fn create_api_router() -> Router<ServerState> {
    Router::new()
        // 호가창 API
        .route("/order/book", get(get_order_book).post(save_order_book))
        // 주문 내역 API (조회도 JSON 본문을 사용)
        .route("/order/history", get(get_order_history).post(save_order))
}
