//! 호가창 스냅샷과 클라이언트 주문 내역을 저장/조회하는 REST API
//!
//! 요청은 controller(`api`) → service → repository(`db`) 순으로 처리된다.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod server;
pub mod service;
