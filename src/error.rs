use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// 저장소 계층 에러 타입
///
/// 서비스 계층은 이 에러를 감싸지 않고 그대로 전달한다.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("레코드를 찾을 수 없음")]
    NotFound,
    #[error("저장소 오류: {0}")]
    Storage(#[from] sqlx::Error),
    #[error("호가 튜플 인코딩 오류: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// HTTP 응답으로 변환되는 API 에러
///
/// 에러 응답 본문은 항상 비어 있다.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("잘못된 요청")]
    BadRequest,
    #[error("찾을 수 없음")]
    NotFound,
    #[error("요청 한도 초과")]
    TooManyRequests,
    #[error("내부 서버 오류")]
    Internal,
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ApiError::NotFound,
            StoreError::Storage(_) | StoreError::Encoding(_) => ApiError::Internal,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::BadRequest => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };

        status.into_response()
    }
}
