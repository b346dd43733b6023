use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::Method,
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use log::warn;

use crate::error::ApiError;

/// 이 시간 동안 요청이 없으면 버킷이 가득 찬다
const IDLE_AFTER: Duration = Duration::from_secs(1);

#[derive(Clone)]
struct Bucket {
    tokens: f64,
    last_update: Instant,
}

/// IP별 토큰 버킷 요청 제한기
///
/// 용량과 초당 충전량은 모두 `per_second`이다.
pub struct RateLimiter {
    per_second: u32,
    buckets: DashMap<IpAddr, Bucket>,
}

impl RateLimiter {
    pub fn new(per_second: u32) -> Self {
        Self {
            per_second,
            buckets: DashMap::new(),
        }
    }

    /// 요청 1건을 소비할 수 있으면 true
    pub fn check(&self, ip: IpAddr) -> bool {
        self.check_at(ip, Instant::now())
    }

    fn check_at(&self, ip: IpAddr, now: Instant) -> bool {
        let capacity = self.per_second as f64;
        let mut bucket = self.buckets.entry(ip).or_insert_with(|| Bucket {
            tokens: capacity,
            last_update: now,
        });

        // 경과 시간만큼 충전
        let elapsed = now.saturating_duration_since(bucket.last_update).as_secs_f64();
        bucket.tokens = f64::min(capacity, bucket.tokens + elapsed * capacity);
        bucket.last_update = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// 유휴 버킷 제거
    ///
    /// 1초 이상 요청이 없던 버킷은 이미 가득 찬 상태이므로 지워도 결과가 같다.
    pub fn prune_idle(&self) {
        self.prune_idle_at(Instant::now())
    }

    fn prune_idle_at(&self, now: Instant) {
        self.buckets
            .retain(|_, bucket| now.saturating_duration_since(bucket.last_update) < IDLE_AFTER);
    }

    pub fn tracked_ips(&self) -> usize {
        self.buckets.len()
    }
}

/// 조회(GET)와 저장(POST) 라우트에 각각 적용되는 제한기 묶음
pub struct RateLimits {
    pub read: RateLimiter,
    pub write: RateLimiter,
}

impl RateLimits {
    pub fn new(read_per_second: u32, write_per_second: u32) -> Self {
        Self {
            read: RateLimiter::new(read_per_second),
            write: RateLimiter::new(write_per_second),
        }
    }

    /// 두 제한기의 유휴 버킷 제거
    pub fn prune_idle(&self) {
        self.read.prune_idle();
        self.write.prune_idle();
    }

    // HEAD는 axum의 get() 라우트로 처리되므로 조회 한도를 쓴다
    fn for_method(&self, method: &Method) -> &RateLimiter {
        if *method == Method::GET || *method == Method::HEAD {
            &self.read
        } else {
            &self.write
        }
    }
}

/// 요청 제한 미들웨어
///
/// 접속 주소를 알 수 없는 요청(예: 인프로세스 테스트)은 제한하지 않는다.
pub async fn limit_by_ip(
    State(limits): State<Arc<RateLimits>>,
    peer: Option<ConnectInfo<SocketAddr>>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(ConnectInfo(addr)) = peer {
        if !limits.for_method(request.method()).check(addr.ip()) {
            warn!("요청 한도 초과: {} {}", addr.ip(), request.uri().path());
            return ApiError::TooManyRequests.into_response();
        }
    }

    next.run(request).await
}
