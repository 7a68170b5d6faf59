//! Rate limiting middleware.
//!
//! Wrap a route with [`RateLimit`] to check the caller against a named bucket
//! before the handler runs:
//! ```ignore
//! web::put().to(links::replace).wrap(RateLimit::new(API_BUCKET))
//! ```

use actix_web::{
    Error, ResponseError,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header::HeaderMap,
    web,
};
use std::future::{Future, Ready, ready};
use std::pin::Pin;
use std::rc::Rc;

use linkden_core::domain::derive_client_key;
use linkden_core::ports::RateLimiter;

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Client identifier: first `X-Forwarded-For` entry, else `X-Real-IP`,
/// else the shared anonymous key.
pub fn client_key(headers: &HeaderMap) -> String {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
    derive_client_key(header("x-forwarded-for"), header("x-real-ip"))
}

/// Count one request from `client_key` against `bucket`.
pub async fn check_limit(
    limiter: &dyn RateLimiter,
    bucket: &str,
    client_key: &str,
) -> AppResult<()> {
    let result = limiter.check(bucket, client_key).await?;

    if !result.allowed {
        tracing::warn!(
            bucket,
            client_key,
            retry_after_secs = result.reset_after.as_secs(),
            "Rate limit exceeded"
        );
        return Err(AppError::TooManyRequests {
            retry_after: result.reset_after,
        });
    }

    Ok(())
}

/// Rate limiting middleware factory for one bucket.
pub struct RateLimit {
    bucket: &'static str,
}

impl RateLimit {
    pub fn new(bucket: &'static str) -> Self {
        Self { bucket }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RateLimitService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitService {
            service: Rc::new(service),
            bucket: self.bucket,
        }))
    }
}

pub struct RateLimitService<S> {
    service: Rc<S>,
    bucket: &'static str,
}

impl<S, B> Service<ServiceRequest> for RateLimitService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let bucket = self.bucket;

        Box::pin(async move {
            let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
                tracing::error!("AppState not found in app data");
                let response = AppError::Internal("Server configuration error".to_string())
                    .error_response();
                return Ok(req.into_response(response).map_into_right_body());
            };

            let key = client_key(req.headers());
            match check_limit(state.rate_limiter.as_ref(), bucket, &key).await {
                Ok(()) => service
                    .call(req)
                    .await
                    .map(ServiceResponse::map_into_left_body),
                Err(err) => Ok(req.into_response(err.error_response()).map_into_right_body()),
            }
        })
    }
}
