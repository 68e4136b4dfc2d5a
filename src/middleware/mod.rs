/// HTTP middleware and extractors for the blog service
///
/// Token issuance belongs to the upstream identity provider; this layer only
/// validates bearer tokens and resolves the caller's user id. Handlers that
/// require authentication take `UserId`; public handlers that personalize
/// their output take `MaybeUserId`.
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{error::ErrorUnauthorized, web, Error, FromRequest, HttpMessage, HttpRequest};
use futures::future::LocalBoxFuture;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

// =====================================================================
// JWT validation
// =====================================================================

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    #[allow(dead_code)]
    exp: usize,
}

/// Validates HS256 bearer tokens issued by the identity provider.
pub struct JwtValidator {
    key: DecodingKey,
    validation: Validation,
}

impl JwtValidator {
    pub fn new(secret: &str) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Resolve the user id carried in a token, or fail.
    pub fn user_id(&self, token: &str) -> Result<Uuid, Error> {
        let data = decode::<Claims>(token, &self.key, &self.validation)
            .map_err(|_| ErrorUnauthorized("Invalid or expired token"))?;
        Uuid::parse_str(&data.claims.sub).map_err(|_| ErrorUnauthorized("Invalid user ID"))
    }
}

fn resolve_user_id(req: &HttpRequest) -> Result<Uuid, Error> {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ErrorUnauthorized("Missing Authorization header"))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ErrorUnauthorized("Invalid Authorization scheme"))?;

    let validator = req
        .app_data::<web::Data<Arc<JwtValidator>>>()
        .ok_or_else(|| ErrorUnauthorized("Auth not configured"))?;

    validator.user_id(token)
}

// =====================================================================
// Identity extractors
// =====================================================================

/// Authenticated caller. Extraction rejects the request with 401 when the
/// bearer token is missing or invalid.
#[derive(Debug, Clone)]
pub struct UserId(pub Uuid);

impl FromRequest for UserId {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        // Tests and upstream middleware may have resolved the id already.
        if let Some(id) = req.extensions().get::<UserId>().cloned() {
            return ready(Ok(id));
        }

        ready(resolve_user_id(req).map(UserId))
    }
}

/// Optional identity for public routes: resolves the caller when a valid
/// token is present, stays `None` otherwise. Never rejects the request.
#[derive(Debug, Clone)]
pub struct MaybeUserId(pub Option<Uuid>);

impl FromRequest for MaybeUserId {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        if let Some(UserId(id)) = req.extensions().get::<UserId>() {
            return ready(Ok(MaybeUserId(Some(*id))));
        }

        ready(Ok(MaybeUserId(resolve_user_id(req).ok())))
    }
}

// =====================================================================
// Request logging
// =====================================================================

pub struct RequestLogMiddleware;

impl<S, B> Transform<S, ServiceRequest> for RequestLogMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestLogMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestLogMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct RequestLogMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequestLogMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let path = req.path().to_string();
        let method = req.method().to_string();
        let start = Instant::now();

        Box::pin(async move {
            let res = service.call(req).await;
            let elapsed = start.elapsed().as_millis();
            tracing::debug!(%method, %path, %elapsed, "request completed");
            res
        })
    }
}
