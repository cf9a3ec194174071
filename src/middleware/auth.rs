use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;

use crate::{database::MongoDB, services::auth_service, utils::error::AppError};

/// Builds a transport-level rejection carrying the usual JSON error body.
fn guard_error(err: AppError) -> Error {
    let response = err.to_response();
    actix_web::error::InternalError::from_response(err, response).into()
}

/// Access guard for protected routes.
///
/// Extracts the bearer token, resolves the acting identity through the token
/// service (which re-reads the user's revocation flag), and exposes the
/// resolved `User` to the handler via request extensions. The identity lives
/// for this request only; nothing is cached across requests.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    // Rc because the identity check awaits a store read before dispatch
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
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
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let token = req
                .headers()
                .get("Authorization")
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.strip_prefix("Bearer "))
                .map(str::to_owned);

            let token = match token {
                Some(token) => token,
                None => {
                    return Err(guard_error(AppError::Unauthorized(
                        "Missing authorization token".to_string(),
                    )))
                }
            };

            let db = match req.app_data::<web::Data<MongoDB>>() {
                Some(db) => db.clone(),
                None => {
                    return Err(guard_error(AppError::Internal(
                        "Database handle not configured".to_string(),
                    )))
                }
            };

            match auth_service::resolve_identity(&db, &token).await {
                Ok(user) => {
                    req.extensions_mut().insert(user);
                    service.call(req).await
                }
                Err(e) => Err(guard_error(e)),
            }
        })
    }
}
