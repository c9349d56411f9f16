//! Authentication middleware and extractors.
//!
//! `RequireAuth` wraps protected scopes: it resolves the `x-auth-token`
//! header into an [`Identity`] before any handler runs, and rejects the
//! request with 401 otherwise. Handlers take `Identity` as an argument.

use actix_web::{
    Error, FromRequest, HttpMessage, HttpRequest, HttpResponse, ResponseError,
    body::EitherBody,
    dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::StatusCode,
    web,
};
use std::future::{Future, Ready, ready};
use std::pin::Pin;

use circle_core::guard::{AUTH_HEADER, authenticate};
use circle_core::ports::AuthError;
use circle_shared::ErrorResponse;
use uuid::Uuid;

use crate::state::AppState;

/// Authenticated user identity, attached to the request by [`RequireAuth`].
///
/// ```ignore
/// async fn protected_route(identity: Identity) -> impl Responder {
///     format!("Hello, user {}!", identity.user_id)
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
}

/// Error type for authentication failures.
#[derive(Debug)]
pub enum AuthenticationError {
    /// The token guard turned the request away.
    Rejected(AuthError),
    /// The app was built without an `AppState`.
    MissingState,
}

impl std::fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rejected(e) => write!(f, "{e}"),
            Self::MissingState => write!(f, "AppState not configured"),
        }
    }
}

impl ResponseError for AuthenticationError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Rejected(
                AuthError::MissingAuth | AuthError::InvalidToken(_) | AuthError::TokenExpired,
            ) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            Self::Rejected(AuthError::MissingAuth) => {
                ErrorResponse::new(401, "Authentication Required")
                    .with_detail("No token available, authorization denied")
            }
            Self::Rejected(AuthError::TokenExpired) => ErrorResponse::new(401, "Token Expired")
                .with_detail("Your authentication token has expired. Please login again."),
            Self::Rejected(AuthError::InvalidToken(_)) => ErrorResponse::new(401, "Invalid Token")
                .with_detail("Token is not valid, authorization denied"),
            _ => ErrorResponse::internal_error(),
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

/// Run the token guard against a request's headers.
fn resolve(req: &HttpRequest) -> Result<Identity, AuthenticationError> {
    let state = req.app_data::<web::Data<AppState>>().ok_or_else(|| {
        tracing::error!("AppState not found in app data");
        AuthenticationError::MissingState
    })?;

    let token = match req.headers().get(AUTH_HEADER) {
        Some(value) => Some(value.to_str().map_err(|_| {
            AuthenticationError::Rejected(AuthError::InvalidToken("Invalid auth header".into()))
        })?),
        None => None,
    };

    authenticate(token, state.tokens.as_ref())
        .map(|user_id| Identity { user_id })
        .map_err(|e| {
            tracing::debug!(error = %e, path = %req.path(), "Rejected request");
            AuthenticationError::Rejected(e)
        })
}

impl FromRequest for Identity {
    type Error = AuthenticationError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        // Set by `RequireAuth`; resolving here too keeps unwrapped routes safe.
        let attached = req.extensions().get::<Identity>().copied();
        ready(attached.map_or_else(|| resolve(req), Ok))
    }
}

/// Guard middleware factory for protected routes.
pub struct RequireAuth;

impl<S, B> Transform<S, ServiceRequest> for RequireAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RequireAuthService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireAuthService { service }))
    }
}

pub struct RequireAuthService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequireAuthService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match resolve(req.request()) {
            Ok(identity) => {
                req.extensions_mut().insert(identity);

                let fut = self.service.call(req);
                Box::pin(async move {
                    let res = fut.await?;
                    Ok(res.map_into_left_body())
                })
            }
            Err(err) => {
                let response = err.error_response();
                let (http_req, _payload) = req.into_parts();
                let srv_response = ServiceResponse::new(http_req, response);

                Box::pin(async move { Ok(srv_response.map_into_right_body()) })
            }
        }
    }
}
