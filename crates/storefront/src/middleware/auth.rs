//! Authentication extractors.
//!
//! Provides extractors for requiring a signed-in user in route handlers.
//! The identity comes from the process-wide [`SessionService`], not from a
//! per-request cookie.
//!
//! [`SessionService`]: crate::services::SessionService

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};

use crate::models::CurrentUser;
use crate::state::AppState;

/// Extractor that requires a signed-in user.
///
/// If nobody is signed in, plain requests are redirected to the login page
/// and HTMX requests get an `HX-Redirect` header so the browser navigates
/// there instead of swapping the fragment in place.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.display_name())
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Error returned when authentication is required but nobody is signed in.
pub enum AuthRejection {
    /// Redirect to the login page (for plain HTML requests).
    RedirectToLogin,
    /// `HX-Redirect` to the login page (for HTMX fragment requests).
    HxRedirectToLogin,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/login").into_response(),
            Self::HxRedirectToLogin => {
                (StatusCode::OK, [("HX-Redirect", "/login")]).into_response()
            }
        }
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        match state.sessions().current().await {
            Some(user) => Ok(Self(user)),
            None => {
                if parts.headers.contains_key("HX-Request") {
                    Err(AuthRejection::HxRedirectToLogin)
                } else {
                    Err(AuthRejection::RedirectToLogin)
                }
            }
        }
    }
}

/// Extractor that optionally gets the signed-in user.
///
/// Unlike `RequireAuth`, this does not reject the request when nobody is
/// signed in.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(
///     OptionalAuth(user): OptionalAuth,
/// ) -> impl IntoResponse {
///     match user {
///         Some(u) => format!("Hello, {}!", u.display_name()),
///         None => "Hello, guest!".to_string(),
///     }
/// }
/// ```
pub struct OptionalAuth(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        Ok(Self(state.sessions().current().await))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_redirects_to_login() {
        let response = AuthRejection::RedirectToLogin.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response
                .headers()
                .get(axum::http::header::LOCATION)
                .and_then(|v| v.to_str().ok()),
            Some("/login")
        );
    }

    #[test]
    fn test_htmx_rejection_uses_hx_redirect() {
        let response = AuthRejection::HxRedirectToLogin.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get("HX-Redirect")
                .and_then(|v| v.to_str().ok()),
            Some("/login")
        );
    }
}
