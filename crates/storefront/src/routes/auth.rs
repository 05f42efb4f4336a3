//! Authentication route handlers.
//!
//! The storefront keeps no credentials of its own: register and login are
//! relayed to the catalog API, and the identity it returns becomes the
//! process-wide session. Failures come back as `?error=` query params so
//! the form pages can show a message after the redirect.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect},
};
use cedar_market_core::Email;
use serde::Deserialize;

use crate::catalog::{AuthResponse, CatalogError};
use crate::error::{clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::CurrentUser;
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

// =============================================================================
// Query Types
// =============================================================================

/// Query parameters for error/success display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub success: Option<String>,
    pub current_user: Option<String>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub error: Option<String>,
    pub current_user: Option<String>,
}

// =============================================================================
// Messages
// =============================================================================

fn login_error_message(code: &str) -> String {
    match code {
        "credentials" => "Invalid email or password".to_string(),
        "session" => "Could not save your session, please try again".to_string(),
        _ => "Login failed. Please try again.".to_string(),
    }
}

fn register_error_message(code: &str) -> String {
    match code {
        "name" => "Please enter your name".to_string(),
        "email" => "Please enter a valid email address".to_string(),
        "email_taken" => "An account with this email already exists".to_string(),
        "session" => "Could not save your session, please try again".to_string(),
        _ => "Registration failed. Please try again.".to_string(),
    }
}

/// Map the catalog API's auth payload onto the session identity.
///
/// The API is inconsistent about the name field, so both spellings are
/// accepted; the submitted email fills in when the payload omits one.
fn current_user_from_auth(email: &str, auth: AuthResponse) -> CurrentUser {
    let api_user = auth.user.unwrap_or_default();
    CurrentUser {
        name: api_user.full_name.or(api_user.name).unwrap_or_default(),
        email: api_user.email.unwrap_or_else(|| email.to_string()),
        token: auth.token,
    }
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(
    Query(query): Query<MessageQuery>,
    OptionalAuth(user): OptionalAuth,
) -> impl IntoResponse {
    LoginTemplate {
        error: query.error.as_deref().map(login_error_message),
        success: query
            .success
            .map(|_| "Account created, you can sign in now".to_string()),
        current_user: user.map(|u| u.display_name().to_string()),
    }
}

/// Handle login form submission.
pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Redirect {
    let email = form.email.trim();

    let auth = match state.catalog().login(email, &form.password).await {
        Ok(auth) => auth,
        Err(CatalogError::Api {
            status: 400 | 401 | 404,
            ..
        }) => {
            return Redirect::to("/login?error=credentials");
        }
        Err(e) => {
            tracing::error!("Login request failed: {e}");
            return Redirect::to("/login?error=failed");
        }
    };

    let user = current_user_from_auth(email, auth);
    set_sentry_user(&user.email);
    match state.sessions().sign_in(user).await {
        Ok(()) => Redirect::to("/"),
        Err(e) => {
            tracing::error!("Failed to persist session: {e}");
            Redirect::to("/login?error=session")
        }
    }
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(
    Query(query): Query<MessageQuery>,
    OptionalAuth(user): OptionalAuth,
) -> impl IntoResponse {
    RegisterTemplate {
        error: query.error.as_deref().map(register_error_message),
        current_user: user.map(|u| u.display_name().to_string()),
    }
}

/// Handle registration form submission.
///
/// A successful registration signs the new account straight in.
pub async fn register(State(state): State<AppState>, Form(form): Form<RegisterForm>) -> Redirect {
    let name = form.name.trim();
    if name.is_empty() {
        return Redirect::to("/register?error=name");
    }
    let Ok(email) = form.email.trim().parse::<Email>() else {
        return Redirect::to("/register?error=email");
    };

    let auth = match state
        .catalog()
        .register(name, email.as_str(), &form.password)
        .await
    {
        Ok(auth) => auth,
        Err(CatalogError::Api { status, message }) => {
            let lower = message.to_lowercase();
            if status == 409 || lower.contains("exist") || lower.contains("already") {
                return Redirect::to("/register?error=email_taken");
            }
            tracing::warn!(status, "Registration rejected: {message}");
            return Redirect::to("/register?error=failed");
        }
        Err(e) => {
            tracing::error!("Registration request failed: {e}");
            return Redirect::to("/register?error=failed");
        }
    };

    let user = current_user_from_auth(email.as_str(), auth);
    set_sentry_user(&user.email);
    match state.sessions().sign_in(user).await {
        Ok(()) => Redirect::to("/"),
        Err(e) => {
            // The account exists remotely; the user can still sign in by hand
            tracing::error!("Failed to persist session: {e}");
            Redirect::to("/login?success=registered")
        }
    }
}

// =============================================================================
// Logout Route
// =============================================================================

/// Handle logout.
///
/// Tears the whole profile down: the session goes first, then the cart,
/// so nothing of the previous user survives for the next one.
pub async fn logout(State(state): State<AppState>) -> Redirect {
    if let Err(e) = state.sessions().sign_out().await {
        tracing::error!("Failed to clear session: {e}");
    }
    if let Err(e) = state.cart().clear().await {
        tracing::error!("Failed to clear cart: {e}");
    }
    clear_sentry_user();
    Redirect::to("/login")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_error_message_mapping() {
        assert_eq!(
            login_error_message("credentials"),
            "Invalid email or password"
        );
        assert_eq!(
            register_error_message("email_taken"),
            "An account with this email already exists"
        );
        assert_eq!(
            register_error_message("something-new"),
            "Registration failed. Please try again."
        );
    }

    #[test]
    fn test_current_user_prefers_full_name() {
        let auth: AuthResponse = serde_json::from_value(json!({
            "token": "t-1",
            "user": { "name": "layla", "full_name": "Layla Haddad" },
        }))
        .unwrap();

        let user = current_user_from_auth("layla@example.com", auth);
        assert_eq!(user.name, "Layla Haddad");
        assert_eq!(user.email, "layla@example.com");
        assert_eq!(user.token.as_deref(), Some("t-1"));
    }

    #[test]
    fn test_current_user_from_empty_payload() {
        let auth: AuthResponse = serde_json::from_value(json!({})).unwrap();
        let user = current_user_from_auth("layla@example.com", auth);

        assert_eq!(user.name, "");
        assert_eq!(user.email, "layla@example.com");
        assert_eq!(user.token, None);
        assert_eq!(user.display_name(), "layla@example.com");
    }
}
