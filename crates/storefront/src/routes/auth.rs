//! Authentication route handlers.
//!
//! Authentication is a deliberate mock: any structurally valid email
//! with a long-enough password signs in, and identities are minted per
//! session rather than checked against a user store. The flow exists so
//! checkout can require a signed-in user, mirroring the real product.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::Query,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use freshmart_core::Email;

use crate::filters;
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user};
use crate::models::CurrentUser;

/// Minimum accepted password length, matching the original storefront.
const MIN_PASSWORD_LENGTH: usize = 6;

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

/// Query parameters for error display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    /// Display name when somebody is already signed in.
    pub user_name: Option<String>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub error: Option<String>,
}

/// Map an error query code to a message for display.
fn error_message(code: &str) -> String {
    match code {
        "credentials" => "Enter a valid email and a password of at least 6 characters.".to_owned(),
        "invalid" => "Please fill all fields correctly.".to_owned(),
        "signin_required" => "Please sign in to checkout.".to_owned(),
        "session" => "Could not start your session. Please try again.".to_owned(),
        _ => "Something went wrong. Please try again.".to_owned(),
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the login page, or the signed-in state with a sign-out
/// button when a session already exists.
pub async fn login_page(
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    LoginTemplate {
        error: query.error.as_deref().map(error_message),
        user_name: user.map(|user| user.name),
    }
}

/// Handle login form submission.
#[instrument(skip(session, form))]
pub async fn login(session: Session, Form(form): Form<LoginForm>) -> Response {
    let Ok(email) = Email::parse(form.email.trim()) else {
        return Redirect::to("/auth/login?error=credentials").into_response();
    };
    if form.password.len() < MIN_PASSWORD_LENGTH {
        return Redirect::to("/auth/login?error=credentials").into_response();
    }

    let user = CurrentUser::sign_in(email, None);
    if let Err(e) = set_current_user(&session, &user).await {
        tracing::error!("Failed to set session: {e}");
        return Redirect::to("/auth/login?error=session").into_response();
    }

    Redirect::to("/").into_response()
}

/// Display the registration page.
pub async fn register_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    RegisterTemplate {
        error: query.error.as_deref().map(error_message),
    }
}

/// Handle registration form submission.
#[instrument(skip(session, form))]
pub async fn register(session: Session, Form(form): Form<RegisterForm>) -> Response {
    let name = form.name.trim();
    let Ok(email) = Email::parse(form.email.trim()) else {
        return Redirect::to("/auth/register?error=invalid").into_response();
    };
    if name.is_empty() || form.password.len() < MIN_PASSWORD_LENGTH {
        return Redirect::to("/auth/register?error=invalid").into_response();
    }

    let user = CurrentUser::sign_in(email, Some(name.to_owned()));
    if let Err(e) = set_current_user(&session, &user).await {
        tracing::error!("Failed to set session: {e}");
        return Redirect::to("/auth/register?error=session").into_response();
    }

    Redirect::to("/").into_response()
}

/// Handle logout.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session: {e}");
    }
    Redirect::to("/").into_response()
}
