use crate::{
    AppState,
    error::ApiError,
    guard::{LOGIN_PATH, landing_for},
    layout::chrome_for,
    models::{LoginOutcome, LoginRequest, PageView, RedirectView, RegisterRequest, Role, SessionView},
    routes,
};
use axum::{
    Json,
    extract::State,
    http::{StatusCode, Uri},
};

/// upstream_status
///
/// Maps an API client failure to the status the shell answers with. Rejected credentials stay
/// 401, other client errors pass through, anything else is the upstream's fault.
fn upstream_status(error: &ApiError) -> StatusCode {
    match error {
        e if e.is_unauthorized() => StatusCode::UNAUTHORIZED,
        ApiError::Status(code) if (400..500).contains(code) => {
            StatusCode::from_u16(*code).unwrap_or(StatusCode::BAD_REQUEST)
        }
        _ => StatusCode::BAD_GATEWAY,
    }
}

// --- Handlers ---

/// get_session
///
/// [Public Route] The session as the UI sees it.
#[utoipa::path(
    get,
    path = "/session",
    responses((status = 200, description = "Current session", body = SessionView))
)]
pub async fn get_session(State(state): State<AppState>) -> Json<SessionView> {
    let view = state.session.read().view();
    Json(view)
}

/// login
///
/// [Public Route] Forwards the credentials to `POST /auth/login` and, on success, adopts the
/// returned token. The response names the role's landing page.
#[utoipa::path(
    post,
    path = "/session/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginOutcome),
        (status = 401, description = "Credentials rejected"),
        (status = 502, description = "API unreachable or returned an unusable token")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginOutcome>, StatusCode> {
    let response = state.api.login(&payload).await.map_err(|e| {
        tracing::warn!(username = %payload.username, error = %e, "login failed");
        upstream_status(&e)
    })?;

    let role = Role::from_claim(Some(&response.role));
    let session = {
        let mut session = state.session.write();
        session
            .login(&response.token, &response.username, role)
            .map_err(|_| StatusCode::BAD_GATEWAY)?;
        session.view()
    };

    Ok(Json(LoginOutcome {
        session,
        redirect: landing_for(role).to_string(),
    }))
}

/// register
///
/// [Public Route] Creates an account through `POST /auth/register`. Does not sign in; the UI is
/// sent to the login page.
#[utoipa::path(
    post,
    path = "/session/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Registered", body = RedirectView),
        (status = 400, description = "Rejected by the API")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<RedirectView>, StatusCode> {
    state.api.register(&payload).await.map_err(|e| {
        tracing::warn!(username = %payload.username, error = %e, "registration failed");
        upstream_status(&e)
    })?;

    tracing::info!(username = %payload.username, "account registered");
    Ok(Json(RedirectView {
        redirect: LOGIN_PATH.to_string(),
    }))
}

/// logout
///
/// [Public Route] Ends the session. Always succeeds.
#[utoipa::path(
    post,
    path = "/session/logout",
    responses((status = 200, description = "Logged out", body = RedirectView))
)]
pub async fn logout(State(state): State<AppState>) -> Json<RedirectView> {
    state.session.write().logout();
    Json(RedirectView {
        redirect: LOGIN_PATH.to_string(),
    })
}

/// render_page
///
/// Describes the page at the request path. Only reached after the router's guard layer allowed
/// the navigation.
pub async fn render_page(State(state): State<AppState>, uri: Uri) -> Result<Json<PageView>, StatusCode> {
    let path = uri.path();
    let destination = routes::resolve(path).ok_or(StatusCode::NOT_FOUND)?;

    let session = state.session.read().view();
    let chrome = chrome_for(path, session.is_authenticated);

    Ok(Json(PageView {
        path: path.to_string(),
        page: destination.page.to_string(),
        header: chrome.header,
        full_width: chrome.full_width,
        session,
    }))
}
