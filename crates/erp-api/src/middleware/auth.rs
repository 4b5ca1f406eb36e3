//! Session middleware for the protected route groups.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use erp_service::RequestContext;

use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::extractors::auth::bearer_token;
use crate::state::AppState;

/// Rejects requests without a valid bearer token and stores the resolved
/// [`AuthUser`] in the request extensions for the handlers.
pub async fn require_session(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (mut parts, body) = request.into_parts();
    let user = {
        let token = bearer_token(&parts)?;
        state.session.authenticate(token).await?
    };
    parts.extensions.insert(AuthUser(RequestContext::new(user)));
    Ok(next.run(Request::from_parts(parts, body)).await)
}
