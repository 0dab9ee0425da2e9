/// JWT authentication middleware
///
/// Validates the `Authorization: Bearer <token>` header and injects the
/// caller's [`AuthContext`] into request extensions. Handlers pick it up
/// with `Extension<AuthContext>`.
///
/// - missing header: 401
/// - header not in `Bearer` form: 400
/// - invalid or expired token: 401

use crate::{app::AppState, error::ApiError};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use hirepath_shared::auth::middleware::{authenticate_headers, AuthContext};

pub async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth: AuthContext = authenticate_headers(req.headers(), state.jwt_secret())?;

    tracing::debug!(user_id = %auth.user_id, role = auth.role.as_str(), "Request authenticated");
    req.extensions_mut().insert(auth);

    Ok(next.run(req).await)
}
