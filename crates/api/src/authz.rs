//! API-side capability guard for handlers.
//!
//! Handlers never inspect role strings; they ask the resolver's capability
//! table through this guard and get the ready-made refusal response back.

use axum::http::StatusCode;

use taskhub_auth::{Capabilities, PermissionResolver};

use crate::app::errors;
use crate::context::SessionContext;

/// Require a system capability for the current session.
pub fn require_capability(
    resolver: &PermissionResolver,
    session: &SessionContext,
    select: impl Fn(&Capabilities) -> bool,
) -> Result<(), axum::response::Response> {
    let caps = resolver.permissions_for(session.role());
    if select(&caps) {
        Ok(())
    } else {
        Err(errors::json_error(
            StatusCode::FORBIDDEN,
            "forbidden",
            "insufficient role",
        ))
    }
}
