//! Session tokens for the register.
//!
//! A signed-in employee carries an HS256 bearer token naming them and the
//! shift schedule they are working; checkout derives its employee and
//! schedule references from these claims instead of trusting the client.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{errors::ServiceError, AppState};

/// Claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Employee id
    pub sub: String,
    /// Shift schedule the employee is clocked in under
    pub schedule_id: i32,
    pub exp: usize,
    pub iat: usize,
    pub jti: String,
}

/// Identity of the employee working the register, decoded from the bearer
/// token of the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionContext {
    pub employee_id: i32,
    pub schedule_id: i32,
}

/// Issues a session token for an employee clocking in on a schedule.
///
/// Minting happens in the staff clock-in system, which shares the signing
/// secret; this API only verifies tokens. The helper backs that flow and
/// the test harness.
pub fn issue_session_token(
    secret: &str,
    employee_id: i32,
    schedule_id: i32,
    ttl_secs: usize,
) -> Result<String, ServiceError> {
    let now = Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: employee_id.to_string(),
        schedule_id,
        exp: now + ttl_secs,
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ServiceError::InternalError(format!("failed to sign session token: {}", e)))
}

/// Decodes and verifies a session token.
pub fn decode_session_token(secret: &str, token: &str) -> Result<SessionContext, ServiceError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| ServiceError::Unauthorized(format!("invalid session token: {}", e)))?;

    let employee_id = data
        .claims
        .sub
        .parse::<i32>()
        .map_err(|_| ServiceError::Unauthorized("malformed employee id in token".to_string()))?;

    Ok(SessionContext {
        employee_id,
        schedule_id: data.claims.schedule_id,
    })
}

#[async_trait::async_trait]
impl<S> FromRequestParts<S> for SessionContext
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ServiceError::Unauthorized("missing authorization header".to_string()))?;

        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or_else(|| ServiceError::Unauthorized("expected a bearer token".to_string()))?;

        decode_session_token(&state.config.jwt_secret, token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test_session_secret_that_is_long_enough_for_hs256";

    #[test]
    fn token_round_trips_employee_and_schedule() {
        let token = issue_session_token(SECRET, 7, 3, 3600).unwrap();
        let ctx = decode_session_token(SECRET, &token).unwrap();
        assert_eq!(
            ctx,
            SessionContext {
                employee_id: 7,
                schedule_id: 3
            }
        );
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = issue_session_token("another_secret_that_is_also_long_enough!!", 7, 3, 3600)
            .unwrap();
        let err = decode_session_token(SECRET, &token).unwrap_err();
        assert_eq!(
            err.status_code(),
            axum::http::StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(decode_session_token(SECRET, "not.a.token").is_err());
    }
}
