//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::value_object::{security_mode::SecurityMode, user_role::UserRole};

// ============================================================================
// Register / Login
// ============================================================================

/// Register and login request
#[derive(Clone, Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for CredentialsRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialsRequest")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Token delivered in the body (vulnerable mode only)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenResponse {
    pub access_token: String,
}

// ============================================================================
// Current User
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub username: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Security Mode
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeResponse {
    pub mode: SecurityMode,
}

/// The literal is kept raw so an unknown value becomes a mode error, not a
/// body parse error.
#[derive(Debug, Clone, Deserialize)]
pub struct SetModeRequest {
    pub mode: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeChangedResponse {
    pub mode: SecurityMode,
    pub message: String,
}

// ============================================================================
// Admin
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminStatusResponse {
    pub mode: SecurityMode,
    pub username: String,
}
