use serde::{Deserialize, Serialize};

/// Credentials presented at login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub identity: String,
    pub secret: String,
}

/// Successful login payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub identity: String,
}
