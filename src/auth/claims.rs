use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT payload. Sessions are stateless: everything needed to authenticate a
/// request lives here, signed with the process-wide secret.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // user ID
    pub iat: usize, // issued at (unix timestamp)
    pub exp: usize, // expires at (unix timestamp)
}
