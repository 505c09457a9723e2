use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct SessionClaims {
    pub username: String,
    pub auth_provider: String,
    pub exp: usize, // expiration (as UNIX timestamp)
}
