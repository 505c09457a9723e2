use std::collections::HashSet;

use crate::routes::auth::claims::SessionClaims;
use jsonwebtoken::{
    decode, encode, errors::Error, Algorithm, DecodingKey, EncodingKey, Header, TokenData,
    Validation,
};
use thiserror::Error;

/// Minimum acceptable size for the session secret in bytes.
pub const MIN_SESSION_SECRET_LENGTH: usize = 32;
/// Minimum number of unique bytes expected for the session secret to avoid trivially guessable values.
const MIN_UNIQUE_SECRET_BYTES: usize = 8;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionSecretError {
    #[error("SESSION_SECRET must be at least {required} bytes, but {actual} bytes were provided")]
    TooShort { actual: usize, required: usize },
    #[error(
        "SESSION_SECRET must contain sufficient entropy (at least {required} unique bytes); only {actual} unique bytes found"
    )]
    LowEntropy { actual: usize, required: usize },
}

#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl std::fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionKeys").finish_non_exhaustive()
    }
}

impl SessionKeys {
    pub fn from_secret(secret: impl AsRef<[u8]>) -> Result<Self, SessionSecretError> {
        let bytes = secret.as_ref();
        validate_secret(bytes)?;

        Ok(Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
        })
    }

    pub fn encoding_key(&self) -> &EncodingKey {
        &self.encoding
    }

    pub fn decoding_key(&self) -> &DecodingKey {
        &self.decoding
    }
}

fn validate_secret(secret: &[u8]) -> Result<(), SessionSecretError> {
    if secret.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(SessionSecretError::TooShort {
            actual: secret.len(),
            required: MIN_SESSION_SECRET_LENGTH,
        });
    }

    let unique = secret.iter().copied().collect::<HashSet<_>>().len();
    if unique < MIN_UNIQUE_SECRET_BYTES {
        return Err(SessionSecretError::LowEntropy {
            actual: unique,
            required: MIN_UNIQUE_SECRET_BYTES,
        });
    }

    Ok(())
}

pub fn create_jwt(claims: &SessionClaims, keys: &SessionKeys) -> Result<String, Error> {
    encode(&Header::default(), claims, keys.encoding_key())
}

pub fn decode_jwt(token: &str, keys: &SessionKeys) -> Result<TokenData<SessionClaims>, Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = 0;
    decode::<SessionClaims>(token, keys.decoding_key(), &validation)
}

#[cfg(test)]
pub(crate) fn test_keys() -> SessionKeys {
    SessionKeys::from_secret("0123456789abcdef0123456789abcdef").expect("valid test secret")
}
