//! JWT signing and verification keys.
//!
//! Thin wrapper over [`jsonwebtoken`] holding the encoding and decoding key
//! pair derived from the provisioned signing secret. The keys are built once
//! at startup and passed by reference; there is no process-global key state.

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode,
};
use serde::{Serialize, de::DeserializeOwned};

use crate::prelude::*;

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Symmetric key pair for token operations.
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtKeys {
    /// Creates a key pair from raw secret bytes.
    ///
    /// Library-side expiry validation is disabled; the session layer owns
    /// the expiry comparison and its error taxonomy.
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Signs `body` into a compact JWT string.
    pub fn jwt_encode<T>(&self, body: &T) -> Result<String>
    where
        T: Serialize,
    {
        let header = Header::new(ALGORITHM);
        Ok(encode(&header, body, &self.encoding)?)
    }

    /// Verifies the signature of `token` and deserializes its claims.
    pub fn jwt_decode<T>(&self, token: &str) -> core::result::Result<TokenData<T>, jsonwebtoken::errors::Error>
    where
        T: DeserializeOwned,
    {
        decode(token, &self.decoding, &self.validation)
    }
}
