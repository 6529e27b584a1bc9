//! Credential primitives: password hashing and identity tokens.

mod bcrypt_password_hasher;
mod jwt_token_service;

pub use bcrypt_password_hasher::{BcryptPasswordHasher, DEFAULT_BCRYPT_COST};
pub use jwt_token_service::{Claims, DEFAULT_TOKEN_TTL, JwtConfigError, JwtTokenService};
