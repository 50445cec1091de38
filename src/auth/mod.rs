//! Bearer-token authentication
//!
//! HS256 JWTs carry the caller's account id and role. The gateway verifies
//! them in [`middleware::jwt_auth_middleware`] and injects [`Claims`] into the
//! request; admin-only routes additionally pass [`middleware::require_admin`].
//!
//! Token issuance for real users (login, refresh) lives outside this service;
//! [`JwtService::issue`] exists for operators and tests.

pub mod claims;
pub mod error;
pub mod jwt;
pub mod middleware;

pub use claims::{Claims, Role};
pub use error::AuthError;
pub use jwt::JwtService;
pub use middleware::{jwt_auth_middleware, require_admin};
