//! Authentication infrastructure module
//!
//! HS256 JWT issuing and validation for logged-in users.

mod jwt;

pub use jwt::{IssuedToken, JwtClaims, JwtConfig, JwtGenerator, JwtService};
