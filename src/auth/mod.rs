//! Authentication primitives: token signing/verification and password
//! hashing. Both are black boxes to the rest of the crate.

pub mod password;
pub mod token;

pub use password::{hash_password, verify_password};
pub use token::{sign_token, verify_token, Claims, TokenConfig};
