//! Credential store: password digests, signed tokens and the bearer filter

pub mod filter;
pub mod password;
pub mod service;
pub mod token;

pub use filter::{authenticate, with_auth};
pub use password::{hash_password, verify_password};
pub use service::{AccountService, Session};
pub use token::{now_secs, Claims, TokenError, TokenService};
