//! Session management for the SSR editor client.
//!
//! This crate provides:
//! - Login and signup against the document API's auth endpoints
//! - The current session (bearer token + user record), observable and
//!   persisted through `editor-storage`
//! - The `TokenProvider` seam authenticated clients read the token through

mod error;
mod http;
mod session;
mod token;

pub use error::{AuthError, AuthResult};
pub use http::{error_message, summarize_response_body};
pub use session::{LoginResponse, Session, SessionManager};
pub use token::{StaticToken, TokenProvider};
