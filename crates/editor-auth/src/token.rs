//! Bearer token hand-off between the session and authenticated clients.

/// Source of the bearer token attached to authenticated requests.
///
/// Read at request time, so a login or logout between two calls is picked up
/// by the next request. An empty string means there is no session.
pub trait TokenProvider: Send + Sync {
    fn bearer_token(&self) -> String;
}

/// A fixed token, for service accounts and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticToken(pub String);

impl TokenProvider for StaticToken {
    fn bearer_token(&self) -> String {
        self.0.clone()
    }
}
