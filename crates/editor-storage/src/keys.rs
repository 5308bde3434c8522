//! Storage key constants.

/// Keys used for the durable session
pub struct StorageKeys;

impl StorageKeys {
    /// Bearer token (plain string)
    pub const TOKEN: &'static str = "token";

    /// Current user record (JSON)
    pub const USER: &'static str = "user";
}
