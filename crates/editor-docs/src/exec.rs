//! Wire format of the external code execution service.
//!
//! Source goes out as base64 in `{ "code": ... }`, output comes back as
//! base64 in `{ "data": ... }`.

use crate::DocsResult;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct ExecRequest {
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExecResponse {
    pub data: String,
}

/// Base64-encode source text for the execution service.
pub fn encode_source(source: &str) -> String {
    BASE64.encode(source.as_bytes())
}

/// Decode the execution service's base64 output into text.
pub fn decode_output(data: &str) -> DocsResult<String> {
    let bytes = BASE64.decode(data.trim())?;
    Ok(String::from_utf8(bytes)?)
}
