//! Authenticated document client for the SSR editor.
//!
//! This crate provides:
//! - CRUD access to the document collection with the session's bearer token
//! - A local mirror of the collection kept loosely in sync after writes
//! - Mail sharing and remote code execution
//! - A last-error slot describing the most recent failed operation

mod client;
mod document;
mod error;
mod exec;

pub use client::DocumentClient;
pub use document::{Document, DocumentFields};
pub use error::{DocsError, DocsResult};
pub use exec::{decode_output, encode_source};
