//! Error types for the client-facing API.

use std::fmt;

/// Marker error for a client write that did not reach a decision.
///
/// Carried as `error_stack::Report<WriteError>` with the operation and
/// proposal id attached. A minority of unreachable or rejecting peers is
/// not an error — only a round that falls short of quorum surfaces here.
#[derive(Debug)]
pub struct WriteError;

impl fmt::Display for WriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("write did not reach a decision")
    }
}

impl core::error::Error for WriteError {}
