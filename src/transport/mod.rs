// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Transport seam
//!
//! The session layer never performs network I/O itself: it computes a
//! [`ResolvedOptions`] going in and interprets bytes coming out. Anything
//! that can execute a configured call - a real HTTP engine, a recording
//! test double - plugs in behind [`Transport`].

mod http;

pub use http::{HttpTransport, HttpTransportConfig};

use bytes::Bytes;

use crate::error::Result;
use crate::session::ResolvedOptions;

/// Result of one transport call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportOutcome {
    /// Captured response bytes (headers included when configured)
    Raw(Bytes),
    /// The call succeeded but the body was streamed elsewhere, not captured
    NotCaptured,
    /// Connection/transmission-level failure with the engine's message
    Failed(String),
}

/// External HTTP execution engine
///
/// Synchronous, blocking handle model: set options, execute, read result.
/// The engine owns the persistent cookie jar; the session addresses it
/// through wire-format cookie lines only.
pub trait Transport {
    /// Execute one configured call
    fn execute(&mut self, options: &ResolvedOptions) -> TransportOutcome;

    /// The final URL the last call actually reached
    fn effective_url(&self) -> Option<String>;

    /// Current cookie-jar contents as wire-format lines
    fn cookie_lines(&self) -> Vec<String>;

    /// Insert one wire-format cookie line into the jar
    ///
    /// A rejected line is a fatal error for the caller.
    fn add_cookie_line(&mut self, line: &str) -> Result<()>;

    /// Remove all cookies from the jar
    fn clear_cookies(&mut self) -> Result<()>;

    /// Clear per-call state, preserving the cookie jar
    fn reset(&mut self);

    /// Persist the jar and release the handle
    fn close(&mut self);
}
