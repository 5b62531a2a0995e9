// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # Mustekala - Cookie-Aware HTTP Session Layer
//!
//! A stateful HTTP session layer for security testing tooling. Pure Rust,
//! engine-agnostic: the session logic is separated from network I/O by a
//! transport seam, so the same resolution and parsing code runs against
//! the real HTTP engine or a test double.
//!
//! ## Features
//!
//! - Layered options: per-request options overlay session-wide defaults
//! - Relative-URL resolution against the previous effective URL
//! - Referrer auto-detection with all/same-host/off modes
//! - Netscape cookie-jar wire format, byte-compatible with existing jars
//! - Raw response parsing with chained interim-block unwrapping
//! - Form, multipart and JSON request helpers
//!
//! ## Example
//!
//! ```rust,no_run
//! use mustekala::{HttpTransport, RequestOptions, Session};
//!
//! fn main() -> mustekala::Result<()> {
//!     let transport = HttpTransport::new()?;
//!     let mut session = Session::new(transport, RequestOptions::new().verbose(1))?;
//!
//!     let response = session.get("https://example.com/login")?;
//!     println!("status: {:?}", response.status());
//!
//!     // Cookies from the first response ride along automatically
//!     let response = session.post("/login", &[("user", "test"), ("pass", "hunter2")])?;
//!     println!("landed on: {:?}", session.last_effective_url());
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod http;
pub mod session;
pub mod transport;

// Re-exports for convenience

// Errors
pub use error::{Error, Result};

// HTTP value types
pub use http::{Cookie, HeaderSet, Response, UrlParts, DEFAULT_USER_AGENT};

// Session
pub use session::{
    form_urlencode, AutoReferer, Body, MultipartValue, RequestOptions, ResolvedOptions, Session,
};

// Transport
pub use transport::{HttpTransport, HttpTransportConfig, Transport, TransportOutcome};

/// Mustekala version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
