// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP value types for the session layer
//!
//! Headers, cookies, responses and the URL resolver. Everything here is
//! pure computation - network I/O lives behind the transport seam.

mod cookie;
mod headers;
mod response;
mod url;

pub use cookie::Cookie;
pub use headers::HeaderSet;
pub use response::Response;
pub use url::UrlParts;

/// Default user agent string
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Common HTTP headers
pub mod header_names {
    pub const ACCEPT: &str = "Accept";
    pub const CONTENT_TYPE: &str = "Content-Type";
    pub const COOKIE: &str = "Cookie";
    pub const SET_COOKIE: &str = "Set-Cookie";
    pub const USER_AGENT: &str = "User-Agent";
    pub const REFERER: &str = "Referer";
    pub const LOCATION: &str = "Location";
}
