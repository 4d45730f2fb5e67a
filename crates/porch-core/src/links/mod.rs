//! Link extraction for call-to-action buttons.
//!
//! Bot replies may carry markdown-style links or bare URLs. This module
//! scans the full reply text once, canonicalizes candidate URLs, keeps
//! only those pointing at the allow-listed domain, and collapses
//! duplicates so the widget can render a stable row of CTA buttons.
//!
//! # Module Structure
//!
//! - `canonical`: URL normalization and the dedup key
//! - `extractor`: the scan/select/dedup pipeline

mod canonical;
mod extractor;

// Re-export public API
pub use extractor::{Link, LinkExtractor};
