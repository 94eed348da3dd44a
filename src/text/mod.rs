//! Text preparation ahead of clause analysis.
//!
//! - [`normalizer`] — decodes raw bytes and canonicalizes whitespace, Unicode
//!   forms and Hindi script into a single comparable string.
//! - [`segmenter`] — splits canonical text into contiguous clause spans.

pub mod normalizer;
pub mod segmenter;
