//! Report renderers for contract assessments.
//!
//! - [`terminal`] — colored summary box and clause tables; respects `--verbose` / `--quiet`.
//! - [`pdf`] — cover page with overall band, level counts and key facts, followed by
//!   a clause table with explanations and suggestions.
//!
//! JSON output is a plain `serde_json` dump of the assessments and lives in `main`.

pub mod pdf;
pub mod terminal;
