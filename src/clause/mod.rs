//! Per-clause analysis.
//!
//! - [`classifier`] — first-matching-rule category assignment plus the
//!   contract-type vote carried by that category.
//! - [`scorer`] — worst-case risk level from the category's indicators, with
//!   every match kept as evidence.
//! - [`explain`] — template-driven plain-English rationale and remediation.

pub mod classifier;
pub mod explain;
pub mod scorer;
