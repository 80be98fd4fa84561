//! Domain layer containing the triage vocabulary and pure logic.
//!
//! # Module Organization
//!
//! - `triage` - Ticket analysis values, fingerprints, payload extraction and
//!   the keyword fallback classifier

pub mod triage;
