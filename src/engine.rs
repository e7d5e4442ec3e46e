//! Matching and resolution engine.
//!
//! This module consumes an input string against a compiled token list and
//! turns the captured raw fields into a single absolute instant:
//!
//! ```text
//! pattern ── pattern::compile ──▶ [Token, Token, ...]
//!                                       │
//! input ────────────────────────▶ run_match (matcher.rs)
//!                                   - one cursor, left to right
//!                                   - no backtracking across tokens
//!                                   - name lookups via names.rs
//!                                       │
//!                                       ▼
//!                                  RawFields + spans
//!                                       │
//!                                       ▼
//!                                  resolve (resolve.rs)
//!                                   - two-digit-year pivot
//!                                   - 12-hour + AM/PM conversion
//!                                   - compose under the fixed offset
//!                                       │
//!                                       ▼
//!                              DateTime<FixedOffset>
//! ```
//!
//! ## Responsibilities by module
//!
//! - `matcher.rs`: the single-pass match loop, the input cursor, and the
//!   `RawFields` scratch record accumulated during a parse call.
//! - `names.rs`: the built-in English month/weekday tables, built once.
//! - `resolve.rs`: raw-field defaulting and composition into a
//!   `DateTime<FixedOffset>`.
//!
//! A local mismatch fails the whole parse immediately; no partial results
//! escape. Each parse call owns its `RawFields`, so a compiled pattern can be
//! shared across threads freely.
//!
//! ## Debugging
//!
//! Set `TIMEPAT_DEBUG=1` to print the compiled token list and per-token
//! consumed spans.

#[path = "engine/matcher.rs"]
mod matcher;
#[path = "engine/names.rs"]
mod names;
#[path = "engine/resolve.rs"]
mod resolve;

pub(crate) use matcher::run_match;
pub(crate) use resolve::resolve;
