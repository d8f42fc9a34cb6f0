//! # sg-policy
//!
//! Type filters and the ordered filter registry for Stencil Guard.
//!
//! A [`TypeFilter`] answers one question about one host type name: allow it,
//! deny it, or abstain. The [`FilterRegistry`] holds filters in registration
//! order and turns their answers into a single [`AccessVerdict`].
//!
//! ## Key invariants
//!
//! - **First decisive filter wins**: filters are consulted in registration
//!   order; the first Allow or Deny ends evaluation.
//! - **Fail closed**: if every filter abstains (or none are registered), the
//!   registry denies.
//! - **No caching**: every evaluation runs against the filters registered at
//!   that moment.
//! - **Consistent snapshots**: an evaluation never observes a half-applied
//!   register or deregister.

pub mod builtin;
pub mod config;
pub mod error;
pub mod filter;
pub mod registry;
pub mod verdict;

pub use builtin::{PatternFilter, SubtypeFilter, TypeListFilter};
pub use config::{FilterSpec, MatchKind, PolicyConfig};
pub use error::PolicyError;
pub use filter::{FilterAction, FilterDecision, FilterRef, FnFilter, TypeFilter};
pub use registry::{FilterRegistry, FilterSnapshot, FilterStep};
pub use verdict::{AccessVerdict, Verdict, VerdictBasis};
