//! # sg-gate
//!
//! The introspection access gate for Stencil Guard.
//!
//! A template engine calls the [`AccessGate`] before every reflective
//! operation on host data. There are two channels, checked independently:
//!
//! - **Object-bound** ([`AccessGate::check_instance_access`]): before a
//!   method call, property read or property write on a live object. The
//!   decision is made on the object's exact runtime type.
//! - **Name-bound** ([`AccessGate::check_type_resolution`]): before a type
//!   is looked up by name and instantiated.
//!
//! Both checks are total: they always return Allow or Deny and never fail.
//! The [`Introspector`] is the mediated invocation layer that applies those
//! verdicts; a Deny turns into "no result", never an error.
//!
//! ## Key invariants
//!
//! - **No gate, no filtering**: an [`EngineConfig`] without a gate, or a
//!   gate whose registry is empty, allows everything.
//! - **Exact type decides**: an allowed parent never rescues a denied
//!   subclass, and a denied parent never implicitly denies a subclass.
//! - **Fail closed when configured**: once any filter is registered, a type
//!   no filter decides on is denied.

pub mod gate;
pub mod introspect;
pub mod trace;

pub use gate::AccessGate;
pub use introspect::{EngineConfig, Introspector};
pub use trace::{CheckChannel, GateTrace};

pub use sg_policy::{AccessVerdict, Verdict, VerdictBasis};
