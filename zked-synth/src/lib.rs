//! # zked-synth - driver-based circuit synthesis
//!
//! Circuits are written once against the [`Driver`] trait and then run under
//! whichever driver the situation calls for:
//!
//! - [`drivers::ProvingDriver`] records the witness and a rank-1 constraint
//!   system that can be inspected and re-checked.
//! - [`drivers::CheckingDriver`] evaluates every constraint on the fly and
//!   stops at the first violation. It stores nothing, which makes it
//!   suitable for circuits with millions of constraints.
//! - [`drivers::CountingDriver`] measures the shape of a circuit without any
//!   witness data.
//!
//! ## Maybe<T>
//!
//! Witness values are wrapped in a higher-kinded [`Maybe`] that compiles down
//! to either `Always<T>` (a transparent wrapper) or `Empty<T>` (a zero-sized
//! type). Under the counting driver every witness closure is skipped, so
//! shape-only synthesis never touches witness data.
//!
//! ## Constraint model
//!
//! A driver offers three primitives:
//!
//! - `mul`: a multiplication gate `a * b = c` over three fresh wires
//! - `add`: a wire equal to a linear combination
//! - `enforce_zero`: a linear constraint
//!
//! ```rust,ignore
//! use zked_synth::{Driver, WireValue, Error};
//! use zked_synth::gadgets::mul;
//!
//! fn cube<D: Driver>(dr: &mut D, x: &WireValue<D>) -> Result<WireValue<D>, Error> {
//!     let x2 = mul(dr, x, x)?;
//!     mul(dr, &x2, x)
//! }
//! ```

pub mod circuit;
pub mod driver;
pub mod drivers;
pub mod error;
pub mod gadgets;
pub mod maybe;
pub mod sink;

pub use circuit::Circuit;
pub use driver::{Driver, WireValue, Witness};
pub use drivers::DriverStats;
pub use error::{Error, Result};
pub use maybe::{Always, AlwaysKind, Empty, EmptyKind, Maybe, MaybeKind};
pub use sink::Sink;
