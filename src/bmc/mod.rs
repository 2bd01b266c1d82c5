#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Bounded model checking: turning "is this register state reachable within
//! `T` clock transitions from reset" into a CNF formula.
//!
//! The pipeline is [`unroll`](unroll::unroll) (reset, per-frame gate clauses,
//! register synchronization) followed by [`constrain_target`](target::constrain_target);
//! [`encode`] runs both and returns an [`Encoding`].

pub mod allocator;
pub mod encoder;
pub mod gate;
pub mod target;
pub mod trace;
pub mod unroll;

pub use allocator::{VarKey, VariableAllocator};
pub use encoder::{Encoding, encode};
pub use target::Target;
pub use trace::Trace;
pub use unroll::{SectionCounts, Unrolling};
