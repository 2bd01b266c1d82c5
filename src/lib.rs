#![deny(missing_docs)]
//! Bounded model checking of gate-level netlists.
//!
//! A synchronous netlist (primary inputs, combinational gates, state
//! registers with next-state bindings) is unrolled over `T` time frames into
//! a CNF formula in DIMACS form. The formula is satisfiable exactly when some
//! input sequence drives the registers from the all-zero reset state to a
//! requested target state at frame `T - 1`.
//!
//! ```
//! use netlist_bmc::bmc::{Target, encode};
//! use netlist_bmc::netlist::{GateKind, NetlistBuilder};
//!
//! let netlist = NetlistBuilder::new("latch")
//!     .input("a")
//!     .input("b")
//!     .register("s0")
//!     .wire("n0")
//!     .gate(GateKind::And, "n0", &["a", "b"])
//!     .bind("s0", "n0")
//!     .build()?;
//! let encoding = encode(&netlist, 2, &Target::from_bits("1")?)?;
//! assert!(encoding.to_dimacs().starts_with("p cnf 8 10\n"));
//! # Ok::<(), netlist_bmc::BmcError>(())
//! ```

/// Unrolling, target constraints and trace decoding.
pub mod bmc;

/// Literals, clauses and DIMACS output.
pub mod cnf;

/// The crate's error type.
pub mod error;

/// The netlist model and its structural Verilog front-end.
pub mod netlist;

/// Running an external SAT solver on an encoding.
pub mod solver;

pub use error::{BmcError, Result};
