#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Errors raised while building, encoding or checking a netlist.
//!
//! Every variant is fatal to the encoding attempt it was raised in: the
//! encoder never produces partial output. Variants carry the signal name or
//! gate position needed to find the defect in the source netlist.

use std::path::PathBuf;
use thiserror::Error;

use crate::netlist::model::SignalKind;

/// The error type shared by the whole crate.
#[derive(Error, Debug)]
pub enum BmcError {
    /// A gate, binding or target references a signal that was never declared.
    #[error("unknown signal `{signal}` referenced by {context}")]
    UnknownSignal {
        /// The undeclared name.
        signal: String,
        /// Where the reference appeared, e.g. "gate #2 (and -> n0)".
        context: String,
    },

    /// A gate's input count does not match its type.
    #[error("gate #{index} ({gate} -> {output}) expects {expected} input(s) but has {actual}")]
    ArityMismatch {
        /// Position of the gate in the netlist.
        index: usize,
        /// Gate type name.
        gate: String,
        /// The gate's output signal.
        output: String,
        /// Inputs required by the gate type.
        expected: usize,
        /// Inputs actually supplied.
        actual: usize,
    },

    /// A gate type outside `and`, `or`, `not`, `xor`, `nand`, `nor`.
    #[error("unsupported gate type `{0}`")]
    UnsupportedGate(String),

    /// A state register without a binding.
    #[error("state register `{0}` has no next-state binding")]
    UnboundRegister(String),

    /// The target vector length differs from the number of state registers.
    #[error("target has {actual} bit(s) but the netlist declares {expected} state register(s)")]
    TargetArityMismatch {
        /// Number of state registers.
        expected: usize,
        /// Number of supplied bits.
        actual: usize,
    },

    /// A named target refers to something that is not a state register.
    #[error("target assigns `{0}`, which is not a state register")]
    UnknownTargetSignal(String),

    /// A named target assigns the same register twice.
    #[error("target assigns `{0}` more than once")]
    DuplicateTargetSignal(String),

    /// A target bit string contains something other than `0` or `1`.
    #[error("invalid target bit `{0}` (expected 0 or 1)")]
    InvalidTargetBit(char),

    /// The transition bound is below one.
    #[error("invalid bound {0}: at least one frame is required")]
    InvalidBound(usize),

    /// A signal declared twice.
    #[error("signal `{0}` is declared more than once")]
    DuplicateSignal(String),

    /// A signal with more than one driver.
    #[error("signal `{0}` has more than one driver")]
    MultipleDrivers(String),

    /// A signal is driven by something its kind does not allow, e.g. a gate
    /// driving an input or a register binding targeting a wire.
    #[error("{driver} drives `{signal}`, which is declared as {kind}")]
    IllegalDriver {
        /// The offending gate or binding.
        driver: String,
        /// The driven signal.
        signal: String,
        /// The declared kind of the driven signal.
        kind: SignalKind,
    },

    /// The combinational gate layer contains a feedback loop.
    #[error("combinational cycle through signal `{0}`")]
    CombinationalCycle(String),

    /// The netlist source is not valid structural Verilog.
    #[error("parse error on line {line}: {message}")]
    Parse {
        /// One-based source line.
        line: usize,
        /// What was expected or found.
        message: String,
    },

    /// The external solver failed or produced unreadable output.
    #[error("solver error: {0}")]
    Solver(String),

    /// Reading or writing a file failed.
    #[error("{}: {source}", path.display())]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying failure.
        #[source]
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BmcError>;

impl BmcError {
    /// Wraps an I/O failure on `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
