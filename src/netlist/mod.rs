#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Netlist model and the structural Verilog front-end that produces it.

pub mod lexer;
pub mod model;
pub mod parser;

pub use model::{
    Gate, GateInstance, GateKind, Item, Netlist, NetlistBuilder, Register, RegisterBinding,
    Signal, SignalId, SignalKind,
};
pub use parser::{parse_netlist, parse_netlist_file};
