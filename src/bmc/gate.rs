#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Tseitin clauses for one gate at one frame.
//!
//! With output `o` and inputs `a`, `b`:
//!
//! | gate | clauses                                              |
//! |------|------------------------------------------------------|
//! | and  | `(-a -b o) (a -o) (b -o)`                            |
//! | or   | `(a b -o) (-a o) (-b o)`                             |
//! | not  | `(-a -o) (a o)`                                      |
//! | xor  | `(-a -b -o) (a b -o) (-a b o) (a -b o)`              |
//! | nand | `(a b o) (-a -o) (-b -o)`                            |
//! | nor  | `(-a -b o) (a -o) (b -o)`                            |
//!
//! No auxiliary variables are introduced.

use crate::bmc::allocator::VariableAllocator;
use crate::cnf::{Clause, Literal};
use crate::netlist::{Gate, GateKind};
use smallvec::{SmallVec, smallvec};

/// The clauses of one gate, at most four.
pub type GateClauses = SmallVec<[Clause; 4]>;

/// Encodes `gate` at `frame`. Only `(input, frame)` and `(output, frame)`
/// variables are touched; the output is allocated before the inputs.
///
/// # Panics
///
/// If the gate's input count disagrees with its kind, which a validated
/// [`Netlist`](crate::netlist::Netlist) rules out.
pub fn encode(gate: &Gate, frame: usize, allocator: &mut VariableAllocator) -> GateClauses {
    let o = allocator.literal(gate.output, frame, true);
    let inputs: SmallVec<[Literal; 2]> = gate
        .inputs
        .iter()
        .map(|&input| allocator.literal(input, frame, true))
        .collect();
    assert_eq!(inputs.len(), gate.kind.arity(), "unvalidated gate {gate:?}");

    let c = |lits: &[Literal]| Clause::new(lits.iter().copied());
    match gate.kind {
        GateKind::Not => {
            let a = inputs[0];
            smallvec![c(&[-a, -o]), c(&[a, o])]
        }
        GateKind::And => {
            let (a, b) = (inputs[0], inputs[1]);
            smallvec![c(&[-a, -b, o]), c(&[a, -o]), c(&[b, -o])]
        }
        GateKind::Or => {
            let (a, b) = (inputs[0], inputs[1]);
            smallvec![c(&[a, b, -o]), c(&[-a, o]), c(&[-b, o])]
        }
        GateKind::Xor => {
            let (a, b) = (inputs[0], inputs[1]);
            smallvec![
                c(&[-a, -b, -o]),
                c(&[a, b, -o]),
                c(&[-a, b, o]),
                c(&[a, -b, o]),
            ]
        }
        GateKind::Nand => {
            let (a, b) = (inputs[0], inputs[1]);
            smallvec![c(&[a, b, o]), c(&[-a, -o]), c(&[-b, -o])]
        }
        GateKind::Nor => {
            let (a, b) = (inputs[0], inputs[1]);
            smallvec![c(&[-a, -b, o]), c(&[a, -o]), c(&[b, -o])]
        }
    }
}
