#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Literals, clauses and the DIMACS form of a CNF formula.

pub mod assignment;
pub mod clause;
pub mod dimacs;
pub mod formula;
pub mod literal;

pub use assignment::Assignment;
pub use clause::Clause;
pub use formula::Cnf;
pub use literal::{Literal, Variable};
