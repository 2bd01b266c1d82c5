#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The clause accumulator filled by one encoding run.

use crate::cnf::assignment::Assignment;
use crate::cnf::clause::Clause;
use crate::cnf::dimacs;
use crate::cnf::literal::Literal;
use std::fmt::{self, Display};

/// A CNF formula: the conjunction of its clauses over variables `1..=num_vars`.
/// Clauses keep insertion order, which is also their DIMACS output order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cnf {
    num_vars: u32,
    clauses: Vec<Clause>,
}

impl Cnf {
    /// An empty formula over no variables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a clause.
    pub fn add_clause(&mut self, literals: impl IntoIterator<Item = Literal>) {
        self.push(Clause::new(literals));
    }

    /// Appends an already built clause.
    pub fn push(&mut self, clause: Clause) {
        self.clauses.push(clause);
    }

    /// Appends every clause of `clauses`, in order.
    pub fn extend(&mut self, clauses: impl IntoIterator<Item = Clause>) {
        self.clauses.extend(clauses);
    }

    /// Records the number of variables in the header. The encoder sets this
    /// to the allocator size once all clauses are in.
    pub const fn set_num_vars(&mut self, num_vars: u32) {
        self.num_vars = num_vars;
    }

    /// Number of variables given in the header.
    #[must_use]
    pub const fn num_vars(&self) -> u32 {
        self.num_vars
    }

    /// The clauses in insertion order.
    #[must_use]
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Number of clauses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// Whether the formula has no clauses.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Total number of literal occurrences.
    #[must_use]
    pub fn literal_count(&self) -> usize {
        self.clauses.iter().map(Clause::len).sum()
    }

    /// Checks that `assignment` satisfies every clause.
    #[must_use]
    pub fn verify(&self, assignment: &Assignment) -> bool {
        self.clauses.iter().all(|c| c.is_satisfied_by(assignment))
    }

    /// Whether the formula contains exactly this clause (literal order matters).
    #[must_use]
    pub fn contains(&self, literals: &[i32]) -> bool {
        self.clauses.iter().any(|c| c.to_i32s() == literals)
    }
}

impl Display for Cnf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&dimacs::serialize(self.num_vars, &self.clauses))
    }
}
