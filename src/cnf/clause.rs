#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Disjunctions of literals.

use crate::cnf::assignment::Assignment;
use crate::cnf::literal::Literal;
use core::ops::Index;
use itertools::Itertools;
use smallvec::SmallVec;

/// A disjunction of literals. Gate encodings never exceed three literals,
/// so clauses live inline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Clause {
    literals: SmallVec<[Literal; 3]>,
}

impl Clause {
    /// A clause over `literals`, kept in the given order.
    #[must_use]
    pub fn new(literals: impl IntoIterator<Item = Literal>) -> Self {
        Self {
            literals: literals.into_iter().collect(),
        }
    }

    /// A single-literal clause.
    #[must_use]
    pub fn unit(literal: Literal) -> Self {
        Self::new([literal])
    }

    /// Number of literals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    /// Whether the clause has no literals (and so is unsatisfiable).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Whether the clause has exactly one literal.
    #[must_use]
    pub fn is_unit(&self) -> bool {
        self.len() == 1
    }

    /// The literals in clause order.
    pub fn iter(&self) -> impl Iterator<Item = &Literal> {
        self.literals.iter()
    }

    /// The literals as a slice.
    #[must_use]
    pub fn literals(&self) -> &[Literal] {
        &self.literals
    }

    /// The literals as DIMACS integers, in clause order.
    #[must_use]
    pub fn to_i32s(&self) -> Vec<i32> {
        self.iter().map(|lit| lit.to_i32()).collect_vec()
    }

    /// True when some literal holds under `assignment`. Unassigned variables
    /// count as false.
    #[must_use]
    pub fn is_satisfied_by(&self, assignment: &Assignment) -> bool {
        self.iter()
            .any(|&lit| assignment.value(lit.variable()).unwrap_or(false) == lit.polarity())
    }
}

impl Index<usize> for Clause {
    type Output = Literal;

    fn index(&self, index: usize) -> &Self::Output {
        &self.literals[index]
    }
}

impl FromIterator<Literal> for Clause {
    fn from_iter<T: IntoIterator<Item = Literal>>(iter: T) -> Self {
        Self::new(iter)
    }
}

impl<'a> IntoIterator for &'a Clause {
    type Item = &'a Literal;
    type IntoIter = std::slice::Iter<'a, Literal>;

    fn into_iter(self) -> Self::IntoIter {
        self.literals.iter()
    }
}
