#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Truth assignments over CNF variables.

use crate::cnf::literal::{Literal, Variable};
use core::ops::Index;

/// The state of one variable in an [`Assignment`].
#[derive(Debug, Clone, PartialEq, Eq, Copy, Default, Hash, PartialOrd, Ord)]
pub enum VarState {
    /// No value was given.
    #[default]
    Unassigned,
    /// The variable holds this value.
    Assigned(bool),
}

impl VarState {
    /// Whether a value was given.
    #[must_use]
    pub const fn is_assigned(self) -> bool {
        matches!(self, Self::Assigned(_))
    }

    /// The value, if one was given.
    #[must_use]
    pub const fn value(self) -> Option<bool> {
        match self {
            Self::Assigned(b) => Some(b),
            Self::Unassigned => None,
        }
    }
}

/// A (partial) truth assignment indexed by variable, typically the model
/// reported by a solver.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Assignment(Vec<VarState>);

impl Index<Variable> for Assignment {
    type Output = VarState;

    fn index(&self, index: Variable) -> &Self::Output {
        self.0.get(index as usize).unwrap_or(&VarState::Unassigned)
    }
}

impl Assignment {
    /// An empty assignment with room for `num_vars` variables.
    #[must_use]
    pub fn new(num_vars: usize) -> Self {
        Self(vec![VarState::Unassigned; num_vars + 1])
    }

    /// Builds an assignment from model literals such as `[1, -2, 3]`.
    /// Zeros are ignored.
    #[must_use]
    pub fn from_dimacs(values: &[i32]) -> Self {
        values.iter().filter_map(|&v| Literal::from_i32(v)).collect()
    }

    /// Gives `var` a value, growing the assignment when `var` is beyond it.
    pub fn set(&mut self, var: Variable, value: bool) {
        let index = var as usize;
        if index >= self.0.len() {
            self.0.resize(index + 1, VarState::Unassigned);
        }
        self.0[index] = VarState::Assigned(value);
    }

    /// Makes `literal` true.
    pub fn assign(&mut self, literal: Literal) {
        self.set(literal.variable(), literal.polarity());
    }

    /// The value of `var`, `None` when unassigned.
    #[must_use]
    pub fn value(&self, var: Variable) -> Option<bool> {
        self[var].value()
    }

    /// The largest variable holding a value.
    #[must_use]
    pub fn highest_assigned(&self) -> Option<Variable> {
        let index = self.0.iter().rposition(|state| state.is_assigned())?;
        Variable::try_from(index).ok()
    }

    /// Number of assigned variables.
    #[must_use]
    pub fn assigned(&self) -> usize {
        self.0.iter().filter(|s| s.is_assigned()).count()
    }

    /// The assigned variables as DIMACS literals, in variable order.
    #[must_use]
    pub fn to_dimacs(&self) -> Vec<i32> {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(i, state)| {
                let var = Variable::try_from(i).ok()?;
                state.value().map(|b| Literal::new(var, b).to_i32())
            })
            .collect()
    }
}

impl FromIterator<Literal> for Assignment {
    fn from_iter<T: IntoIterator<Item = Literal>>(iter: T) -> Self {
        let mut assignment = Self::default();
        for literal in iter {
            assignment.assign(literal);
        }
        assignment
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_dimacs() {
        let assignment = Assignment::from_dimacs(&[1, -3, 0]);
        assert_eq!(assignment.value(1), Some(true));
        assert_eq!(assignment.value(2), None);
        assert_eq!(assignment.value(3), Some(false));
        assert_eq!(assignment.value(99), None);
        assert_eq!(assignment.assigned(), 2);
        assert_eq!(assignment.to_dimacs(), vec![1, -3]);
        assert_eq!(assignment.highest_assigned(), Some(3));
    }

    #[test]
    fn test_set_overrides() {
        let mut assignment = Assignment::new(2);
        assignment.set(2, true);
        assignment.set(2, false);
        assert_eq!(assignment[2], VarState::Assigned(false));
        assert_eq!(assignment[1], VarState::Unassigned);

        assert_eq!(Assignment::new(5).highest_assigned(), None);
        assert_eq!(Assignment::default().highest_assigned(), None);
    }
}
