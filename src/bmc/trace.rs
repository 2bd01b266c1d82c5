#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Reading a solver model back as signal values per frame.

use crate::bmc::allocator::VariableAllocator;
use crate::cnf::Assignment;
use crate::netlist::{Netlist, SignalKind};
use itertools::Itertools;
use std::fmt::{self, Display};

/// Signal values over the frames of a witness. A value is `None` when the
/// signal had no variable in that frame (it did not influence the query) or
/// when the model left its variable unassigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trace {
    names: Vec<String>,
    kinds: Vec<SignalKind>,
    frames: Vec<Vec<Option<bool>>>,
}

impl Trace {
    /// Builds the trace of a model. Variables the model leaves unassigned
    /// stay unknown; nothing is filled in.
    #[must_use]
    pub fn from_model(
        netlist: &Netlist,
        allocator: &VariableAllocator,
        model: &Assignment,
        bound: usize,
    ) -> Self {
        let width = netlist.signals().len();
        let mut frames = vec![vec![None; width]; bound];
        for (var, key) in allocator.iter() {
            if let Some(row) = frames.get_mut(key.frame) {
                row[key.signal.index()] = model.value(var);
            }
        }
        Self {
            names: netlist.signals().iter().map(|s| s.name.clone()).collect(),
            kinds: netlist.signals().iter().map(|s| s.kind).collect(),
            frames,
        }
    }

    /// Number of frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the trace has no frames.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// The value of a named signal at `frame`.
    #[must_use]
    pub fn value(&self, signal: &str, frame: usize) -> Option<bool> {
        let index = self.names.iter().position(|n| n == signal)?;
        self.frames.get(frame)?.get(index).copied().flatten()
    }

    fn of_kind(&self, kind: SignalKind, frame: usize) -> Vec<(&str, bool)> {
        let Some(row) = self.frames.get(frame) else {
            return Vec::new();
        };
        self.names
            .iter()
            .zip(&self.kinds)
            .zip(row)
            .filter(|((_, k), _)| **k == kind)
            .filter_map(|((name, _), value)| value.map(|v| (name.as_str(), v)))
            .collect_vec()
    }

    /// Primary input values at `frame`, in declaration order.
    #[must_use]
    pub fn inputs_at(&self, frame: usize) -> Vec<(&str, bool)> {
        self.of_kind(SignalKind::Input, frame)
    }

    /// State register values at `frame`, in declaration order.
    #[must_use]
    pub fn state_at(&self, frame: usize) -> Vec<(&str, bool)> {
        self.of_kind(SignalKind::StateRegister, frame)
    }

    /// Re-evaluates every gate whose operands are all known and reports
    /// whether the trace agrees with the netlist's logic.
    #[must_use]
    pub fn is_consistent_with(&self, netlist: &Netlist) -> bool {
        self.frames.iter().all(|row| {
            netlist.gates().iter().all(|gate| {
                let inputs: Option<Vec<bool>> =
                    gate.inputs.iter().map(|id| row[id.index()]).collect();
                match (inputs, row[gate.output.index()]) {
                    (Some(inputs), Some(out)) => gate.kind.evaluate(&inputs) == out,
                    _ => true,
                }
            })
        })
    }
}

impl Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.names.iter().map(String::len).max().unwrap_or(0).max(6);
        write!(f, "{:<width$}  {:<6}", "signal", "kind")?;
        for t in 0..self.len() {
            write!(f, " {t:>3}")?;
        }
        writeln!(f)?;
        for (i, (name, kind)) in self.names.iter().zip(&self.kinds).enumerate() {
            write!(f, "{name:<width$}  {:<6}", kind.to_string())?;
            for row in &self.frames {
                let cell = match row[i] {
                    Some(true) => "1",
                    Some(false) => "0",
                    None => "-",
                };
                write!(f, " {cell:>3}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
