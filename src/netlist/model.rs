#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! In-memory representation of a gate-level sequential circuit.
//!
//! A [`Netlist`] is built once from a list of [`Item`]s (as produced by the
//! Verilog front-end or by [`NetlistBuilder`]) and is immutable afterwards.
//! All validation happens in [`Netlist::from_items`]; a netlist that exists
//! is well formed:
//!
//! - every referenced signal is declared, exactly once;
//! - every gate has the arity its type requires;
//! - every signal has at most one driver, and gates only drive wires or outputs;
//! - every state register has exactly one binding;
//! - the gate layer is acyclic.

use crate::error::{BmcError, Result};
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::fmt::{self, Display};
use std::str::FromStr;
use tracing::debug;

/// The declared role of a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SignalKind {
    /// Primary input, free in every frame.
    Input,
    /// Primary output.
    Output,
    /// Internal combinational net.
    Wire,
    /// Clocked state element (`reg`).
    StateRegister,
}

impl Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => write!(f, "input"),
            Self::Output => write!(f, "output"),
            Self::Wire => write!(f, "wire"),
            Self::StateRegister => write!(f, "reg"),
        }
    }
}

/// A declared signal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signal {
    /// Unique name within the netlist.
    pub name: String,
    /// Declared kind, fixed at declaration.
    pub kind: SignalKind,
}

impl Signal {
    /// A signal named `name` of the given kind.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: SignalKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// The supported boolean gate types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GateKind {
    /// Two-input conjunction.
    And,
    /// Two-input disjunction.
    Or,
    /// Inverter.
    Not,
    /// Two-input exclusive or.
    Xor,
    /// Negated conjunction.
    Nand,
    /// Negated disjunction.
    Nor,
}

impl GateKind {
    /// Every supported gate type.
    pub const ALL: [Self; 6] = [
        Self::And,
        Self::Or,
        Self::Not,
        Self::Xor,
        Self::Nand,
        Self::Nor,
    ];

    /// Number of inputs the gate takes.
    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Self::Not => 1,
            Self::And | Self::Or | Self::Xor | Self::Nand | Self::Nor => 2,
        }
    }

    /// The Verilog primitive name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
            Self::Not => "not",
            Self::Xor => "xor",
            Self::Nand => "nand",
            Self::Nor => "nor",
        }
    }

    /// Evaluates the gate's truth table.
    ///
    /// # Panics
    ///
    /// If `inputs.len()` differs from [`GateKind::arity`].
    #[must_use]
    pub fn evaluate(self, inputs: &[bool]) -> bool {
        assert_eq!(inputs.len(), self.arity(), "{self} takes {} input(s)", self.arity());
        match self {
            Self::Not => !inputs[0],
            Self::And => inputs[0] && inputs[1],
            Self::Or => inputs[0] || inputs[1],
            Self::Xor => inputs[0] ^ inputs[1],
            Self::Nand => !(inputs[0] && inputs[1]),
            Self::Nor => !(inputs[0] || inputs[1]),
        }
    }
}

impl Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GateKind {
    type Err = BmcError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "and" => Ok(Self::And),
            "or" => Ok(Self::Or),
            "not" => Ok(Self::Not),
            "xor" => Ok(Self::Xor),
            "nand" => Ok(Self::Nand),
            "nor" => Ok(Self::Nor),
            _ => Err(BmcError::UnsupportedGate(s.to_string())),
        }
    }
}

/// A gate instance as written in the source: signal references by name.
/// The output comes first, matching Verilog primitive port order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateInstance {
    /// Gate type.
    pub kind: GateKind,
    /// Optional instance label (`and g1 (...)`).
    pub label: Option<String>,
    /// Name of the driven signal.
    pub output: String,
    /// Operand names in port order.
    pub inputs: Vec<String>,
}

impl GateInstance {
    /// An unlabelled gate driving `output` from `inputs`.
    #[must_use]
    pub fn new(kind: GateKind, output: impl Into<String>, inputs: &[&str]) -> Self {
        Self {
            kind,
            label: None,
            output: output.into(),
            inputs: inputs.iter().map(ToString::to_string).collect(),
        }
    }
}

/// A clocked update `state <= next`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterBinding {
    /// The state register being updated.
    pub state: String,
    /// The signal it takes on the next clock edge.
    pub next: String,
}

impl RegisterBinding {
    /// The update `state <= next`.
    #[must_use]
    pub fn new(state: impl Into<String>, next: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            next: next.into(),
        }
    }
}

/// One parsed construct of a netlist description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    /// A declaration.
    Signal(Signal),
    /// A gate primitive.
    Gate(GateInstance),
    /// A register update from an `always` block.
    Binding(RegisterBinding),
}

/// Index of a declared signal, stable for the lifetime of its [`Netlist`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SignalId(u32);

impl SignalId {
    #[allow(clippy::cast_possible_truncation)]
    const fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    /// Position in [`Netlist::signals`].
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A validated gate with resolved signal references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gate {
    /// Gate type.
    pub kind: GateKind,
    /// Instance label from the source, if any.
    pub label: Option<String>,
    /// The driven signal.
    pub output: SignalId,
    /// Operands, exactly [`GateKind::arity`] of them.
    pub inputs: SmallVec<[SignalId; 2]>,
}

/// A validated register binding with resolved signal references.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Register {
    /// The state register.
    pub state: SignalId,
    /// Its next-state signal.
    pub next: SignalId,
}

/// A validated, immutable netlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Netlist {
    name: String,
    signals: Vec<Signal>,
    by_name: FxHashMap<String, SignalId>,
    gates: Vec<Gate>,
    registers: Vec<Register>,
}

fn gate_context(index: usize, gate: &GateInstance) -> String {
    format!("gate #{index} ({} -> {})", gate.kind, gate.output)
}

impl Netlist {
    /// Builds and validates a netlist from parsed items. Item order matters
    /// only within a category: signals keep declaration order, gates and
    /// bindings keep source order.
    ///
    /// # Errors
    ///
    /// Any of the structural errors described in the module documentation.
    pub fn from_items(
        name: impl Into<String>,
        items: impl IntoIterator<Item = Item>,
    ) -> Result<Self> {
        let mut signals = Vec::new();
        let mut gates = Vec::new();
        let mut bindings = Vec::new();
        for item in items {
            match item {
                Item::Signal(signal) => signals.push(signal),
                Item::Gate(gate) => gates.push(gate),
                Item::Binding(binding) => bindings.push(binding),
            }
        }
        Self::new(name, signals, &gates, &bindings)
    }

    /// Builds and validates a netlist from its three parts.
    ///
    /// # Errors
    ///
    /// See [`Netlist::from_items`].
    pub fn new(
        name: impl Into<String>,
        signals: Vec<Signal>,
        gates: &[GateInstance],
        bindings: &[RegisterBinding],
    ) -> Result<Self> {
        let mut by_name = FxHashMap::default();
        for (i, signal) in signals.iter().enumerate() {
            if by_name.insert(signal.name.clone(), SignalId::from_index(i)).is_some() {
                return Err(BmcError::DuplicateSignal(signal.name.clone()));
            }
        }

        let lookup = |name: &str, context: &dyn Fn() -> String| {
            by_name
                .get(name)
                .copied()
                .ok_or_else(|| BmcError::UnknownSignal {
                    signal: name.to_string(),
                    context: context(),
                })
        };

        let mut resolved_gates = Vec::with_capacity(gates.len());
        for (index, gate) in gates.iter().enumerate() {
            let context = || gate_context(index, gate);
            let output = lookup(gate.output.as_str(), &context)?;
            let inputs = gate
                .inputs
                .iter()
                .map(|input| lookup(input.as_str(), &context))
                .collect::<Result<SmallVec<[SignalId; 2]>>>()?;
            if inputs.len() != gate.kind.arity() {
                return Err(BmcError::ArityMismatch {
                    index,
                    gate: gate.kind.to_string(),
                    output: gate.output.clone(),
                    expected: gate.kind.arity(),
                    actual: inputs.len(),
                });
            }
            resolved_gates.push(Gate {
                kind: gate.kind,
                label: gate.label.clone(),
                output,
                inputs,
            });
        }

        let mut registers = Vec::with_capacity(bindings.len());
        for binding in bindings {
            let context = || format!("binding `{} <= {}`", binding.state, binding.next);
            registers.push(Register {
                state: lookup(binding.state.as_str(), &context)?,
                next: lookup(binding.next.as_str(), &context)?,
            });
        }

        let netlist = Self {
            name: name.into(),
            signals,
            by_name,
            gates: resolved_gates,
            registers,
        };
        netlist.check_drivers()?;
        netlist.check_acyclic()?;

        debug!(
            module = %netlist.name,
            signals = netlist.signals.len(),
            gates = netlist.gates.len(),
            registers = netlist.registers.len(),
            "netlist validated"
        );
        Ok(netlist)
    }

    /// Every signal has at most one driver, drivers match signal kinds, and
    /// every register is bound.
    fn check_drivers(&self) -> Result<()> {
        let mut driven = vec![false; self.signals.len()];

        for (index, gate) in self.gates.iter().enumerate() {
            let signal = &self.signals[gate.output.index()];
            if matches!(signal.kind, SignalKind::Input | SignalKind::StateRegister) {
                return Err(BmcError::IllegalDriver {
                    driver: format!("gate #{index} ({})", gate.kind),
                    signal: signal.name.clone(),
                    kind: signal.kind,
                });
            }
            if std::mem::replace(&mut driven[gate.output.index()], true) {
                return Err(BmcError::MultipleDrivers(signal.name.clone()));
            }
        }

        for register in &self.registers {
            let signal = &self.signals[register.state.index()];
            if signal.kind != SignalKind::StateRegister {
                return Err(BmcError::IllegalDriver {
                    driver: format!(
                        "binding `{} <= {}`",
                        signal.name,
                        self.name_of(register.next)
                    ),
                    signal: signal.name.clone(),
                    kind: signal.kind,
                });
            }
            if std::mem::replace(&mut driven[register.state.index()], true) {
                return Err(BmcError::MultipleDrivers(signal.name.clone()));
            }
        }

        self.signals
            .iter()
            .zip(&driven)
            .find(|(signal, bound)| signal.kind == SignalKind::StateRegister && !**bound)
            .map_or(Ok(()), |(signal, _)| {
                Err(BmcError::UnboundRegister(signal.name.clone()))
            })
    }

    /// Register bindings cross frames and are not edges here; only gate
    /// fan-in can close a loop within one frame.
    fn check_acyclic(&self) -> Result<()> {
        let mut graph: DiGraph<SignalId, ()> = DiGraph::with_capacity(self.signals.len(), 0);
        let nodes: Vec<NodeIndex> = (0..self.signals.len())
            .map(|i| graph.add_node(SignalId::from_index(i)))
            .collect();
        for gate in &self.gates {
            for input in &gate.inputs {
                graph.add_edge(nodes[input.index()], nodes[gate.output.index()], ());
            }
        }
        toposort(&graph, None).map(|_| ()).map_err(|cycle| {
            BmcError::CombinationalCycle(self.name_of(graph[cycle.node_id()]).to_string())
        })
    }

    /// The module name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All signals in declaration order.
    #[must_use]
    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }

    /// All gates in source order.
    #[must_use]
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// All register bindings in source order.
    #[must_use]
    pub fn registers(&self) -> &[Register] {
        &self.registers
    }

    /// Resolves a signal name.
    #[must_use]
    pub fn signal_id(&self, name: &str) -> Option<SignalId> {
        self.by_name.get(name).copied()
    }

    /// The declared kind of a named signal.
    #[must_use]
    pub fn kind_of(&self, name: &str) -> Option<SignalKind> {
        self.signal_id(name).map(|id| self.signals[id.index()].kind)
    }

    /// The name of a signal id issued by this netlist.
    #[must_use]
    pub fn name_of(&self, id: SignalId) -> &str {
        &self.signals[id.index()].name
    }

    /// Ids of all signals of one kind, in declaration order.
    pub fn signals_of_kind(&self, kind: SignalKind) -> impl Iterator<Item = SignalId> + '_ {
        self.signals
            .iter()
            .enumerate()
            .filter(move |(_, signal)| signal.kind == kind)
            .map(|(i, _)| SignalId::from_index(i))
    }

    /// State registers in declaration order. Positional target vectors are
    /// matched against this order.
    pub fn state_registers(&self) -> impl Iterator<Item = SignalId> + '_ {
        self.signals_of_kind(SignalKind::StateRegister)
    }

    /// Primary inputs in declaration order.
    pub fn inputs(&self) -> impl Iterator<Item = SignalId> + '_ {
        self.signals_of_kind(SignalKind::Input)
    }

    /// Primary outputs in declaration order.
    pub fn outputs(&self) -> impl Iterator<Item = SignalId> + '_ {
        self.signals_of_kind(SignalKind::Output)
    }

    /// Number of state registers.
    #[must_use]
    pub fn register_count(&self) -> usize {
        self.state_registers().count()
    }
}

/// Incremental construction of a [`Netlist`], mostly for tests and
/// programmatic use.
#[derive(Debug, Clone, Default)]
pub struct NetlistBuilder {
    name: String,
    items: Vec<Item>,
}

impl NetlistBuilder {
    /// An empty module called `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: Vec::new(),
        }
    }

    fn declare(mut self, name: &str, kind: SignalKind) -> Self {
        self.items.push(Item::Signal(Signal::new(name, kind)));
        self
    }

    /// Declares a primary input.
    #[must_use]
    pub fn input(self, name: &str) -> Self {
        self.declare(name, SignalKind::Input)
    }

    /// Declares an output.
    #[must_use]
    pub fn output(self, name: &str) -> Self {
        self.declare(name, SignalKind::Output)
    }

    /// Declares an internal wire.
    #[must_use]
    pub fn wire(self, name: &str) -> Self {
        self.declare(name, SignalKind::Wire)
    }

    /// Declares a state register.
    #[must_use]
    pub fn register(self, name: &str) -> Self {
        self.declare(name, SignalKind::StateRegister)
    }

    /// Adds a gate; `output` first, as in Verilog primitives.
    #[must_use]
    pub fn gate(mut self, kind: GateKind, output: &str, inputs: &[&str]) -> Self {
        self.items
            .push(Item::Gate(GateInstance::new(kind, output, inputs)));
        self
    }

    /// Adds `state <= next`.
    #[must_use]
    pub fn bind(mut self, state: &str, next: &str) -> Self {
        self.items
            .push(Item::Binding(RegisterBinding::new(state, next)));
        self
    }

    /// Validates and freezes the netlist.
    ///
    /// # Errors
    ///
    /// See [`Netlist::from_items`].
    pub fn build(self) -> Result<Netlist> {
        Netlist::from_items(self.name, self.items)
    }
}
