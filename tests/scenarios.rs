use netlist_bmc::BmcError;
use netlist_bmc::bmc::{Encoding, Target, encode};
use netlist_bmc::cnf::{Assignment, Cnf};
use netlist_bmc::netlist::{
    GateInstance, GateKind, Netlist, NetlistBuilder, RegisterBinding, Signal, SignalKind,
    parse_netlist,
};

fn and_register() -> Netlist {
    NetlistBuilder::new("and_register")
        .input("a")
        .input("b")
        .register("s0")
        .wire("n0")
        .gate(GateKind::And, "n0", &["a", "b"])
        .bind("s0", "n0")
        .build()
        .unwrap()
}

const COUNTER: &str = "
    // two-bit counter, counts while en is high
    module counter(clk, en);
      input clk, en;
      reg q1, q0;
      wire d0, d1, c1;
      xor x0(d0, q0, en);
      and a0(c1, q0, en);
      xor x1(d1, q1, c1);
      always @(posedge clk) begin
        q0 <= d0;
        q1 <= d1;
      end
    endmodule
";

/// Every total assignment over the formula's variables that satisfies it.
fn models(cnf: &Cnf) -> Vec<Assignment> {
    let n = cnf.num_vars();
    assert!(n <= 16, "too many variables to enumerate");
    (0..1u32 << n)
        .map(|bits| {
            let mut model = Assignment::new(n as usize);
            for var in 1..=n {
                model.set(var, (bits >> (var - 1)) & 1 == 1);
            }
            model
        })
        .filter(|model| cnf.verify(model))
        .collect()
}

/// Simulates the netlist from reset under `inputs` (one row per frame) and
/// returns the values of every encoded variable.
fn simulate(netlist: &Netlist, encoding: &Encoding, inputs: &[&[(&str, bool)]]) -> Assignment {
    let mut rows: Vec<Vec<bool>> = Vec::new();
    for (frame, frame_inputs) in inputs.iter().enumerate() {
        let mut row = vec![false; netlist.signals().len()];
        if let Some(prev) = rows.last() {
            for register in netlist.registers() {
                row[register.state.index()] = prev[register.next.index()];
            }
        }
        for &(name, value) in *frame_inputs {
            row[netlist.signal_id(name).unwrap().index()] = value;
        }
        for gate in netlist.gates() {
            let operands: Vec<bool> = gate.inputs.iter().map(|id| row[id.index()]).collect();
            row[gate.output.index()] = gate.kind.evaluate(&operands);
        }
        assert_eq!(frame, rows.len());
        rows.push(row);
    }

    let mut model = Assignment::new(encoding.allocator().len() as usize);
    for (var, key) in encoding.allocator().iter() {
        model.set(var, rows[key.frame][key.signal.index()]);
    }
    model
}

#[test]
fn inverter_without_registers() {
    let netlist = NetlistBuilder::new("inv")
        .input("a")
        .output("b")
        .gate(GateKind::Not, "b", &["a"])
        .build()
        .unwrap();
    let encoding = encode(&netlist, 1, &Target::Bits(Vec::new())).unwrap();

    let counts = encoding.counts();
    assert_eq!((counts.reset, counts.sync, counts.target), (0, 0, 0));
    assert_eq!(encoding.to_dimacs(), "p cnf 2 2\n-2 -1 0\n2 1 0\n");
    assert_eq!(models(encoding.cnf()).len(), 2);
}

#[test]
fn and_register_reaches_one_in_two_frames() {
    let netlist = and_register();
    let encoding = encode(&netlist, 2, &"1".parse().unwrap()).unwrap();
    assert_eq!(
        encoding.to_dimacs(),
        "p cnf 8 10\n\
         -1 0\n\
         -3 -4 2 0\n3 -2 0\n4 -2 0\n\
         -6 -7 5 0\n6 -5 0\n7 -5 0\n\
         -2 8 0\n2 -8 0\n\
         8 0\n"
    );

    let solutions = models(encoding.cnf());
    // frame 1 inputs are free; frame 0 inputs are forced high
    assert_eq!(solutions.len(), 4);
    for model in &solutions {
        let trace = encoding.decode(&netlist, model);
        assert_eq!(trace.inputs_at(0), vec![("a", true), ("b", true)]);
        assert_eq!(trace.value("s0", 0), Some(false));
        assert_eq!(trace.value("s0", 1), Some(true));
        assert!(trace.is_consistent_with(&netlist));
    }
}

#[test]
fn single_frame_cannot_leave_reset() {
    let netlist = and_register();
    let encoding = encode(&netlist, 1, &Target::from_bits("1").unwrap()).unwrap();
    assert_eq!(encoding.counts().sync, 0);
    assert!(models(encoding.cnf()).is_empty());

    let encoding = encode(&netlist, 1, &Target::from_bits("0").unwrap()).unwrap();
    assert_eq!(models(encoding.cnf()).len(), 4);
}

#[test]
fn encoding_is_deterministic() {
    let first = encode(&and_register(), 5, &Target::from_bits("1").unwrap()).unwrap();
    let second = encode(&and_register(), 5, &Target::from_bits("1").unwrap()).unwrap();
    assert_eq!(first.to_dimacs(), second.to_dimacs());

    let parsed_once = parse_netlist(COUNTER).unwrap();
    let parsed_twice = parse_netlist(COUNTER).unwrap();
    let target = Target::from_bits("11").unwrap();
    assert_eq!(
        encode(&parsed_once, 4, &target).unwrap().to_dimacs(),
        encode(&parsed_twice, 4, &target).unwrap().to_dimacs()
    );
}

#[test]
fn parsed_counter_witness() {
    let netlist = parse_netlist(COUNTER).unwrap();
    let encoding = encode(&netlist, 4, &Target::from_bits("11").unwrap()).unwrap();
    assert_eq!(encoding.counts().reset, 2);
    assert_eq!(encoding.counts().sync, 2 * 2 * 3);
    assert_eq!(encoding.counts().target, 2);

    let high: &[(&str, bool)] = &[("en", true)];
    let low: &[(&str, bool)] = &[("en", false)];

    // three increments reach 0b11 at frame 3
    let witness = simulate(&netlist, &encoding, &[high, high, high, low]);
    assert!(encoding.cnf().verify(&witness));
    let trace = encoding.decode(&netlist, &witness);
    assert_eq!(trace.state_at(3), vec![("q1", true), ("q0", true)]);
    assert!(trace.is_consistent_with(&netlist));

    // one pause leaves the counter at 0b10
    let short = simulate(&netlist, &encoding, &[high, low, high, high]);
    assert!(!encoding.cnf().verify(&short));
}

#[test]
fn named_and_positional_targets_agree() {
    let netlist = parse_netlist(COUNTER).unwrap();
    let positional = encode(&netlist, 3, &Target::from_bits("10").unwrap()).unwrap();
    let named = encode(&netlist, 3, &"q0=0,q1=1".parse().unwrap()).unwrap();
    assert_eq!(positional.to_dimacs(), named.to_dimacs());
}

#[test]
fn malformed_inputs_are_rejected() {
    let err = Netlist::new(
        "m",
        vec![
            Signal::new("a", SignalKind::Input),
            Signal::new("o", SignalKind::Wire),
        ],
        &[GateInstance::new(GateKind::And, "o", &["a"])],
        &[],
    )
    .unwrap_err();
    assert!(matches!(
        err,
        BmcError::ArityMismatch {
            expected: 2,
            actual: 1,
            ..
        }
    ));

    let err = Netlist::new(
        "m",
        vec![Signal::new("s", SignalKind::StateRegister)],
        &[],
        &[RegisterBinding::new("s", "ghost")],
    )
    .unwrap_err();
    assert!(matches!(err, BmcError::UnknownSignal { signal, .. } if signal == "ghost"));

    let netlist = and_register();
    assert!(matches!(
        encode(&netlist, 0, &Target::from_bits("1").unwrap()),
        Err(BmcError::InvalidBound(0))
    ));
    assert!(matches!(
        encode(&netlist, 3, &Target::from_bits("").unwrap()),
        Err(BmcError::TargetArityMismatch {
            expected: 1,
            actual: 0
        })
    ));
}

#[test]
fn variable_map_lists_every_variable() {
    let netlist = and_register();
    let encoding = encode(&netlist, 2, &Target::from_bits("1").unwrap()).unwrap();
    let map = encoding.variable_map(&netlist);
    let lines: Vec<&str> = map.lines().collect();
    assert_eq!(lines.len(), 8);
    assert_eq!(lines[0], "1 s0 0");
    assert_eq!(lines[7], "8 s0 1");
}
