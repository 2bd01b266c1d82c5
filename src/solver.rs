#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Handing an encoding to an external SAT solver and reading its verdict.
//!
//! The solver is any program that takes a DIMACS file path as its last
//! argument and reports on stdout in SAT-competition style (`s SATISFIABLE`,
//! `v 1 -2 ... 0`) or minisat style (`SAT`/`UNSAT` and a literal line).

use crate::bmc::{Encoding, Trace};
use crate::cnf::{Assignment, Literal, Variable, dimacs};
use crate::error::{BmcError, Result};
use crate::netlist::Netlist;
use std::fmt::{self, Display};
use std::path::Path;
use std::process::Command;
use tracing::{debug, info, warn};

/// What a solver concluded about a formula.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverVerdict {
    /// Satisfiable, with the model the solver printed (possibly empty).
    Sat(Assignment),
    /// Unsatisfiable.
    Unsat,
    /// The solver gave up.
    Unknown,
}

/// Something that decides a DIMACS file.
pub trait Solver {
    /// Solves the formula stored at `cnf_path`, which uses variables
    /// `1..=num_vars`.
    ///
    /// # Errors
    ///
    /// [`BmcError::Solver`] if the solver cannot be run or its answer read.
    fn solve(&mut self, cnf_path: &Path, num_vars: Variable) -> Result<SolverVerdict>;
}

/// An external solver executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverCommand {
    /// Executable name or path.
    pub program: String,
    /// Arguments placed before the DIMACS path.
    pub args: Vec<String>,
}

impl SolverCommand {
    /// A solver run as `program <cnf>`.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Appends arguments passed ahead of the DIMACS path.
    #[must_use]
    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl Solver for SolverCommand {
    fn solve(&mut self, cnf_path: &Path, num_vars: Variable) -> Result<SolverVerdict> {
        info!(program = %self.program, path = %cnf_path.display(), "running solver");
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(cnf_path)
            .output()
            .map_err(|e| BmcError::Solver(format!("cannot run `{}`: {e}", self.program)))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        debug!(status = ?output.status, bytes = stdout.len(), "solver finished");

        // 10 and 20 are the conventional SAT/UNSAT exit codes
        parse_solver_output(&stdout, num_vars).or_else(|err| match output.status.code() {
            Some(10) => Ok(SolverVerdict::Sat(Assignment::default())),
            Some(20) => Ok(SolverVerdict::Unsat),
            _ if !output.status.success() => Err(BmcError::Solver(format!(
                "`{}` exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ))),
            _ => Err(err),
        })
    }
}

/// Reads a solver's stdout for a formula over variables `1..=num_vars`.
///
/// # Errors
///
/// [`BmcError::Solver`] if no verdict line is present, or a model line holds
/// something other than integers or a variable above `num_vars`.
pub fn parse_solver_output(output: &str, num_vars: Variable) -> Result<SolverVerdict> {
    let mut verdict = None;
    let mut model = Assignment::default();

    for line in output.lines().map(str::trim) {
        let (tag, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        match tag {
            "" | "c" => {}
            "s" => verdict = Some(parse_status(rest.trim())?),
            "v" => parse_model_line(rest, num_vars, &mut model)?,
            "SAT" | "SATISFIABLE" | "UNSAT" | "UNSATISFIABLE" | "INDET" | "UNKNOWN" => {
                verdict = Some(parse_status(line)?);
            }
            _ if verdict.is_some() && starts_numeric(line) => {
                parse_model_line(line, num_vars, &mut model)?;
            }
            // free-form solver chatter
            _ => {}
        }
    }

    match verdict {
        Some(Status::Sat) => Ok(SolverVerdict::Sat(model)),
        Some(Status::Unsat) => Ok(SolverVerdict::Unsat),
        Some(Status::Unknown) => Ok(SolverVerdict::Unknown),
        None => Err(BmcError::Solver("no verdict in solver output".to_string())),
    }
}

#[derive(Clone, Copy)]
enum Status {
    Sat,
    Unsat,
    Unknown,
}

fn parse_status(status: &str) -> Result<Status> {
    match status {
        "SAT" | "SATISFIABLE" => Ok(Status::Sat),
        "UNSAT" | "UNSATISFIABLE" => Ok(Status::Unsat),
        "INDET" | "UNKNOWN" => Ok(Status::Unknown),
        other => Err(BmcError::Solver(format!("unrecognized status `{other}`"))),
    }
}

fn starts_numeric(line: &str) -> bool {
    line.starts_with(|c: char| c == '-' || c.is_ascii_digit())
}

fn parse_model_line(line: &str, num_vars: Variable, model: &mut Assignment) -> Result<()> {
    for token in line.split_whitespace() {
        let value: i32 = token
            .parse()
            .map_err(|e| BmcError::Solver(format!("bad model literal `{token}`: {e}")))?;
        let Some(literal) = Literal::from_i32(value) else {
            continue;
        };
        if literal.variable() > num_vars {
            return Err(out_of_range(literal.variable(), num_vars));
        }
        model.assign(literal);
    }
    Ok(())
}

fn out_of_range(var: Variable, num_vars: Variable) -> BmcError {
    BmcError::Solver(format!(
        "model assigns variable {var}, but the formula has only {num_vars}"
    ))
}

/// The answer to a bounded reachability query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// A trace of `bound` frames reaches the target.
    Reachable {
        /// Number of frames in the query.
        bound: usize,
        /// The decoded model, or `None` when the solver printed no model.
        witness: Option<Trace>,
    },
    /// No trace of this length reaches the target.
    Unreachable {
        /// Number of frames in the query.
        bound: usize,
    },
    /// The solver gave up.
    Unknown,
}

impl Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reachable { bound, witness } => {
                let last = bound.saturating_sub(1);
                write!(
                    f,
                    "REACHABLE: target state reached at frame {last} \
                     ({last} transition(s) from reset)"
                )?;
                if witness.is_none() {
                    f.write_str("; the solver supplied no model")?;
                }
                Ok(())
            }
            Self::Unreachable { bound } => write!(
                f,
                "UNREACHABLE within {} transition(s); no claim for larger bounds",
                bound.saturating_sub(1)
            ),
            Self::Unknown => f.write_str("UNKNOWN: the solver gave up"),
        }
    }
}

/// Writes `encoding` to `cnf_path`, asks `solver` about it and decodes a
/// witness when there is one.
///
/// A satisfiable verdict without any model literal is still reported as
/// reachable, with no witness. A model is only decoded once it satisfies
/// every clause of the encoding.
///
/// # Errors
///
/// [`BmcError::Io`] when writing the file, solver errors, and
/// [`BmcError::Solver`] when the model names a variable the encoding does not
/// have or falsifies a clause.
pub fn check(
    netlist: &Netlist,
    encoding: &Encoding,
    cnf_path: &Path,
    solver: &mut impl Solver,
) -> Result<CheckOutcome> {
    let cnf = encoding.cnf();
    dimacs::write_file(cnf, cnf_path)?;

    Ok(match solver.solve(cnf_path, cnf.num_vars())? {
        SolverVerdict::Sat(model) => {
            if let Some(var) = model.highest_assigned().filter(|&var| var > cnf.num_vars()) {
                return Err(out_of_range(var, cnf.num_vars()));
            }
            let witness = if model.assigned() == 0 && !cnf.is_empty() {
                warn!("solver reported SAT without a model");
                None
            } else if cnf.verify(&model) {
                Some(encoding.decode(netlist, &model))
            } else {
                return Err(BmcError::Solver(
                    "the solver's model falsifies the encoding".to_string(),
                ));
            };
            CheckOutcome::Reachable {
                bound: encoding.bound(),
                witness,
            }
        }
        SolverVerdict::Unsat => CheckOutcome::Unreachable {
            bound: encoding.bound(),
        },
        SolverVerdict::Unknown => CheckOutcome::Unknown,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bmc::{Target, encode};
    use crate::netlist::{GateKind, NetlistBuilder};

    #[test]
    fn test_competition_output() {
        let out = "c comment\ns SATISFIABLE\nv 1 -2 3\nv -4 0\n";
        let SolverVerdict::Sat(model) = parse_solver_output(out, 4).unwrap() else {
            panic!("expected SAT");
        };
        assert_eq!(model.to_dimacs(), vec![1, -2, 3, -4]);

        assert_eq!(
            parse_solver_output("s UNSATISFIABLE\n", 4).unwrap(),
            SolverVerdict::Unsat
        );
        assert_eq!(
            parse_solver_output("s UNKNOWN\n", 4).unwrap(),
            SolverVerdict::Unknown
        );
    }

    #[test]
    fn test_minisat_result_file() {
        let SolverVerdict::Sat(model) = parse_solver_output("SAT\n-1 2 0\n", 2).unwrap() else {
            panic!("expected SAT");
        };
        assert_eq!(model.to_dimacs(), vec![-1, 2]);
        assert_eq!(parse_solver_output("UNSAT\n", 2).unwrap(), SolverVerdict::Unsat);
    }

    #[test]
    fn test_chatter_is_ignored() {
        let out = "Number of variables: 3\n| restarts 2 |\nSATISFIABLE\n";
        assert_eq!(
            parse_solver_output(out, 3).unwrap(),
            SolverVerdict::Sat(Assignment::default())
        );
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            parse_solver_output("c nothing here\n", 1),
            Err(BmcError::Solver(_))
        ));
        assert!(matches!(
            parse_solver_output("s MAYBE\n", 1),
            Err(BmcError::Solver(_))
        ));
        assert!(matches!(
            parse_solver_output("s SATISFIABLE\nv 1 x 0\n", 1),
            Err(BmcError::Solver(_))
        ));
    }

    #[test]
    fn test_model_variables_are_bounded() {
        let err = parse_solver_output("s SATISFIABLE\nv 50000000 0\n", 8).unwrap_err();
        assert!(matches!(err, BmcError::Solver(msg) if msg.contains("50000000")));
        assert!(parse_solver_output("SAT\n1 -2147483647 0\n", 8).is_err());

        let SolverVerdict::Sat(model) = parse_solver_output("s SATISFIABLE\nv -8 0\n", 8).unwrap()
        else {
            panic!("expected SAT");
        };
        assert_eq!(model.to_dimacs(), vec![-8]);
    }

    #[test]
    fn test_missing_program() {
        let mut solver = SolverCommand::new("definitely-not-a-sat-solver-binary");
        let err = solver.solve(Path::new("nowhere.cnf"), 0).unwrap_err();
        assert!(matches!(err, BmcError::Solver(msg) if msg.contains("cannot run")));
    }

    /// Answers from a fixed verdict and remembers the file it was given.
    struct Canned {
        verdict: SolverVerdict,
        seen: Option<String>,
    }

    impl Solver for Canned {
        fn solve(&mut self, cnf_path: &Path, _num_vars: Variable) -> Result<SolverVerdict> {
            let text = std::fs::read_to_string(cnf_path).map_err(|e| BmcError::io(cnf_path, e))?;
            self.seen = Some(text);
            Ok(self.verdict.clone())
        }
    }

    #[test]
    fn test_check_round_trip() {
        let netlist = NetlistBuilder::new("m")
            .input("a")
            .register("s")
            .wire("n")
            .gate(GateKind::Not, "n", &["a"])
            .bind("s", "n")
            .build()
            .unwrap();
        let path =
            std::env::temp_dir().join(format!("netlist-bmc-check-{}.cnf", std::process::id()));

        let mut solver = Canned {
            verdict: SolverVerdict::Unsat,
            seen: None,
        };
        let encoding = encode(&netlist, 2, &Target::Bits(vec![true])).unwrap();
        let outcome = check(&netlist, &encoding, &path, &mut solver).unwrap();
        assert_eq!(outcome, CheckOutcome::Unreachable { bound: 2 });
        assert!(outcome.to_string().contains("no claim for larger bounds"));
        let written = solver.seen.take().unwrap();
        assert!(written.starts_with("p cnf "));

        // reset s@0 = 1, n@0 = 2, a@0 = 3, n@1 = 4, a@1 = 5, s@1 = 6
        solver.verdict = SolverVerdict::Sat(Assignment::from_dimacs(&[-1, 2, -3, -4, 5, 6]));
        let outcome = check(&netlist, &encoding, &path, &mut solver).unwrap();
        let CheckOutcome::Reachable {
            bound: 2,
            witness: Some(trace),
        } = outcome
        else {
            panic!("expected a witness, got {outcome:?}");
        };
        assert_eq!(trace.value("a", 0), Some(false));
        assert_eq!(trace.value("s", 1), Some(true));
        assert!(trace.is_consistent_with(&netlist));

        let _ = std::fs::remove_file(&path);
    }

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

    #[test]
    fn test_sat_without_model_has_no_witness() {
        let netlist = and_register();
        let encoding = encode(&netlist, 2, &Target::Bits(vec![true])).unwrap();
        let path = std::env::temp_dir().join(format!(
            "netlist-bmc-no-model-{}.cnf",
            std::process::id()
        ));
        let mut solver = Canned {
            verdict: parse_solver_output("SATISFIABLE\n", 8).unwrap(),
            seen: None,
        };

        let outcome = check(&netlist, &encoding, &path, &mut solver).unwrap();
        assert_eq!(
            outcome,
            CheckOutcome::Reachable {
                bound: 2,
                witness: None
            }
        );
        let message = outcome.to_string();
        assert!(message.starts_with("REACHABLE"), "{message}");
        assert!(message.contains("no model"), "{message}");

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_bad_models_are_rejected() {
        let netlist = and_register();
        let encoding = encode(&netlist, 2, &Target::Bits(vec![true])).unwrap();
        let path = std::env::temp_dir().join(format!(
            "netlist-bmc-bad-model-{}.cnf",
            std::process::id()
        ));

        // s0@1 = 8 is forced true by the target
        let mut solver = Canned {
            verdict: SolverVerdict::Sat(Assignment::from_dimacs(&[-1, -2, -3, -4, -5, -6, -7, -8])),
            seen: None,
        };
        let err = check(&netlist, &encoding, &path, &mut solver).unwrap_err();
        assert!(matches!(err, BmcError::Solver(msg) if msg.contains("falsifies")));

        solver.verdict = SolverVerdict::Sat(Assignment::from_dimacs(&[9]));
        let err = check(&netlist, &encoding, &path, &mut solver).unwrap_err();
        assert!(matches!(err, BmcError::Solver(msg) if msg.contains("variable 9")));

        solver.verdict =
            SolverVerdict::Sat(Assignment::from_dimacs(&[-1, 2, 3, 4, -5, -6, -7, 8]));
        let outcome = check(&netlist, &encoding, &path, &mut solver).unwrap();
        let CheckOutcome::Reachable {
            witness: Some(trace),
            ..
        } = outcome
        else {
            panic!("expected a witness, got {outcome:?}");
        };
        assert_eq!(trace.value("s0", 1), Some(true));
        assert_eq!(trace.value("a", 1), Some(false));

        let _ = std::fs::remove_file(&path);
    }
}
