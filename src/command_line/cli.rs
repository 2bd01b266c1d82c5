#![allow(clippy::cast_precision_loss)]

use clap::{Args, Parser, Subcommand};
use netlist_bmc::bmc::{Encoding, Target, encode};
use netlist_bmc::cnf::dimacs;
use netlist_bmc::netlist::{Netlist, parse_netlist_file};
use netlist_bmc::solver::{CheckOutcome, SolverCommand, check};
use netlist_bmc::{BmcError, Result};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};
use tikv_jemalloc_ctl::{epoch, stats};
use tracing::info;

/// Defines the command-line interface for the bounded model checker.
///
/// Uses `clap` for parsing arguments.
#[derive(Parser, Debug)]
#[command(
    name = "netlist-bmc",
    version,
    about = "Bounded model checking of gate-level netlists via DIMACS CNF"
)]
pub(crate) struct Cli {
    /// Specifies the subcommand to execute (`encode`, `check` or `completions`).
    #[clap(subcommand)]
    pub command: Commands,
}

/// Enumerates the available subcommands.
#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Encode a bounded reachability query as DIMACS CNF.
    Encode {
        /// Path to the structural Verilog netlist.
        netlist: PathBuf,

        #[command(flatten)]
        query: QueryOptions,

        /// Write the DIMACS formula here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write one `<id> <signal> <frame>` line per variable to this file.
        #[arg(long)]
        var_map: Option<PathBuf>,

        #[command(flatten)]
        common: CommonOptions,
    },

    /// Encode the query, run an external SAT solver on it and report the verdict.
    Check {
        /// Path to the structural Verilog netlist.
        netlist: PathBuf,

        #[command(flatten)]
        query: QueryOptions,

        /// Solver executable; it receives the DIMACS path as its last argument.
        #[arg(long)]
        solver: String,

        /// Extra argument passed to the solver before the DIMACS path. Repeatable.
        #[arg(long = "solver-arg", allow_hyphen_values = true)]
        solver_args: Vec<String>,

        /// Where to write the DIMACS handed to the solver (default `<netlist>.bmc.cnf`).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the decoded signal values per frame when the target is reachable.
        #[arg(short, long, default_value_t = false)]
        print_trace: bool,

        #[command(flatten)]
        common: CommonOptions,
    },

    /// Generate shell completion scripts.
    Completions {
        /// The shell to generate completions for.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// The reachability question: how many frames, and which final state.
#[derive(Args, Debug, Clone)]
pub(crate) struct QueryOptions {
    /// Number of time frames to unroll (at least 1).
    #[arg(short, long)]
    pub(crate) bound: usize,

    /// Target state, one bit per register in declaration order (e.g. `0110`).
    #[arg(short, long, required_unless_present = "assign", conflicts_with = "assign")]
    pub(crate) target: Option<String>,

    /// Target state by register name, `name=0|1`. Repeat for every register.
    #[arg(short, long, value_name = "REG=VALUE")]
    pub(crate) assign: Vec<String>,
}

impl QueryOptions {
    pub(crate) fn target(&self) -> Result<Target> {
        match &self.target {
            Some(bits) => bits.parse(),
            None => Target::from_assignments(&self.assign),
        }
    }
}

/// Defines common command-line options shared across subcommands.
#[derive(Args, Debug, Default, Clone)]
pub(crate) struct CommonOptions {
    /// Enable debug logging on stderr (overridden by `RUST_LOG`).
    #[arg(short, long, default_value_t = false)]
    pub(crate) debug: bool,

    /// Print problem statistics on stderr after encoding.
    #[arg(short, long, default_value_t = false)]
    pub(crate) stats: bool,
}

impl Commands {
    pub(crate) const fn common(&self) -> Option<&CommonOptions> {
        match self {
            Self::Encode { common, .. } | Self::Check { common, .. } => Some(common),
            Self::Completions { .. } => None,
        }
    }
}

/// Parses the netlist and encodes the query, timing both steps.
fn load_and_encode(path: &Path, query: &QueryOptions) -> Result<(Netlist, Encoding, Timings)> {
    let target = query.target()?;

    let start = Instant::now();
    let netlist = parse_netlist_file(path)?;
    let parse = start.elapsed();

    let start = Instant::now();
    let encoding = encode(&netlist, query.bound, &target)?;
    let encode_time = start.elapsed();

    Ok((
        netlist,
        encoding,
        Timings {
            parse,
            encode: encode_time,
            solve: None,
        },
    ))
}

/// Runs the `encode` subcommand.
pub(crate) fn run_encode(
    path: &Path,
    query: &QueryOptions,
    output: Option<&Path>,
    var_map: Option<&Path>,
    common: &CommonOptions,
) -> Result<ExitCode> {
    let (netlist, encoding, timings) = load_and_encode(path, query)?;

    match output {
        Some(out) => {
            dimacs::write_file(encoding.cnf(), out)?;
            info!(path = %out.display(), "DIMACS written");
        }
        None => dimacs::write_dimacs(encoding.cnf(), io::stdout().lock())
            .map_err(|e| BmcError::io("<stdout>", e))?,
    }

    if let Some(map_path) = var_map {
        std::fs::write(map_path, encoding.variable_map(&netlist))
            .map_err(|e| BmcError::io(map_path, e))?;
        info!(path = %map_path.display(), "variable map written");
    }

    if common.stats {
        print_stats(&netlist, &encoding, &timings);
    }
    Ok(ExitCode::SUCCESS)
}

/// Runs the `check` subcommand. The exit code follows the SAT solver
/// convention: 10 when the target is reachable, 20 when it is not.
pub(crate) fn run_check(
    path: &Path,
    query: &QueryOptions,
    mut solver: SolverCommand,
    output: Option<&Path>,
    print_trace: bool,
    common: &CommonOptions,
) -> Result<ExitCode> {
    let cnf_path = output.map_or_else(|| default_cnf_path(path), Path::to_path_buf);
    let (netlist, encoding, mut timings) = load_and_encode(path, query)?;

    let start = Instant::now();
    let outcome = check(&netlist, &encoding, &cnf_path, &mut solver)?;
    timings.solve = Some(start.elapsed());

    println!("{outcome}");
    let code = match &outcome {
        CheckOutcome::Reachable { witness, .. } => {
            if print_trace {
                match witness {
                    Some(trace) => println!("\n{trace}"),
                    None => eprintln!("no trace to print: the solver output held no model"),
                }
            }
            ExitCode::from(10)
        }
        CheckOutcome::Unreachable { .. } => ExitCode::from(20),
        CheckOutcome::Unknown => ExitCode::SUCCESS,
    };

    if common.stats {
        print_stats(&netlist, &encoding, &timings);
    }
    Ok(code)
}

fn default_cnf_path(netlist: &Path) -> PathBuf {
    let mut name = netlist.as_os_str().to_owned();
    name.push(".bmc.cnf");
    PathBuf::from(name)
}

struct Timings {
    parse: Duration,
    encode: Duration,
    solve: Option<Duration>,
}

/// Allocated and resident memory in MiB, if jemalloc reports them.
fn memory_mib() -> Option<(f64, f64)> {
    const MIB: f64 = 1024.0 * 1024.0;
    epoch::advance().ok()?;
    let allocated = stats::allocated::mib().ok()?.read().ok()?;
    let resident = stats::resident::mib().ok()?.read().ok()?;
    Some((allocated as f64 / MIB, resident as f64 / MIB))
}

/// Helper function to print a single statistic line in a formatted table row.
pub(crate) fn stat_line(label: &str, value: impl std::fmt::Display) {
    eprintln!("|  {label:<28} {value:>18}  |");
}

/// Prints a summary of the netlist and the encoding on stderr, so a DIMACS
/// stream on stdout stays intact.
fn print_stats(netlist: &Netlist, encoding: &Encoding, timings: &Timings) {
    let counts = encoding.counts();
    let cnf = encoding.cnf();

    eprintln!("\n=======================[ Problem Statistics ]=========================");
    stat_line("Module", netlist.name());
    stat_line("Signals", netlist.signals().len());
    stat_line("Primary inputs", netlist.inputs().count());
    stat_line("State registers", netlist.register_count());
    stat_line("Gates", netlist.gates().len());
    stat_line("Parse time (s)", format!("{:.3}", timings.parse.as_secs_f64()));

    eprintln!("========================[ Encoding Statistics ]======================");
    stat_line("Bound (frames)", encoding.bound());
    stat_line("Variables", cnf.num_vars());
    stat_line("Clauses", cnf.len());
    stat_line("  reset", counts.reset);
    stat_line("  gates", counts.gates);
    stat_line("  register sync", counts.sync);
    stat_line("  target", counts.target);
    stat_line("Literals", cnf.literal_count());
    stat_line("Encode time (s)", format!("{:.3}", timings.encode.as_secs_f64()));
    if let Some(solve) = timings.solve {
        stat_line("Solve time (s)", format!("{:.3}", solve.as_secs_f64()));
    }
    if let Some((allocated, resident)) = memory_mib() {
        stat_line("Memory usage (MiB)", format!("{allocated:.2}"));
        stat_line("Resident memory (MiB)", format!("{resident:.2}"));
    }
    eprintln!("=====================================================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_encode_arguments() {
        let cli = Cli::try_parse_from([
            "netlist-bmc",
            "encode",
            "counter.v",
            "--bound",
            "4",
            "--target",
            "10",
            "-o",
            "out.cnf",
        ])
        .unwrap();
        let Commands::Encode {
            netlist,
            query,
            output,
            var_map,
            common,
        } = cli.command
        else {
            panic!("expected encode");
        };
        assert_eq!(netlist, PathBuf::from("counter.v"));
        assert_eq!(query.bound, 4);
        assert_eq!(query.target().unwrap(), Target::Bits(vec![true, false]));
        assert_eq!(output, Some(PathBuf::from("out.cnf")));
        assert!(var_map.is_none());
        assert!(!common.debug);
    }

    #[test]
    fn test_named_target_and_solver_args() {
        let cli = Cli::try_parse_from([
            "netlist-bmc",
            "check",
            "m.v",
            "-b",
            "2",
            "-a",
            "s0=1",
            "-a",
            "s1=0",
            "--solver",
            "kissat",
            "--solver-arg",
            "-q",
            "-d",
        ])
        .unwrap();
        let Commands::Check {
            query,
            solver_args,
            common,
            ..
        } = &cli.command
        else {
            panic!("expected check");
        };
        assert_eq!(
            query.target().unwrap(),
            Target::Named(vec![("s0".into(), true), ("s1".into(), false)])
        );
        assert_eq!(solver_args, &vec!["-q".to_string()]);
        assert!(common.debug);
        assert!(cli.command.common().is_some());
    }

    #[test]
    fn test_target_required() {
        assert!(Cli::try_parse_from(["netlist-bmc", "encode", "m.v", "--bound", "2"]).is_err());
        assert!(
            Cli::try_parse_from([
                "netlist-bmc",
                "encode",
                "m.v",
                "--bound",
                "2",
                "--target",
                "1",
                "--assign",
                "s=1"
            ])
            .is_err()
        );
    }

    #[test]
    fn test_default_cnf_path() {
        assert_eq!(
            default_cnf_path(Path::new("designs/counter.v")),
            PathBuf::from("designs/counter.v.bmc.cnf")
        );
    }
}
