use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use env_logger::{Builder, Env};

use sched_sim::config::{SimulationConfig, SweepConfig};
use sched_sim::scheduler::SchedulerKind;
use sched_sim::simulation::{Simulation, SimulationOutcome};
use sched_sim::sweep::ParameterSweep;
use sched_sim::workload::load_process;
use sched_sim::{Result, SimError};

const DEFAULT_PROCESS_FILES: [&str; 4] = [
    "data/process_a.txt",
    "data/process_b.txt",
    "data/process_c.txt",
    "data/process_d.txt",
];

/// OS scheduling simulator.
#[derive(Debug, Parser)]
#[command(name = "sched-sim", version, about)]
struct Cli {
    /// Scheduler to run: 'fcfs' (First-Come-First-Served) or 'rr' (Round Robin).
    #[arg(long, default_value = "fcfs", conflicts_with = "sweep")]
    scheduler: SchedulerKind,

    /// Round Robin time quantum in ns [default: 500, or the config file value].
    #[arg(long, conflicts_with = "sweep")]
    quantum: Option<u64>,

    /// Context switch penalty in ns [default: 20, or the config file value].
    #[arg(long)]
    context_switch_penalty: Option<u64>,

    /// JSON file with `quantum` and `context_switch_penalty`.
    #[arg(long, value_name = "FILE", conflicts_with = "sweep")]
    config: Option<PathBuf>,

    /// Run the parameter sweep instead of a single simulation.
    #[arg(long)]
    sweep: bool,

    /// JSON file describing the sweep grid.
    #[arg(long, value_name = "FILE", requires = "sweep")]
    sweep_config: Option<PathBuf>,

    /// Seed for generated sweep workloads.
    #[arg(long)]
    seed: Option<u64>,

    /// Directory for sweep reports.
    #[arg(long, default_value = "output")]
    output: PathBuf,

    /// Print metrics as JSON (sweep: print the CSV report).
    #[arg(long)]
    json: bool,

    /// Instruction files, one process each (ids assigned from 1).
    #[arg(value_name = "PROCESS_FILE", conflicts_with = "sweep")]
    process_files: Vec<PathBuf>,
}

fn main() -> ExitCode {
    Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();

    let cli = Cli::parse();
    let result = if cli.sweep {
        run_sweep(&cli)
    } else {
        run_single(&cli)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run_single(cli: &Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => SimulationConfig::from_file(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(q) = cli.quantum {
        config = config.with_quantum(q);
    }
    if let Some(p) = cli.context_switch_penalty {
        config = config.with_context_switch_penalty(p);
    }

    let files: Vec<PathBuf> = if cli.process_files.is_empty() {
        DEFAULT_PROCESS_FILES.iter().map(PathBuf::from).collect()
    } else {
        cli.process_files.clone()
    };
    let processes = files
        .iter()
        .zip(1..)
        .map(|(path, id)| load_process(path, id))
        .collect::<Result<Vec<_>>>()?;

    match cli.scheduler {
        SchedulerKind::Fcfs => println!("Running FCFS scheduler..."),
        SchedulerKind::RoundRobin => println!(
            "Running Round Robin scheduler with quantum = {} ns...",
            config.quantum
        ),
    }

    let outcome = Simulation::new(config).run(cli.scheduler, processes)?;
    if cli.json {
        println!("{}", kpi_json(&outcome)?);
    } else {
        print_metrics(&outcome);
    }
    Ok(())
}

fn print_metrics(outcome: &SimulationOutcome) {
    println!("\nProcess Metrics:");
    for m in &outcome.kpi.processes {
        println!(
            "Process {}: Turnaround Time = {} ns, CPU Time = {} ns, Waiting Time = {} ns",
            m.process_id, m.turnaround_time, m.cpu_time, m.waiting_time
        );
    }
    println!("Total simulation time: {} ns", outcome.kpi.total_time);
}

fn kpi_json(outcome: &SimulationOutcome) -> Result<String> {
    serde_json::to_string_pretty(&outcome.kpi).map_err(SimError::Serialization)
}

fn run_sweep(cli: &Cli) -> Result<()> {
    let mut config = match &cli.sweep_config {
        Some(path) => SweepConfig::from_file(path)?,
        None => SweepConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    if let Some(p) = cli.context_switch_penalty {
        config = config.with_context_switch_penalty(p);
    }

    println!("Running parameter sweep simulations...");
    let report = ParameterSweep::new(config).run()?;

    if cli.json {
        println!("{}", report.to_csv());
    } else {
        println!("\nAverage turnaround time (ns):");
        print!("{}", report.render_summary());
    }

    let json_path = report.write_json(&cli.output)?;
    let csv_path = report.write_csv(&cli.output)?;
    println!(
        "Reports written to {} and {}",
        json_path.display(),
        csv_path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["sched-sim"]);
        assert_eq!(cli.scheduler, SchedulerKind::Fcfs);
        assert!(cli.quantum.is_none());
        assert!(!cli.sweep);
        assert!(cli.process_files.is_empty());
        assert_eq!(cli.output, PathBuf::from("output"));
    }

    #[test]
    fn test_cli_round_robin() {
        let cli = Cli::parse_from(["sched-sim", "--scheduler", "rr", "--quantum", "200", "a.txt"]);
        assert_eq!(cli.scheduler, SchedulerKind::RoundRobin);
        assert_eq!(cli.quantum, Some(200));
        assert_eq!(cli.process_files, vec![PathBuf::from("a.txt")]);
    }

    #[test]
    fn test_cli_sweep_rejects_single_run_options() {
        for extra in [
            &["--quantum", "200"][..],
            &["--scheduler", "rr"][..],
            &["--config", "sim.json"][..],
            &["a.txt"][..],
        ] {
            let args = ["sched-sim", "--sweep"].iter().chain(extra);
            assert!(Cli::try_parse_from(args).is_err(), "accepted {extra:?}");
        }

        let cli = Cli::parse_from(["sched-sim", "--sweep", "--seed", "3", "--context-switch-penalty", "5"]);
        assert!(cli.sweep);
        assert_eq!(cli.seed, Some(3));
        assert_eq!(cli.context_switch_penalty, Some(5));
    }

    #[test]
    fn test_kpi_json_output() {
        let processes = vec![sched_sim::models::Process::from_mnemonics(1, &["LOAD", "ADD"])];
        let outcome = Simulation::default()
            .run(SchedulerKind::Fcfs, processes)
            .unwrap();

        let json = kpi_json(&outcome).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["total_time"], 11);
        assert_eq!(value["processes"][0]["cpu_time"], 11);
    }

    #[test]
    fn test_cli_rejects_unknown_scheduler() {
        assert!(Cli::try_parse_from(["sched-sim", "--scheduler", "sjf"]).is_err());
    }
}
