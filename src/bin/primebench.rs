use std::{
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
    process,
    time::Duration,
};

use clap::{ArgAction, Parser, Subcommand};
use primebench::{
    BenchError, BenchOutcome, Control, RuntimeConfig, Session, candidate::Candidate, config,
    primes, sampler::MAX_REPEATS,
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(name = "primebench", version, about = "Live timing charts for prime generators")]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the shipped candidates
    List,
    /// Benchmark candidates in order, charting each against the earlier ones
    Run {
        /// Candidate names; all shipped candidates when omitted
        candidates: Vec<String>,
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_REPEATS as i64))]
        repeats: Option<u32>,
        /// Re-render the charts after every sample
        #[arg(long, value_parser = parse_bool)]
        incremental: Option<bool>,
        /// Directory for linear.svg and loglog.svg
        #[arg(long, default_value = "charts")]
        out: PathBuf,
        /// Seconds of discovery before a candidate stops growing
        #[arg(long)]
        budget: Option<f64>,
        /// Print the collected series as JSON
        #[arg(long)]
        json: bool,
    },
    /// Read presentation controls from stdin
    Interactive {
        #[arg(long, default_value = "charts")]
        out: PathBuf,
    },
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

const INTERACTIVE_HELP: &str = "commands: run NAME | list | clear | incremental on|off | repeats N | help | quit";

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = match RuntimeConfig::from_env() {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(2);
        }
    };
    let result = match cli.command {
        Command::List => {
            print_candidates(&mut io::stdout()).map_err(BenchError::from)
        }
        Command::Run {
            candidates,
            repeats,
            incremental,
            out,
            budget,
            json,
        } => run_candidates(config, &candidates, repeats, incremental, &out, budget, json),
        Command::Interactive { out } => run_interactive(config, &out),
    };
    if let Err(err) = result {
        eprintln!("command failed: {err}");
        process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn parse_bool(raw: &str) -> Result<bool, String> {
    Ok(config::parse_flag(raw))
}

fn run_candidates(
    mut config: RuntimeConfig,
    names: &[String],
    repeats: Option<u32>,
    incremental: Option<bool>,
    out: &Path,
    budget: Option<f64>,
    json: bool,
) -> Result<(), BenchError> {
    if let Some(repeats) = repeats {
        config.repeats = repeats;
    }
    if let Some(incremental) = incremental {
        config.incremental = incremental;
    }
    let candidates = select_candidates(names)?;
    let mut session = Session::new(config, out);
    if let Some(secs) = budget {
        let budget = Duration::try_from_secs_f64(secs)
            .map_err(|e| BenchError::invalid_input(format!("budget {secs}: {e}")))?;
        session.set_time_budget(budget);
    }
    let mut stdout = io::stdout();
    for candidate in &candidates {
        let outcome = session.benchmark(candidate)?;
        writeln!(stdout, "{}", summarize(candidate, &outcome))?;
    }
    if json {
        writeln!(
            stdout,
            "{}",
            serde_json::to_string_pretty(session.state().store())?
        )?;
    }
    Ok(())
}

fn run_interactive(config: RuntimeConfig, out: &Path) -> Result<(), BenchError> {
    let mut session = Session::new(config, out);
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    writeln!(stdout, "{INTERACTIVE_HELP}")?;
    for line in stdin.lock().lines() {
        let line = line?;
        match handle_line(&mut session, line.trim(), &mut stdout) {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(BenchError::InvalidInput(msg)) | Err(BenchError::UnknownCandidate(msg)) => {
                writeln!(stdout, "error: {msg}")?;
            }
            Err(err) => return Err(err),
        }
    }
    Ok(())
}

fn handle_line<W: Write>(
    session: &mut Session,
    line: &str,
    out: &mut W,
) -> Result<Flow, BenchError> {
    let mut parts = line.splitn(2, char::is_whitespace);
    match (parts.next().unwrap_or(""), parts.next().map(str::trim)) {
        ("", None) => Ok(Flow::Continue),
        ("quit" | "exit", None) => Ok(Flow::Quit),
        ("help", None) => {
            writeln!(out, "{INTERACTIVE_HELP}")?;
            Ok(Flow::Continue)
        }
        ("list", None) => {
            print_candidates(out)?;
            Ok(Flow::Continue)
        }
        ("run", Some(name)) => {
            let candidate = primes::find(name)?;
            let outcome = session.benchmark(&candidate)?;
            writeln!(out, "{}", summarize(&candidate, &outcome))?;
            Ok(Flow::Continue)
        }
        _ => {
            session.control(Control::parse(line)?)?;
            let state = session.state();
            writeln!(
                out,
                "series={} incremental={} repeats={}",
                state.store().len(),
                state.incremental(),
                state.repeats()
            )?;
            Ok(Flow::Continue)
        }
    }
}

fn select_candidates(names: &[String]) -> Result<Vec<Candidate>, BenchError> {
    if names.is_empty() {
        return Ok(primes::catalog());
    }
    names.iter().map(|name| primes::find(name)).collect()
}

fn print_candidates<W: Write>(out: &mut W) -> io::Result<()> {
    for candidate in primes::catalog() {
        writeln!(out, "{:<20}{}", candidate.name(), candidate.convention())?;
    }
    Ok(())
}

fn summarize(candidate: &Candidate, outcome: &BenchOutcome) -> String {
    match outcome {
        BenchOutcome::Completed(series) => match series.points().last() {
            Some(last) => format!(
                "{:<20}{} points, {} primes in {:.6}s",
                candidate.name(),
                series.len(),
                last.size,
                last.seconds
            ),
            None => format!("{:<20}no points", candidate.name()),
        },
        BenchOutcome::Skipped(reason) => format!("{:<20}skipped: {reason}", candidate.name()),
    }
}
