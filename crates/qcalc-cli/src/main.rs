// crates/qcalc-cli/src/main.rs

#![forbid(unsafe_code)]
#![deny(
    rust_2018_idioms,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo
)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use qcalc_closure::{aclosure_naive, aclosure_pq, aclosure_queue, refine, Engine};
use qcalc_core::calculus::Calculus;
use qcalc_parse::{generate, parse_calculus, parse_csp, GeneratorConfig};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "qcalc",
    about = "Qualitative constraint calculus reasoner",
    long_about = "qcalc: apply algebraic closure and backtracking refinement search to qualitative constraint networks over a user-supplied relation calculus.",
    version = env!("CARGO_PKG_VERSION"),
    disable_help_subcommand = true
)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Run algebraic closure (path consistency) over every instance in a CSP file.
    Closure {
        /// Path to the calculus definition file
        #[arg(long)]
        calculus: PathBuf,

        /// Path to the CSP instance file
        #[arg(long)]
        csp: PathBuf,

        /// Closure engine to use
        #[arg(long, value_enum, default_value_t = EngineOpt::Pq)]
        engine: EngineOpt,
    },

    /// Run backtracking refinement search over every instance in a CSP file.
    Refine {
        /// Path to the calculus definition file
        #[arg(long)]
        calculus: PathBuf,

        /// Path to the CSP instance file
        #[arg(long)]
        csp: PathBuf,
    },

    /// Generate random CSP instances for a given calculus.
    Generate {
        /// Path to the calculus definition file
        #[arg(long)]
        calculus: PathBuf,

        /// Number of instances to generate
        #[arg(long, default_value_t = 1)]
        count: u32,

        /// Network size (variables are named 0..n)
        #[arg(long)]
        n: u32,

        /// Average degree (expected non-universal constraints per variable)
        #[arg(long)]
        d: u32,

        /// Average label size (expected base relations per constraint)
        #[arg(long)]
        l: u32,

        /// Seed for the random generator
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Output path; prints to stdout if omitted
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, ValueEnum)]
enum EngineOpt {
    /// Fixed-point re-scan over every ordered triple
    Naive,
    /// FIFO-queue-driven propagation
    Queue,
    /// Priority-queue propagation, ordered by label popcount
    Pq,
}

impl From<EngineOpt> for Engine {
    fn from(opt: EngineOpt) -> Self {
        match opt {
            EngineOpt::Naive => Self::Naive,
            EngineOpt::Queue => Self::Queue,
            EngineOpt::Pq => Self::PriorityQueue,
        }
    }
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let ok = match cli.cmd {
        Cmd::Closure {
            calculus,
            csp,
            engine,
        } => run_closure(&calculus, &csp, engine.into())?,
        Cmd::Refine { calculus, csp } => run_refine(&calculus, &csp)?,
        Cmd::Generate {
            calculus,
            count,
            n,
            d,
            l,
            seed,
            out,
        } => {
            run_generate(&calculus, count, n, d, l, seed, out.as_deref())?;
            true
        }
    };

    std::process::exit(i32::from(!ok));
}

/// Initialize tracing with an env-driven filter (default INFO).
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = fmt::layer().with_target(false).with_level(true).compact();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

fn load_calculus(path: &Path) -> Result<Calculus> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading calculus file {}", path.display()))?;
    parse_calculus(&text).with_context(|| format!("parsing calculus file {}", path.display()))
}

/// Run closure over every instance, returning whether every oracle-tagged
/// instance's verdict matched its tag (instances with no tag always pass).
fn run_closure(calculus_path: &Path, csp_path: &Path, engine: Engine) -> Result<bool> {
    let calculus = load_calculus(calculus_path)?;
    let text = std::fs::read_to_string(csp_path)
        .with_context(|| format!("reading CSP file {}", csp_path.display()))?;
    let instances =
        parse_csp(&calculus, &text).with_context(|| format!("parsing CSP file {}", csp_path.display()))?;

    info!(count = instances.len(), engine = ?engine, "running closure");

    let mut all_matched = true;
    for (idx, mut instance) in instances.into_iter().enumerate() {
        let verdict = match engine {
            Engine::Naive => aclosure_naive(&calculus, &mut instance.network),
            Engine::Queue => aclosure_queue(&calculus, &mut instance.network),
            Engine::PriorityQueue => aclosure_pq(&calculus, &mut instance.network),
        };
        let matched = report_verdict(idx, &instance.additional_info, instance.oracle, verdict);
        all_matched &= matched;
    }
    Ok(all_matched)
}

fn run_refine(calculus_path: &Path, csp_path: &Path) -> Result<bool> {
    let calculus = load_calculus(calculus_path)?;
    let text = std::fs::read_to_string(csp_path)
        .with_context(|| format!("reading CSP file {}", csp_path.display()))?;
    let instances =
        parse_csp(&calculus, &text).with_context(|| format!("parsing CSP file {}", csp_path.display()))?;

    info!(count = instances.len(), "running refinement search");

    let mut all_matched = true;
    for (idx, instance) in instances.into_iter().enumerate() {
        let verdict = refine(&calculus, &instance.network);
        let matched = report_verdict(idx, &instance.additional_info, instance.oracle, verdict);
        all_matched &= matched;
    }
    Ok(all_matched)
}

fn report_verdict(idx: usize, info: &str, oracle: Option<bool>, verdict: bool) -> bool {
    let label = if verdict { "consistent" } else { "not consistent" };
    match oracle {
        Some(expected) if expected == verdict => {
            println!("instance {idx} ({info}): {label} [oracle: match]");
            true
        }
        Some(expected) => {
            println!(
                "instance {idx} ({info}): {label} [oracle: MISMATCH, expected {}]",
                if expected { "consistent" } else { "not consistent" }
            );
            false
        }
        None => {
            println!("instance {idx} ({info}): {label}");
            true
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn run_generate(
    calculus_path: &Path,
    count: u32,
    n: u32,
    d: u32,
    l: u32,
    seed: u64,
    out: Option<&Path>,
) -> Result<()> {
    let calculus = load_calculus(calculus_path)?;
    let config = GeneratorConfig { count, n, d, l };

    info!(count, n, d, l, seed, "generating random CSP instances");
    let text = generate(&calculus, &config, seed);

    match out {
        Some(path) => {
            std::fs::write(path, &text)
                .with_context(|| format!("writing generated instances to {}", path.display()))?;
            println!("Generated {count} instance(s) -> {}", path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}
