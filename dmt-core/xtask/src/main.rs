use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use xshell::{cmd, Shell};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Test, benchmark and verification automation for dmt-core", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Runs the unit, integration and doc tests of the workspace
    Test {
        /// Run with --release (the property tests are much faster)
        #[arg(long)]
        release: bool,
    },
    /// Runs the iai-callgrind library benchmarks
    Bench {
        /// Only run benchmarks whose name contains this string
        #[arg(long, short)]
        filter: Option<String>,
    },
    /// Runs the dmt binary on a synthetic field
    Run {
        #[arg(long, short, value_enum, default_value_t = Target::X86_64)]
        target: Target,

        /// Grid bit depth
        #[arg(long, default_value_t = 7)]
        bits: u32,

        /// Spatial dimension
        #[arg(long, value_enum, default_value_t = DimArg::Two)]
        dim: DimArg,

        /// Pin the process to a specific CPU core (using taskset)
        #[arg(long, short = 'p')]
        pin_core: Option<usize>,
    },
    /// Runs the Kani proofs of the packed arithmetic
    Kani,
    /// Checks compilation for all supported targets
    CheckAll,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum Target {
    /// Native x86_64
    X86_64,
    /// Linux on ARM64 (using cross)
    Aarch64,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum DimArg {
    Two,
    Three,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let sh = Shell::new()?;

    match cli.command {
        Commands::Test { release } => run_tests(&sh, release)?,
        Commands::Bench { filter } => run_bench(&sh, filter)?,
        Commands::Run {
            target,
            bits,
            dim,
            pin_core,
        } => run_cli(&sh, target, bits, dim, pin_core)?,
        Commands::Kani => run_kani(&sh)?,
        Commands::CheckAll => check_all(&sh)?,
    }

    Ok(())
}

fn run_tests(sh: &Shell, release: bool) -> Result<()> {
    let profile_flag = if release { Some("--release") } else { None };
    println!(">> Running workspace tests...");
    cmd!(sh, "cargo test --workspace {profile_flag...}").run()?;
    println!(">> Running doc tests...");
    cmd!(sh, "cargo test --doc -p dmt-core").run()?;
    Ok(())
}

fn run_bench(sh: &Shell, filter: Option<String>) -> Result<()> {
    ensure_tool(sh, "iai-callgrind-runner", "iai-callgrind-runner@0.14")?;
    if cmd!(sh, "valgrind --version").read().is_err() {
        anyhow::bail!("valgrind is required by iai-callgrind but was not found on PATH");
    }

    println!(">> Benchmarking dmt-core (callgrind)...");
    let filter_args: Vec<String> = match filter {
        Some(f) => vec!["--".into(), f],
        None => Vec::new(),
    };
    cmd!(sh, "cargo bench -p dmt-core --bench gradient_ops {filter_args...}").run()?;
    Ok(())
}

fn run_cli(
    sh: &Shell,
    target: Target,
    bits: u32,
    dim: DimArg,
    pin_core: Option<usize>,
) -> Result<()> {
    let dim = match dim {
        DimArg::Two => "2",
        DimArg::Three => "3",
    };
    let bits = bits.to_string();

    // Helper to wrap command with taskset if requested
    let prefix = match pin_core {
        Some(c) => format!("taskset -c {} ", c),
        None => String::new(),
    };
    let app_args = format!("-- --bits {} --dim {} --summary --progress", bits, dim);

    match target {
        Target::X86_64 => {
            println!(">> Running dmt x86-64 (Native)...");
            if let Some(c) = pin_core {
                println!("   (Pinned to Core {})", c);
            }
            let _env = sh.push_env("RUSTFLAGS", "-C target-cpu=native");
            let cmd_str = format!("{}cargo run --release -p dmt-cli {}", prefix, app_args);
            cmd!(sh, "bash -c {cmd_str}").run()?;
        }
        Target::Aarch64 => {
            println!(">> Running dmt Aarch64 (via Cross)...");
            ensure_tool(sh, "cross", "cross")?;
            let cmd_str = format!(
                "{}cross run --target aarch64-unknown-linux-gnu --release -p dmt-cli {}",
                prefix, app_args
            );
            cmd!(sh, "bash -c {cmd_str}").run()?;
        }
    }
    Ok(())
}

fn run_kani(sh: &Shell) -> Result<()> {
    if cmd!(sh, "cargo kani --version").read().is_err() {
        anyhow::bail!("cargo-kani is not installed (see https://model-checking.github.io/kani/install-guide.html)");
    }
    println!(">> Running Kani proofs...");
    cmd!(sh, "cargo kani --package dmt-core")
        .run()
        .context("kani verification failed")?;
    Ok(())
}

fn check_all(sh: &Shell) -> Result<()> {
    println!("--- Checking x86-64 ---");
    cmd!(sh, "cargo check --workspace --all-targets --release").run()?;

    println!("--- Checking Aarch64 ---");
    ensure_tool(sh, "cross", "cross")?;
    cmd!(
        sh,
        "cross check --target aarch64-unknown-linux-gnu --workspace --release"
    )
    .run()?;

    println!("--- Checking 32-bit x86 ---");
    ensure_target(sh, "i686-unknown-linux-gnu")?;
    cmd!(sh, "cargo check --target i686-unknown-linux-gnu -p dmt-core --release").run()?;

    println!(">> All targets checked successfully.");
    Ok(())
}

fn ensure_tool(sh: &Shell, binary: &str, crate_name: &str) -> Result<()> {
    if cmd!(sh, "{binary} --version").read().is_err() {
        println!("!! '{}' is not installed. Installing via cargo...", binary);
        cmd!(sh, "cargo install {crate_name}").run()?;
    }
    Ok(())
}

fn ensure_target(sh: &Shell, target: &str) -> Result<()> {
    let output = cmd!(sh, "rustup target list --installed").read()?;
    if !output.contains(target) {
        println!("!! Target '{}' not found. Installing via rustup...", target);
        cmd!(sh, "rustup target add {target}").run()?;
    }
    Ok(())
}
