//! Simcall Command-Line Interface
//!
//! Compiles OpenQASM 3 programs and circuit JSON files into simulator call
//! text.
//!
//! ```text
//! simcall emit teleport.qasm
//! simcall emit a.qasm b.qasm --out-dir build/ --format json
//! simcall inspect teleport.qasm --discovery referenced
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use simcall_codegen::BitDiscovery;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::emit::{EmitArgs, OutputFormat};
use commands::{emit, inspect, version};

/// Simcall - compile quantum circuits to simulator calls
#[derive(Parser)]
#[command(name = "simcall")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile circuits into simulator call text
    Emit {
        /// Input files (QASM3 or JSON)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output file (single input only)
        #[arg(short, long, conflicts_with = "out_dir")]
        output: Option<PathBuf>,

        /// Directory receiving one output file per input
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// YAML emission config
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Bit numbering strategy (declared, referenced)
        #[arg(long)]
        discovery: Option<BitDiscovery>,

        /// Spaces per nesting level
        #[arg(long)]
        indent: Option<usize>,

        /// Loop variable for loops that declare none
        #[arg(long)]
        loop_var: Option<String>,

        /// Name of the simulator object
        #[arg(long)]
        simulator: Option<String>,
    },

    /// Show the registers and bit numbering of a circuit
    Inspect {
        /// Input file (QASM3 or JSON)
        input: PathBuf,

        /// Bit numbering strategy (declared, referenced)
        #[arg(long, default_value_t = BitDiscovery::Declared)]
        discovery: BitDiscovery,
    },

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    // Execute command
    let result = match cli.command {
        Commands::Emit {
            inputs,
            output,
            out_dir,
            format,
            config,
            discovery,
            indent,
            loop_var,
            simulator,
        } => {
            emit::execute(EmitArgs {
                inputs,
                output,
                out_dir,
                format,
                config,
                discovery,
                indent,
                loop_var,
                simulator,
            })
            .await
        }

        Commands::Inspect { input, discovery } => inspect::execute(&input, discovery),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
