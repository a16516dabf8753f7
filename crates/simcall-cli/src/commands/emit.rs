//! Emit command implementation.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use console::style;
use rustc_hash::FxHashSet;
use simcall_codegen::{BitDiscovery, EmitConfig, emit};
use tokio::task::JoinSet;
use tracing::{debug, info};

use super::common::{load_circuit, load_config};

/// Rendering of the emitted call list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Indented call text.
    Text,
    /// JSON call list.
    Json,
}

impl OutputFormat {
    /// File extension used for `--out-dir` outputs.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Text => "sim",
            OutputFormat::Json => "json",
        }
    }
}

/// Arguments of `simcall emit`.
pub struct EmitArgs {
    pub inputs: Vec<PathBuf>,
    pub output: Option<PathBuf>,
    pub out_dir: Option<PathBuf>,
    pub format: OutputFormat,
    pub config: Option<PathBuf>,
    pub discovery: Option<BitDiscovery>,
    pub indent: Option<usize>,
    pub loop_var: Option<String>,
    pub simulator: Option<String>,
}

impl EmitArgs {
    /// Config file values with command-line flags applied on top.
    fn resolve_config(&self) -> Result<EmitConfig> {
        let mut config = load_config(self.config.as_deref())?;
        if let Some(discovery) = self.discovery {
            config = config.with_discovery(discovery);
        }
        if let Some(indent) = self.indent {
            config = config.with_indent_width(indent);
        }
        if let Some(name) = &self.loop_var {
            config = config.with_default_loop_var(name.clone());
        }
        if let Some(name) = &self.simulator {
            config = config.with_simulator(name.clone());
        }
        Ok(config)
    }
}

/// Execute the emit command.
pub async fn execute(args: EmitArgs) -> Result<()> {
    if args.output.is_some() && args.inputs.len() > 1 {
        anyhow::bail!("--output takes a single input; use --out-dir for several");
    }

    let config = args.resolve_config()?;
    info!(
        "Emitting {} input(s) with {} discovery",
        args.inputs.len(),
        config.discovery
    );

    let rendered = compile_all(&args.inputs, &config, args.format).await?;

    if let Some(path) = &args.output {
        write_output(path, &rendered.concat())?;
    } else if let Some(dir) = &args.out_dir {
        let targets = output_paths(&args.inputs, dir, args.format)?;
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        for (path, content) in targets.iter().zip(&rendered) {
            write_output(path, content)?;
        }
    } else if let [single] = rendered.as_slice() {
        print!("{single}");
    } else {
        for (input, content) in args.inputs.iter().zip(&rendered) {
            println!("// {}", input.display());
            print!("{content}");
        }
    }

    Ok(())
}

/// Compile every input on the blocking pool, returning outputs in input order.
///
/// Nothing is returned unless every input compiles.
pub async fn compile_all(
    inputs: &[PathBuf],
    config: &EmitConfig,
    format: OutputFormat,
) -> Result<Vec<String>> {
    let mut tasks = JoinSet::new();
    for (position, input) in inputs.iter().enumerate() {
        let input = input.clone();
        let config = config.clone();
        tasks.spawn_blocking(move || (position, compile_file(&input, &config, format)));
    }

    let mut finished = Vec::with_capacity(inputs.len());
    while let Some(joined) = tasks.join_next().await {
        finished.push(joined.context("Compilation task failed")?);
    }
    finished.sort_by_key(|(position, _)| *position);

    finished.into_iter().map(|(_, result)| result).collect()
}

/// Load and compile one input file.
pub fn compile_file(path: &Path, config: &EmitConfig, format: OutputFormat) -> Result<String> {
    let circuit = load_circuit(path)?;
    let program = emit(&circuit, config)
        .with_context(|| format!("Failed to compile {}", path.display()))?;
    debug!("{}: {} calls", path.display(), program.calls.len());

    match format {
        OutputFormat::Text => Ok(program.to_text(config)),
        OutputFormat::Json => {
            let mut json = program.to_json()?;
            json.push('\n');
            Ok(json)
        }
    }
}

/// One output path per input under `dir`, named after the input's stem.
pub fn output_paths(inputs: &[PathBuf], dir: &Path, format: OutputFormat) -> Result<Vec<PathBuf>> {
    let mut seen = FxHashSet::default();
    inputs
        .iter()
        .map(|input| {
            let stem = input
                .file_stem()
                .with_context(|| format!("Input has no file name: {}", input.display()))?;
            let path = dir.join(format!("{}.{}", stem.to_string_lossy(), format.extension()));
            if !seen.insert(path.clone()) {
                anyhow::bail!(
                    "Two inputs would both write {}; rename one of them",
                    path.display()
                );
            }
            Ok(path)
        })
        .collect()
}

fn write_output(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).with_context(|| format!("Failed to write file: {}", path.display()))?;
    eprintln!(
        "{} Wrote {}",
        style("✓").green().bold(),
        style(path.display()).green()
    );
    Ok(())
}
