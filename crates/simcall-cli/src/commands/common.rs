//! Shared helpers for CLI commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use simcall_codegen::EmitConfig;
use simcall_ir::Circuit;
use simcall_qasm3::parse;
use tracing::debug;

/// Load a circuit from a QASM3 or JSON file.
pub fn load_circuit(path: &Path) -> Result<Circuit> {
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }

    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    let circuit = match ext.to_lowercase().as_str() {
        "json" => Circuit::from_json(&source)
            .with_context(|| format!("Invalid circuit JSON in {}", path.display()))?,
        _ => parse(&source).with_context(|| format!("Parse error in {}", path.display()))?,
    };

    debug!(
        "Loaded {}: {} qubits, {} clbits, {} operations",
        path.display(),
        circuit.num_qubits(),
        circuit.num_clbits(),
        circuit.num_ops()
    );
    Ok(circuit)
}

/// Load an emission config from a YAML file, or the defaults when none is given.
pub fn load_config(path: Option<&Path>) -> Result<EmitConfig> {
    let Some(path) = path else {
        return Ok(EmitConfig::default());
    };

    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    let config: EmitConfig = serde_yaml_ng::from_str(&source)
        .with_context(|| format!("Invalid config file: {}", path.display()))?;

    debug!("Loaded config from {}: {config:?}", path.display());
    Ok(config)
}
