//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - quantum circuit to simulator call compiler",
        style("Simcall").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  simcall-ir       Circuit tree representation");
    println!("  simcall-qasm3    OpenQASM 3 front-end");
    println!("  simcall-codegen  Simulator call emission");
    println!("  simcall-cli      Command-line interface");
    println!();
    println!("License: {}", style("Apache-2.0").dim());
}
