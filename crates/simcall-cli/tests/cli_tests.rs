//! CLI argument parsing and binary invocation tests.
//!
//! The CLI is a binary crate, so argument parsing is checked on mirrored clap
//! structs and end-to-end behavior by running the built `simcall` binary.

const BELL: &str = "OPENQASM 3.0;\nqubit[2] q;\nbit[2] c;\nh q[0];\ncx q[0], q[1];\nc = measure q;\n";

const BELL_OUTPUT: &str = "sim.set_num_qubits(2);\n\
                           sim.set_num_clbits(2);\n\
                           sim.gate_h({0}, {}, {});\n\
                           sim.gate_x({1}, {0}, {});\n\
                           sim.measure({0,1}, {0,1});\n";

// ============================================================================
// Clap argument parsing (test via try_parse_from on equivalent structs)
// ============================================================================

mod clap_parsing {
    use std::path::PathBuf;

    use clap::{Parser, Subcommand, ValueEnum};
    use simcall_codegen::BitDiscovery;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
    enum OutputFormat {
        Text,
        Json,
    }

    // Mirror the CLI struct for testing (since main.rs is a binary)
    #[derive(Parser)]
    #[command(name = "simcall")]
    struct TestCli {
        #[arg(short, long, action = clap::ArgAction::Count, global = true)]
        verbose: u8,

        #[command(subcommand)]
        command: TestCommands,
    }

    #[derive(Subcommand)]
    enum TestCommands {
        Emit {
            #[arg(required = true)]
            inputs: Vec<PathBuf>,
            #[arg(short, long, conflicts_with = "out_dir")]
            output: Option<PathBuf>,
            #[arg(long)]
            out_dir: Option<PathBuf>,
            #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
            format: OutputFormat,
            #[arg(short, long)]
            config: Option<PathBuf>,
            #[arg(long)]
            discovery: Option<BitDiscovery>,
            #[arg(long)]
            indent: Option<usize>,
            #[arg(long)]
            loop_var: Option<String>,
            #[arg(long)]
            simulator: Option<String>,
        },
        Inspect {
            input: PathBuf,
            #[arg(long, default_value_t = BitDiscovery::Declared)]
            discovery: BitDiscovery,
        },
        Version,
    }

    #[test]
    fn test_emit_defaults() {
        let cli = TestCli::try_parse_from(["simcall", "emit", "bell.qasm"]).unwrap();
        match cli.command {
            TestCommands::Emit {
                inputs,
                output,
                format,
                discovery,
                indent,
                ..
            } => {
                assert_eq!(inputs, [PathBuf::from("bell.qasm")]);
                assert!(output.is_none());
                assert_eq!(format, OutputFormat::Text);
                assert!(discovery.is_none());
                assert!(indent.is_none());
            }
            _ => panic!("expected emit"),
        }
    }

    #[test]
    fn test_emit_all_flags() {
        let cli = TestCli::try_parse_from([
            "simcall",
            "-vv",
            "emit",
            "a.qasm",
            "b.json",
            "--out-dir",
            "build",
            "--format",
            "json",
            "--discovery",
            "referenced",
            "--indent",
            "2",
            "--loop-var",
            "k",
            "--simulator",
            "backend",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            TestCommands::Emit {
                inputs,
                out_dir,
                format,
                discovery,
                indent,
                loop_var,
                simulator,
                ..
            } => {
                assert_eq!(inputs.len(), 2);
                assert_eq!(out_dir, Some(PathBuf::from("build")));
                assert_eq!(format, OutputFormat::Json);
                assert_eq!(discovery, Some(BitDiscovery::Referenced));
                assert_eq!(indent, Some(2));
                assert_eq!(loop_var.as_deref(), Some("k"));
                assert_eq!(simulator.as_deref(), Some("backend"));
            }
            _ => panic!("expected emit"),
        }
    }

    #[test]
    fn test_emit_requires_input() {
        assert!(TestCli::try_parse_from(["simcall", "emit"]).is_err());
    }

    #[test]
    fn test_emit_output_conflicts_with_out_dir() {
        let result =
            TestCli::try_parse_from(["simcall", "emit", "a.qasm", "-o", "a.sim", "--out-dir", "d"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_discovery_rejected() {
        let result = TestCli::try_parse_from(["simcall", "emit", "a.qasm", "--discovery", "sorted"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_format_rejected() {
        let result = TestCli::try_parse_from(["simcall", "emit", "a.qasm", "--format", "yaml"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_inspect_default_discovery() {
        let cli = TestCli::try_parse_from(["simcall", "inspect", "c.qasm"]).unwrap();
        assert!(matches!(
            cli.command,
            TestCommands::Inspect {
                discovery: BitDiscovery::Declared,
                ..
            }
        ));
    }

    #[test]
    fn test_version_subcommand() {
        let cli = TestCli::try_parse_from(["simcall", "version"]).unwrap();
        assert!(matches!(cli.command, TestCommands::Version));
    }
}

// ============================================================================
// Config file format
// ============================================================================

mod config_format {
    use simcall_codegen::{BitDiscovery, EmitConfig};

    #[test]
    fn test_full_yaml_config() {
        let yaml = "discovery: referenced\nindent_width: 2\ndefault_loop_var: idx\nsimulator: backend\n";
        let config: EmitConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(
            config,
            EmitConfig::new()
                .with_discovery(BitDiscovery::Referenced)
                .with_indent_width(2)
                .with_default_loop_var("idx")
                .with_simulator("backend")
        );
    }

    #[test]
    fn test_partial_yaml_config_keeps_defaults() {
        let config: EmitConfig = serde_yaml_ng::from_str("indent_width: 8\n").unwrap();
        assert_eq!(config.indent_width, 8);
        assert_eq!(config.discovery, BitDiscovery::Declared);
        assert_eq!(config.simulator, "sim");
    }

    #[test]
    fn test_unknown_discovery_in_yaml_rejected() {
        let result: Result<EmitConfig, _> = serde_yaml_ng::from_str("discovery: sorted\n");
        assert!(result.is_err());
    }
}

// ============================================================================
// Binary invocation
// ============================================================================

mod binary {
    use std::fs;
    use std::path::Path;
    use std::process::{Command, Output};

    use super::{BELL, BELL_OUTPUT};

    fn simcall(args: &[&str], cwd: &Path) -> Output {
        Command::new(env!("CARGO_BIN_EXE_simcall"))
            .args(args)
            .current_dir(cwd)
            .env_remove("RUST_LOG")
            .output()
            .unwrap()
    }

    fn stdout(output: &Output) -> String {
        String::from_utf8(output.stdout.clone()).unwrap()
    }

    fn stderr(output: &Output) -> String {
        String::from_utf8(output.stderr.clone()).unwrap()
    }

    #[test]
    fn test_emit_to_stdout() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bell.qasm"), BELL).unwrap();

        let output = simcall(&["emit", "bell.qasm"], dir.path());
        assert!(output.status.success(), "{}", stderr(&output));
        assert_eq!(stdout(&output), BELL_OUTPUT);
    }

    #[test]
    fn test_emit_to_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bell.qasm"), BELL).unwrap();

        let output = simcall(&["emit", "bell.qasm", "-o", "bell.sim"], dir.path());
        assert!(output.status.success(), "{}", stderr(&output));
        assert!(stdout(&output).is_empty());
        assert_eq!(fs::read_to_string(dir.path().join("bell.sim")).unwrap(), BELL_OUTPUT);
    }

    #[test]
    fn test_emit_batch_to_out_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bell.qasm"), BELL).unwrap();
        fs::write(
            dir.path().join("flip.qasm3"),
            "OPENQASM 3.0;\nqubit[1] q;\nx q[0];\n",
        )
        .unwrap();

        let output = simcall(&["emit", "bell.qasm", "flip.qasm3", "--out-dir", "out"], dir.path());
        assert!(output.status.success(), "{}", stderr(&output));

        let out = dir.path().join("out");
        assert_eq!(fs::read_to_string(out.join("bell.sim")).unwrap(), BELL_OUTPUT);
        assert_eq!(
            fs::read_to_string(out.join("flip.sim")).unwrap(),
            "sim.set_num_qubits(1);\nsim.set_num_clbits(0);\nsim.gate_x({0}, {}, {});\n"
        );
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("loop.qasm"),
            "OPENQASM 3.0;\nqubit[1] q;\nfor int i in [0:1] { x q[0]; }\n",
        )
        .unwrap();
        fs::write(dir.path().join("simcall.yaml"), "indent_width: 8\nsimulator: dev\n").unwrap();

        let output = simcall(
            &["emit", "loop.qasm", "--config", "simcall.yaml", "--indent", "2"],
            dir.path(),
        );
        assert!(output.status.success(), "{}", stderr(&output));
        assert_eq!(
            stdout(&output),
            "dev.set_num_qubits(1);\n\
             dev.set_num_clbits(0);\n\
             for (int i = 0; i < 2; ++i) {\n  \
             dev.gate_x({0}, {}, {});\n\
             }\n"
        );
    }

    #[test]
    fn test_emit_json_circuit_input() {
        use simcall_ir::{Circuit, CircuitBuilder};

        let mut circuit = Circuit::new("json_input");
        let q = circuit.add_qreg("q", 1).unwrap();
        circuit.h(&q[0]).unwrap();

        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("circuit.json"), circuit.to_json().unwrap()).unwrap();

        let output = simcall(&["emit", "circuit.json"], dir.path());
        assert!(output.status.success(), "{}", stderr(&output));
        assert!(stdout(&output).ends_with("sim.gate_h({0}, {}, {});\n"));
    }

    #[test]
    fn test_emit_json_format() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bell.qasm"), BELL).unwrap();

        let output = simcall(&["emit", "bell.qasm", "--format", "json"], dir.path());
        assert!(output.status.success(), "{}", stderr(&output));
        let text = stdout(&output);
        assert!(text.trim_start().starts_with('{'));
        assert!(text.contains("\"calls\""));
    }

    #[test]
    fn test_failed_batch_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bell.qasm"), BELL).unwrap();
        fs::write(dir.path().join("broken.qasm"), "OPENQASM 3.0;\nqubit[1] q;\nh r[0];\n").unwrap();

        let output = simcall(&["emit", "bell.qasm", "broken.qasm", "--out-dir", "out"], dir.path());
        assert_eq!(output.status.code(), Some(1));
        assert!(stderr(&output).contains("Error:"));
        assert!(stderr(&output).contains("broken.qasm"));
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let output = simcall(&["emit", "nope.qasm"], dir.path());
        assert_eq!(output.status.code(), Some(1));
        assert!(stderr(&output).contains("File not found"));
    }

    #[test]
    fn test_directive_fails_compilation() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("barrier.qasm"),
            "OPENQASM 3.0;\nqubit[2] q;\nbarrier q;\n",
        )
        .unwrap();

        let output = simcall(&["emit", "barrier.qasm"], dir.path());
        assert_eq!(output.status.code(), Some(1));
        assert!(stderr(&output).contains("Unknown operation 'barrier' at ops[0]"));
        assert!(stdout(&output).is_empty());
    }

    #[test]
    fn test_inspect_lists_numbering() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("regs.qasm"),
            "OPENQASM 3.0;\nqubit[2] a;\nqubit[1] b;\nbit[1] c;\nx b[0];\n",
        )
        .unwrap();

        let output = simcall(&["inspect", "regs.qasm", "--discovery", "referenced"], dir.path());
        assert!(output.status.success(), "{}", stderr(&output));
        let text = stdout(&output);
        assert!(text.contains("qubit[2] a"));
        assert!(text.contains("Qubit numbering (referenced, 1 total)"));
        assert!(text.contains("0 -> b[0]"));
    }

    #[test]
    fn test_version() {
        let dir = tempfile::tempdir().unwrap();
        let output = simcall(&["version"], dir.path());
        assert!(output.status.success());
        assert!(stdout(&output).contains(env!("CARGO_PKG_VERSION")));
    }
}
