// SPDX-FileCopyrightText: 2026 Dialograph contributors
// SPDX-License-Identifier: LicenseRef-Dialograph-Proprietary
//
// All rights reserved.
//
// This file is part of Dialograph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Dialograph CLI entrypoint.
//!
//! Checks a saved intent graph and prints its canonical JSON on stdout. Reads stdin when no
//! file is given. Diagnostics go to stderr; `RUST_LOG` controls log verbosity.

use std::error::Error;
use std::io::Read;
use std::path::{Path, PathBuf};

use dialograph::config::EditorConfig;
use dialograph::format::{
    from_json_str, graph_json_schema, serialize, to_json_string, validate, ExportEnvelope, GraphJson,
    IntegrityMode,
};
use dialograph::ops::check_consistency;
use dialograph::store::{GraphFile, GraphSource};
use tracing_subscriber::EnvFilter;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [--config <file>] [--allow-edgeless] [--verify | --repair] [--agent <name>] [--output <file>] [<graph.json>]\n  {program} --schema\n\nReads the graph from stdin when no file is given.\n\n--allow-edgeless accepts graphs that have nodes but no edges.\n--verify rejects graphs whose context indices disagree with their edges.\n--repair rebuilds context indices from the edges instead.\n--agent wraps the output in an export envelope for that agent.\n--output saves the checked graph to a file instead of printing it.\n--schema prints the JSON schema of the graph format."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    config: Option<PathBuf>,
    allow_edgeless: bool,
    integrity: Option<IntegrityMode>,
    agent: Option<String>,
    output: Option<PathBuf>,
    schema: bool,
    graph: Option<PathBuf>,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                if options.config.is_some() {
                    return Err(());
                }
                let path = args.next().ok_or(())?;
                options.config = Some(PathBuf::from(path));
            }
            "--allow-edgeless" => {
                if options.allow_edgeless {
                    return Err(());
                }
                options.allow_edgeless = true;
            }
            "--verify" | "--repair" => {
                if options.integrity.is_some() {
                    return Err(());
                }
                options.integrity = Some(if arg == "--verify" {
                    IntegrityMode::Verify
                } else {
                    IntegrityMode::Repair
                });
            }
            "--agent" => {
                if options.agent.is_some() {
                    return Err(());
                }
                let agent = args.next().ok_or(())?;
                if agent.trim().is_empty() {
                    return Err(());
                }
                options.agent = Some(agent);
            }
            "--output" => {
                if options.output.is_some() {
                    return Err(());
                }
                let path = args.next().ok_or(())?;
                options.output = Some(PathBuf::from(path));
            }
            "--schema" => {
                if options.schema {
                    return Err(());
                }
                options.schema = true;
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.graph.is_some() {
                    return Err(());
                }
                options.graph = Some(PathBuf::from(arg));
            }
        }
    }

    if options.schema && options != (CliOptions { schema: true, ..CliOptions::default() }) {
        return Err(());
    }

    Ok(options)
}

fn editor_config(options: &CliOptions) -> Result<EditorConfig, Box<dyn Error>> {
    let mut config = match &options.config {
        Some(path) => EditorConfig::from_file(path)?,
        None => EditorConfig::default(),
    };
    if options.allow_edgeless {
        config.import.allow_edgeless = true;
    }
    if let Some(integrity) = options.integrity {
        config.import.integrity = integrity;
    }
    Ok(config)
}

fn read_payload(path: Option<&Path>) -> Result<GraphJson, Box<dyn Error>> {
    match path {
        Some(path) => GraphFile::new(path)
            .load()?
            .ok_or_else(|| format!("{}: no such file", path.display()).into()),
        None => {
            let mut json = String::new();
            std::io::stdin().read_to_string(&mut json)?;
            Ok(from_json_str(&json)?)
        }
    }
}

/// Returns `false` when the graph loaded but still breaks an invariant.
fn run(options: &CliOptions) -> Result<bool, Box<dyn Error>> {
    if options.schema {
        println!("{}", serde_json::to_string_pretty(&graph_json_schema())?);
        return Ok(true);
    }

    let config = editor_config(options)?;
    let payload = read_payload(options.graph.as_deref())?;
    let graph = validate(payload, &config.import)?;

    eprintln!(
        "{} nodes, {} edges",
        graph.nodes().len(),
        graph.edges().len()
    );
    let violations = check_consistency(&graph);
    if !violations.is_empty() {
        for violation in &violations {
            eprintln!("violation: {violation}");
        }
        return Ok(false);
    }

    if let Some(output) = &options.output {
        let file = GraphFile::new(output).with_durability(config.durability);
        match &options.agent {
            Some(agent) => file.save_envelope(&ExportEnvelope::new(agent.as_str(), &graph))?,
            None => file.save(&serialize(&graph))?,
        }
        return Ok(true);
    }

    let json = match &options.agent {
        Some(agent) => serde_json::to_string_pretty(&ExportEnvelope::new(agent.as_str(), &graph))?,
        None => to_json_string(&graph)?,
    };
    println!("{json}");
    Ok(true)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args();
    let program = args.next().unwrap_or_else(|| "dialograph".to_owned());

    let options = match parse_options(args) {
        Ok(options) => options,
        Err(()) => {
            print_usage(&program);
            std::process::exit(2);
        }
    };

    match run(&options) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use dialograph::format::IntegrityMode;

    use super::{editor_config, parse_options, CliOptions};

    fn args(values: &[&str]) -> impl Iterator<Item = String> {
        values
            .iter()
            .map(|value| (*value).to_owned())
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn parses_empty_args() {
        let options = parse_options(std::iter::empty()).expect("parse options");
        assert_eq!(options, CliOptions::default());
    }

    #[test]
    fn parses_positional_graph_and_flags_in_any_order() {
        let options = parse_options(args(&["--repair", "graph.json", "--agent", "pizza-bot"]))
            .expect("parse options");
        assert_eq!(options.graph, Some(PathBuf::from("graph.json")));
        assert_eq!(options.integrity, Some(IntegrityMode::Repair));
        assert_eq!(options.agent.as_deref(), Some("pizza-bot"));
        assert!(!options.allow_edgeless);
    }

    #[test]
    fn parses_config_and_allow_edgeless() {
        let options = parse_options(args(&["--config", "editor.json", "--allow-edgeless"]))
            .expect("parse options");
        assert_eq!(options.config, Some(PathBuf::from("editor.json")));
        assert!(options.allow_edgeless);
        assert!(options.graph.is_none());
    }

    #[test]
    fn parses_output_path() {
        let options =
            parse_options(args(&["graph.json", "--output", "out.json"])).expect("parse options");
        assert_eq!(options.output, Some(PathBuf::from("out.json")));
        parse_options(args(&["--output"])).unwrap_err();
        parse_options(args(&["--output", "a.json", "--output", "b.json"])).unwrap_err();
    }

    #[test]
    fn parses_schema_alone() {
        let options = parse_options(args(&["--schema"])).expect("parse options");
        assert!(options.schema);
    }

    #[test]
    fn rejects_schema_with_other_args() {
        parse_options(args(&["--schema", "graph.json"])).unwrap_err();
        parse_options(args(&["--verify", "--schema"])).unwrap_err();
    }

    #[test]
    fn rejects_verify_with_repair() {
        parse_options(args(&["--verify", "--repair"])).unwrap_err();
        parse_options(args(&["--verify", "--verify"])).unwrap_err();
    }

    #[test]
    fn rejects_missing_values() {
        parse_options(args(&["--config"])).unwrap_err();
        parse_options(args(&["--agent"])).unwrap_err();
        parse_options(args(&["--agent", " "])).unwrap_err();
    }

    #[test]
    fn rejects_unknown_args_and_extra_positionals() {
        parse_options(args(&["--nope"])).unwrap_err();
        parse_options(args(&["one.json", "two.json"])).unwrap_err();
    }

    #[test]
    fn flags_override_the_default_import_options() {
        let options = parse_options(args(&["--allow-edgeless", "--verify"])).expect("parse");
        let config = editor_config(&options).expect("config");
        assert!(config.import.allow_edgeless);
        assert_eq!(config.import.integrity, IntegrityMode::Verify);
    }
}
