// Copyright 2024-2026 ctx-stage Contributors
// SPDX-License-Identifier: Apache-2.0

//! ctx-stage entry point.
//!
//! Reads a build job's context section and a pod template, stages the
//! context into the template and prints the result for the controller.

mod cli_parser;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use ctx_stage::k8s::PodSpec;
use ctx_stage::{ContextSpec, ContextStagingPlanner, PlanOutput, StagingConfig};

const EXIT_CONFIG: u8 = 2;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    match command {
        "plan" => run_plan(&args[2..]),
        "resolve" => run_resolve(&args[2..]),
        "kinds" => run_kinds(&args[2..]),
        "config" => run_config_cmd(&args[2..]),
        "help" | "--help" | "-h" => {
            if let Some(sub) = args.get(2) {
                cli_parser::print_command_help(sub);
            } else {
                cli_parser::print_usage();
            }
            ExitCode::SUCCESS
        }
        "version" | "--version" | "-V" => {
            println!("ctx-stage {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            cli_parser::print_usage();
            ExitCode::FAILURE
        }
    }
}

/// Load config and install logging; prints the error itself on failure.
fn load_config(path: Option<&Path>) -> Option<StagingConfig> {
    match StagingConfig::load(path) {
        Ok(config) => {
            ctx_stage::logging::init(&config.log);
            Some(config)
        }
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            None
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    serde_json::from_str(&content).map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
}

fn run_plan(args: &[String]) -> ExitCode {
    let plan_args = match cli_parser::parse_plan_args(args) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("{}", e);
            cli_parser::print_command_help("plan");
            return ExitCode::from(EXIT_CONFIG);
        }
    };
    let Some(config) = load_config(plan_args.config.as_deref()) else {
        return ExitCode::from(EXIT_CONFIG);
    };
    let planner = match ContextStagingPlanner::new(config) {
        Ok(planner) => planner,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    let inputs = read_json::<ContextSpec>(&plan_args.context)
        .and_then(|ctx| read_json::<PodSpec>(&plan_args.template).map(|pod| (ctx, pod)));
    let (context, pod_spec) = match inputs {
        Ok(inputs) => inputs,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let output = match PlanOutput::build(
        &planner,
        &context,
        pod_spec,
        plan_args.container,
        plan_args.env.as_deref(),
    ) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("Staging failed: {}", e);
            return ExitCode::FAILURE;
        }
    };
    match serde_json::to_string_pretty(&output) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to serialize output: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_resolve(args: &[String]) -> ExitCode {
    let (Some(base), Some(relative)) = (args.first(), args.get(1)) else {
        cli_parser::print_command_help("resolve");
        return ExitCode::from(EXIT_CONFIG);
    };
    match ctx_stage::resolve_in_filesystem(&PathBuf::from(base), relative) {
        Ok(path) => {
            println!("{}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_kinds(args: &[String]) -> ExitCode {
    let Some(config) = load_config(None) else {
        return ExitCode::from(EXIT_CONFIG);
    };
    let planner = match ContextStagingPlanner::new(config) {
        Ok(planner) => planner,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    if args.first().map(|s| s.as_str()) == Some("--json") {
        let json = serde_json::json!({
            "kinds": planner.supported_kinds(),
            "labels": planner.plugin_labels(),
        });
        println!("{}", json);
    } else {
        for kind in planner.supported_kinds() {
            println!("{:<10} {}", kind.as_str(), kind.plugin_label());
        }
    }
    ExitCode::SUCCESS
}

fn run_config_cmd(args: &[String]) -> ExitCode {
    let sub = args.first().map(|s| s.as_str()).unwrap_or("show");
    let path = match (args.get(1).map(|s| s.as_str()), args.get(2)) {
        (Some("--config"), Some(path)) => Some(PathBuf::from(path)),
        _ => None,
    };

    match sub {
        "defaults" => print_toml(&StagingConfig::default()),
        "show" => match StagingConfig::load(path.as_deref()) {
            Ok(config) => print_toml(&config),
            Err(e) => {
                eprintln!("Configuration error: {}", e);
                ExitCode::from(EXIT_CONFIG)
            }
        },
        "validate" => match StagingConfig::load(path.as_deref()) {
            Ok(_) => {
                println!("Configuration is valid");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Configuration error: {}", e);
                ExitCode::from(EXIT_CONFIG)
            }
        },
        _ => {
            eprintln!("Unknown config subcommand: {}", sub);
            cli_parser::print_command_help("config");
            ExitCode::FAILURE
        }
    }
}

fn print_toml(config: &StagingConfig) -> ExitCode {
    match config.to_toml() {
        Ok(text) => {
            print!("{}", text);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
