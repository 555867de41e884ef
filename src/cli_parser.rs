// Copyright 2024-2026 ctx-stage Contributors
// SPDX-License-Identifier: Apache-2.0

//! CLI argument parsing and help text for ctx-stage.

use std::path::PathBuf;

/// Arguments of `ctx-stage plan`.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanArgs {
    pub context: PathBuf,
    pub template: PathBuf,
    pub container: usize,
    pub env: Option<String>,
    pub config: Option<PathBuf>,
}

/// Parse the arguments following `plan`.
pub fn parse_plan_args(args: &[String]) -> Result<PlanArgs, String> {
    let mut context = None;
    let mut template = None;
    let mut container = 0usize;
    let mut env = None;
    let mut config = None;

    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        let value = || {
            args.get(i + 1)
                .cloned()
                .ok_or_else(|| format!("Missing value for {}", flag))
        };
        match flag {
            "--context" => context = Some(PathBuf::from(value()?)),
            "--template" => template = Some(PathBuf::from(value()?)),
            "--container" => {
                let raw = value()?;
                container = raw
                    .parse()
                    .map_err(|_| format!("Invalid container index: {}", raw))?;
            }
            "--env" => env = Some(value()?),
            "--config" => config = Some(PathBuf::from(value()?)),
            _ => return Err(format!("Unknown argument: {}", flag)),
        }
        i += 2;
    }

    Ok(PlanArgs {
        context: context.ok_or("Missing --context")?,
        template: template.ok_or("Missing --template")?,
        container,
        env,
        config,
    })
}

/// Print general usage information.
pub fn print_usage() {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!(
        "ctx-stage - build context staging planner v{}

USAGE:
    ctx-stage [COMMAND] [OPTIONS]

COMMANDS:
    plan         Stage a build context into a pod template
    resolve      Resolve a path inside a directory without escaping it
    kinds        List supported context kinds and plugin labels
    config       Manage configuration (show, defaults, validate)
    version      Show version information
    help         Show this help message

EXAMPLES:
    ctx-stage plan --context ctx.json --template pod.json
    ctx-stage plan --context ctx.json --template pod.json --container 1 --env BUILD_CONTEXT
    ctx-stage resolve /workspace src/app
    ctx-stage kinds --json
    ctx-stage config validate

ENVIRONMENT:
    CTX_STAGE_CONFIG           Configuration file (TOML)
    CTX_STAGE_HELPER_IMAGE     Image run by generated init containers
    CTX_STAGE_HELPER_HOME      Home directory of the helper user
    CTX_STAGE_RESOURCE_PREFIX  Prefix of generated volume and container names
    CTX_STAGE_LOG_JSON         Log as JSON (1, true, yes)
    RUST_LOG                   Log level (debug, info, warn, error)

EXIT CODES:
    0  Success
    1  Failure
    2  Configuration or usage error
",
        version
    );
}

/// Print detailed help for a specific command.
pub fn print_command_help(command: &str) {
    match command {
        "plan" => print_plan_help(),
        "resolve" => print_resolve_help(),
        "kinds" => print_kinds_help(),
        "config" => print_config_help(),
        _ => {
            eprintln!(
                "No detailed help available for '{}'. Use 'ctx-stage help' for general usage.",
                command
            );
        }
    }
}

fn print_plan_help() {
    eprintln!(
        "ctx-stage plan - Stage a build context into a pod template

USAGE:
    ctx-stage plan --context FILE --template FILE [OPTIONS]

OPTIONS:
    --context FILE    Context section of the build job (JSON)
    --template FILE   Pod spec to extend (JSON)
    --container N     Index of the main container that reads the context (default 0)
    --env NAME        Also set NAME to the context path in that container
    --config FILE     Load configuration from file

OUTPUT:
    JSON object with `contextPath` and the updated `podSpec` on stdout.
"
    );
}

fn print_resolve_help() {
    eprintln!(
        "ctx-stage resolve - Resolve a path inside a directory

USAGE:
    ctx-stage resolve BASE RELATIVE

DESCRIPTION:
    Follows symlinks on the local filesystem and fails if the result would
    leave BASE.
"
    );
}

fn print_kinds_help() {
    eprintln!(
        "ctx-stage kinds - List supported context kinds

USAGE:
    ctx-stage kinds [--json]
"
    );
}

fn print_config_help() {
    eprintln!(
        "ctx-stage config - Manage configuration

USAGE:
    ctx-stage config [show|defaults|validate] [--config FILE]

SUBCOMMANDS:
    show      Print the effective configuration (TOML)
    defaults  Print the default configuration (TOML)
    validate  Check the effective configuration
"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_plan_args_full() {
        let parsed = parse_plan_args(&args(&[
            "--context", "ctx.json", "--template", "pod.json", "--container", "2", "--env",
            "BUILD_CONTEXT",
        ]))
        .unwrap();
        assert_eq!(parsed.context, PathBuf::from("ctx.json"));
        assert_eq!(parsed.template, PathBuf::from("pod.json"));
        assert_eq!(parsed.container, 2);
        assert_eq!(parsed.env.as_deref(), Some("BUILD_CONTEXT"));
        assert!(parsed.config.is_none());
    }

    #[test]
    fn test_parse_plan_args_errors() {
        assert!(parse_plan_args(&args(&["--template", "pod.json"])).is_err());
        assert!(parse_plan_args(&args(&["--context"])).is_err());
        assert!(parse_plan_args(&args(&[
            "--context", "c", "--template", "t", "--container", "x"
        ]))
        .is_err());
        assert!(parse_plan_args(&args(&["--bogus", "1"])).is_err());
    }
}
