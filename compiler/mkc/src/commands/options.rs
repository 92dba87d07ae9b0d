//! Options shared by `explain` and `eval`.

use std::path::PathBuf;

use mk_shell::{parse_shell_date, ShellConfig};

use super::CliError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CliOptions {
    /// Directory commands run in and the index scans.
    pub root: PathBuf,
    /// `--var` definitions, in order.
    pub vars: Vec<(String, String)>,
    pub config: ShellConfig,
    /// Command text; positional arguments joined by spaces.
    pub command: String,
}

impl Default for CliOptions {
    fn default() -> Self {
        CliOptions {
            root: PathBuf::from("."),
            vars: Vec::new(),
            config: ShellConfig::default(),
            command: String::new(),
        }
    }
}

fn definition(text: &str) -> Result<(String, String), CliError> {
    match text.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(CliError::BadDefinition(text.to_string())),
    }
}

/// Parse the arguments following the subcommand name.
pub fn parse_options(args: &[String]) -> Result<CliOptions, CliError> {
    let mut options = CliOptions::default();
    let mut leaf_names = Vec::new();
    let mut words = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if let Some(ts) = arg.strip_prefix("--shell-date=") {
            options.config = options.config.with_shell_date(parse_shell_date(ts)?);
        } else if let Some(name) = arg.strip_prefix("--leaf-name=") {
            leaf_names.push(name.to_string());
        } else if let Some(root) = arg.strip_prefix("--root=") {
            options.root = PathBuf::from(root);
        } else if let Some(def) = arg.strip_prefix("--var=") {
            options.vars.push(definition(def)?);
        } else if arg == "--var" {
            let def = iter
                .next()
                .ok_or_else(|| CliError::MissingValue(arg.clone()))?;
            options.vars.push(definition(def)?);
        } else if arg == "--" {
            words.extend(iter.by_ref().cloned());
        } else if arg.starts_with("--") {
            return Err(CliError::UnknownOption(arg.clone()));
        } else {
            words.push(arg.clone());
        }
    }

    if !leaf_names.is_empty() {
        options.config = options.config.with_leaf_names(leaf_names);
    }
    if words.is_empty() {
        return Err(CliError::MissingCommand);
    }
    options.command = words.join(" ");
    Ok(options)
}
