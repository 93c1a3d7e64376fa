use clap::Args;
use serde::Serialize;
use std::path::{Path, PathBuf};

use textpatch::defaults::{self, GENERATED_PATTERN};
use textpatch::patch::{self, PatchReport, PatchRule, PatchSpec};

use crate::commands::CmdResult;

#[derive(Args, Default, Debug)]
pub struct RunArgs {
    /// Directory to patch (default: current directory)
    #[arg(long)]
    pub root: Option<String>,
    /// File name pattern, e.g. '*.cs'
    #[arg(long, conflicts_with = "generated")]
    pub pattern: Option<String>,
    /// Only patch generated bindings (*.gen.cs)
    #[arg(long)]
    pub generated: bool,
    /// Literal to search for
    #[arg(long)]
    pub search: Option<String>,
    /// Literal to replace it with
    #[arg(long)]
    pub replace: Option<String>,
    /// Directory name to skip at any depth (repeatable)
    #[arg(long = "skip-dir", value_name = "NAME")]
    pub skip_dirs: Vec<String>,
    /// Count matches without writing anything
    #[arg(long)]
    pub dry_run: bool,
    /// Print every visited file to stderr
    #[arg(short, long)]
    pub verbose: bool,
    /// Config file to use instead of the global textpatch.json
    #[arg(long)]
    pub config: Option<String>,
}

#[derive(Serialize)]
#[serde(tag = "command")]
pub enum RunOutput {
    #[serde(rename = "run")]
    Run {
        #[serde(flatten)]
        report: PatchReport,
    },
}

pub fn run(args: RunArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<RunOutput> {
    let spec = resolve_spec(&args)?;
    let report = patch::run(&spec)?;

    Ok((RunOutput::Run { report }, 0))
}

/// Merge flags over config over built-in defaults.
pub(crate) fn resolve_spec(args: &RunArgs) -> textpatch::Result<PatchSpec> {
    let config = match &args.config {
        Some(path) => defaults::load_config_from(Path::new(path))?,
        None => defaults::load_config(),
    };
    let base = config.defaults;

    let pattern = if args.generated {
        GENERATED_PATTERN.to_string()
    } else {
        args.pattern.clone().unwrap_or(base.pattern)
    };

    let search = args.search.clone().unwrap_or(base.search);
    let replace = args.replace.clone().unwrap_or(base.replace);
    let rule = PatchRule::new(&search, &replace)?;

    let root = match &args.root {
        Some(root) => PathBuf::from(shellexpand::tilde(root).as_ref()),
        None => std::env::current_dir().map_err(|e| {
            textpatch::Error::internal_io(e.to_string(), Some("resolve current directory".to_string()))
        })?,
    };

    let mut skip_dirs = base.skip_dirs;
    skip_dirs.extend(args.skip_dirs.iter().cloned());

    let mut spec = PatchSpec::new(root, &pattern, rule);
    spec.skip_dirs = skip_dirs;
    spec.dry_run = args.dry_run;
    spec.verbose = args.verbose;

    Ok(spec)
}
