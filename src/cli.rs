use std::path::Path;

use tracing::error;

use crate::assets::download_assets;
use crate::config::PipelineConfig;
use crate::data::fetch::HttpFetcher;
use crate::data::{filter_roster, CdragonLoader, SourceLoader};
use crate::error::Result;
use crate::pipeline::run_merge;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Merge,
    Assets,
    All,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("merge") => Some(Command::Merge),
        Some("assets") => Some(Command::Assets),
        Some("all") => Some(Command::All),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    let Some(command) = parse_command(args) else {
        eprintln!("usage: teamplanner <merge|assets|all> [config.yaml]");
        return 2;
    };

    let config = match load_config(args.get(2).map(Path::new)) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("invalid configuration: {err}");
            return 2;
        }
    };

    let result = match command {
        Command::Merge => handle_merge(&config),
        Command::Assets => handle_assets(&config),
        Command::All => handle_merge(&config).and_then(|()| handle_assets(&config)),
    };

    match result {
        Ok(()) => 0,
        Err(err) => {
            error!(error = %err, "run aborted");
            eprintln!("teamplanner failed: {err}");
            1
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    let config = match path {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    };
    config.with_env_overrides()
}

fn handle_merge(config: &PipelineConfig) -> Result<()> {
    let fetcher = HttpFetcher::new()?;
    let loader = CdragonLoader::new(config, &fetcher);
    let merged = run_merge(&loader, config)?;
    println!(
        "Found {} champions for set {}; wrote {}",
        merged.len(),
        config.content_version,
        config.output_path.display()
    );
    Ok(())
}

fn handle_assets(config: &PipelineConfig) -> Result<()> {
    let fetcher = HttpFetcher::new()?;
    let roster = CdragonLoader::new(config, &fetcher).load_roster()?;
    let active = filter_roster(&roster, &config.content_version);
    let report = download_assets(config, &fetcher, &active)?;
    println!(
        "assets: downloaded={}, skipped={}, failed={}",
        report.downloaded, report.skipped, report.failed
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_command_recognizes_subcommands() {
        assert_eq!(parse_command(&args(&["teamplanner", "merge"])), Some(Command::Merge));
        assert_eq!(parse_command(&args(&["teamplanner", "assets"])), Some(Command::Assets));
        assert_eq!(parse_command(&args(&["teamplanner", "all", "x.yaml"])), Some(Command::All));
        assert_eq!(parse_command(&args(&["teamplanner", "serve"])), None);
        assert_eq!(parse_command(&args(&["teamplanner"])), None);
    }

    #[test]
    fn run_with_args_reports_usage() {
        assert_eq!(run_with_args(&args(&["teamplanner"])), 2);
    }
}
