use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use rb_core::Provider;
use rb_runner::{EvaluateRequest, Runner};

#[derive(Parser)]
#[command(name = "recipe-bench", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate a task's cases and write a run summary
    #[command(alias = "run")]
    Evaluate {
        #[arg(long)]
        task: String,
        /// `all` or comma-separated case ids
        #[arg(long, default_value = "all")]
        cases: String,
        /// Recipe file (.poml or .md)
        #[arg(long)]
        recipe: Option<PathBuf>,
        #[arg(long, value_parser = parse_provider)]
        provider: Option<Provider>,
        #[arg(long)]
        model: Option<String>,
        /// Comma-separated variant ids
        #[arg(long)]
        variants: Option<String>,
        /// Summary path; defaults to bench/<task>/results/results_<timestamp>.json
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Rebuild the lockfile from every run summary under the bench root
    Aggregate,
}

fn parse_provider(s: &str) -> Result<Provider, String> {
    Provider::parse(s).ok_or_else(|| {
        let names: Vec<_> = Provider::ALL.iter().map(|p| p.as_str()).collect();
        format!("unknown provider '{s}' (expected one of: {})", names.join(", "))
    })
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let repo_root = std::env::current_dir()?;

    match cli.cmd {
        Command::Evaluate { task, cases, recipe, provider, model, variants, output } => {
            let r = Runner::open(repo_root)?;
            let req = EvaluateRequest { cases, recipe, provider, model, variants, output, ..EvaluateRequest::new(task) };
            let out = r.evaluate(&req)?;
            println!(
                "{}",
                json!({
                    "output": out.output.display().to_string(),
                    "accuracy": out.summary.totals.accuracy,
                    "cases": out.summary.totals.cases,
                    "passed": out.summary.totals.passed,
                })
            );
        }
        Command::Aggregate => {
            // aggregation never fails the process
            match Runner::open(repo_root).and_then(|r| r.aggregate()) {
                Ok(out) => println!(
                    "{}",
                    json!({
                        "lockfile": out.lockfile.display().to_string(),
                        "bench_count": out.bench_count,
                    })
                ),
                Err(e) => tracing::error!("aggregate failed: {e:#}"),
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_is_an_alias_for_evaluate() {
        let cli = Cli::try_parse_from(["recipe-bench", "run", "--task", "t", "--provider", "gemini"]).unwrap();
        match cli.cmd {
            Command::Evaluate { task, cases, provider, .. } => {
                assert_eq!(task, "t");
                assert_eq!(cases, "all");
                assert_eq!(provider, Some(Provider::Gemini));
            }
            Command::Aggregate => panic!("expected evaluate"),
        }
    }

    #[test]
    fn unknown_provider_is_rejected() {
        assert!(Cli::try_parse_from(["recipe-bench", "evaluate", "--task", "t", "--provider", "claude"]).is_err());
    }
}
