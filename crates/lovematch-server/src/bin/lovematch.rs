use std::io::{self, Write};
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use lovematch_core::{breakdown, ScoreBreakdown, Verdict};
use lovematch_server::logging::{self, LogFormat};
use lovematch_storage::LazyRecordSink;
use serde_json::json;

#[derive(Debug, Parser)]
#[command(name = "lovematch", version, about = "Name compatibility scores from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score two names without recording anything
    Score {
        name1: String,
        name2: String,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
        /// Show the intermediate factors
        #[arg(long)]
        explain: bool,
    },
    /// Connect to the record store and report what it holds
    CheckStore {
        #[arg(long, env = "LOVEMATCH_DB_URL", hide_env_values = true)]
        url: String,
        #[arg(long, default_value_t = 5_000)]
        timeout_ms: u64,
    },
}

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    logging::init(LogFormat::from_env());

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Score {
            name1,
            name2,
            json,
            explain,
        } => run_score(&name1, &name2, json, explain),
        Command::CheckStore { url, timeout_ms } => run_check_store(&url, timeout_ms),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            let _ = writeln!(io::stderr(), "lovematch: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_score(name1: &str, name2: &str, as_json: bool, explain: bool) -> io::Result<ExitCode> {
    let detail = breakdown(name1, name2);
    let score = detail.score();
    let verdict = Verdict::for_score(score);
    let mut out = io::stdout().lock();

    if as_json {
        let mut value = json!({
            "name1": name1,
            "name2": name2,
            "compatibility": score,
            "verdict": verdict.label(),
            "message": verdict.message(),
        });
        if explain {
            value["explain"] = explain_json(&detail);
        }
        writeln!(out, "{value}")?;
        return Ok(ExitCode::SUCCESS);
    }

    writeln!(out, "{name1} + {name2}: {score}%")?;
    writeln!(out, "{}", verdict.message())?;
    if explain {
        match &detail {
            ScoreBreakdown::Override { rule } => {
                writeln!(out, "  override: {} + {}", rule.first, rule.second)?;
            }
            ScoreBreakdown::Formula {
                letter_scores,
                diff,
                diff_factor,
                common_letters,
                total_unique_letters,
                common_factor,
                ..
            } => {
                writeln!(
                    out,
                    "  letter scores {} / {} (diff {diff}) -> diff factor {diff_factor}",
                    letter_scores.0, letter_scores.1
                )?;
                writeln!(
                    out,
                    "  {common_letters} of {total_unique_letters} letters shared -> common factor {common_factor}"
                )?;
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn explain_json(detail: &ScoreBreakdown) -> serde_json::Value {
    match detail {
        ScoreBreakdown::Override { rule } => json!({
            "override": [rule.first, rule.second],
        }),
        ScoreBreakdown::Formula {
            letter_scores,
            diff,
            diff_factor,
            common_letters,
            total_unique_letters,
            common_factor,
            ..
        } => json!({
            "letter_scores": [letter_scores.0, letter_scores.1],
            "diff": diff,
            "diff_factor": diff_factor,
            "common_letters": common_letters,
            "total_unique_letters": total_unique_letters,
            "common_factor": common_factor,
        }),
    }
}

fn run_check_store(url: &str, timeout_ms: u64) -> io::Result<ExitCode> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let sink = LazyRecordSink::from_url(url, Duration::from_millis(timeout_ms.max(1)));

    let outcome = runtime.block_on(async {
        let handle = sink.handle().await?;
        let count = sink.count().await?;
        Ok::<_, lovematch_storage::StorageError>((handle.stats(), count))
    });

    let mut out = io::stdout().lock();
    match outcome {
        Ok((stats, count)) => {
            writeln!(out, "connected to {}", sink.label())?;
            writeln!(out, "{}", json!({"store": stats, "records": count}))?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            writeln!(io::stderr(), "failed to connect to {}: {err}", sink.label())?;
            Ok(ExitCode::FAILURE)
        }
    }
}
