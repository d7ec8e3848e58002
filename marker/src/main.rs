use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;

use marker::bulk::{bulk_grade, default_delay};
use marker::feedback::personalized::generate_personalized_feedback;
use marker::grading::GradingJob;
use marker::llm::OpenAiClient;
use marker::parsers::grade_parser::GradeParser;
use marker::report::{GradingReport, GradingReportResponse};
use marker::types::{Assignment, Submission};

#[derive(Parser, Debug)]
#[command(version, about = "Grade submissions with an LLM and interpret its answers")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interpret a saved grading response without calling the API
    Interpret {
        /// Assignment JSON (title, total_points, rubric, ...)
        #[arg(long)]
        assignment: PathBuf,
        /// Plain-text grading response
        #[arg(long)]
        response: PathBuf,
        /// Submission id to put in the report
        #[arg(long, default_value = "offline")]
        submission_id: String,
    },
    /// Grade one submission with the configured model
    Grade {
        #[arg(long)]
        assignment: PathBuf,
        /// Submission JSON
        #[arg(long)]
        submission: PathBuf,
    },
    /// Grade every ungraded submission in a JSON array
    Bulk {
        #[arg(long)]
        assignment: PathBuf,
        #[arg(long)]
        submissions: PathBuf,
        /// Pause between calls in milliseconds (defaults to BULK_GRADING_DELAY_MS)
        #[arg(long)]
        delay_ms: Option<u64>,
    },
    /// Generate personalised feedback for a graded submission
    Feedback {
        #[arg(long)]
        assignment: PathBuf,
        #[arg(long)]
        submission: PathBuf,
    },
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value).context("serializing output")?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let _log_guard = util::logging::init_logging();
    let args = Args::parse();

    match args.command {
        Command::Interpret {
            assignment,
            response,
            submission_id,
        } => {
            let assignment: Assignment = read_json(&assignment)?;
            let text = fs::read_to_string(&response)
                .with_context(|| format!("reading {}", response.display()))?;
            let interpretation =
                GradeParser::new(&assignment.rubric, assignment.total_points).parse(&text);
            let report =
                GradingReport::from_interpretation(&submission_id, assignment.total_points, &interpretation);
            print_json(&GradingReportResponse::from(report))
        }
        Command::Grade {
            assignment,
            submission,
        } => {
            let assignment: Assignment = read_json(&assignment)?;
            let submission: Submission = read_json(&submission)?;
            let client = OpenAiClient::from_config().context("configuring AI client")?;
            let graded = GradingJob::new(&assignment, submission)
                .run(&client)
                .await
                .context("AI grading failed")?;
            print_json(&GradingReportResponse::from(graded.report(&assignment)))
        }
        Command::Bulk {
            assignment,
            submissions,
            delay_ms,
        } => {
            let assignment: Assignment = read_json(&assignment)?;
            let submissions: Vec<Submission> = read_json(&submissions)?;
            let delay = delay_ms
                .map(std::time::Duration::from_millis)
                .unwrap_or_else(default_delay);
            let client = OpenAiClient::from_config().context("configuring AI client")?;
            let summary = bulk_grade(&client, &assignment, submissions, delay)
                .await
                .context("bulk AI grading failed")?;
            eprintln!("{}", summary.message());
            print_json(&summary)
        }
        Command::Feedback {
            assignment,
            submission,
        } => {
            let assignment: Assignment = read_json(&assignment)?;
            let submission: Submission = read_json(&submission)?;
            let client = OpenAiClient::from_config().context("configuring AI client")?;
            let feedback = generate_personalized_feedback(&client, &assignment, &submission)
                .await
                .context("AI feedback failed")?;
            print_json(&feedback)
        }
    }
}
