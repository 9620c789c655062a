use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{EnvFilter, fmt};

mod session;
mod sse;

use session::{Outcome, Session};

/// Asks questions through the submission gate, the way the page would.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[arg(long, default_value = "http://127.0.0.1:1313")]
    url: String,

    /// Post without waiting for answers, so the gate cancels every later question.
    #[arg(long)]
    no_wait: bool,

    #[arg(required = true)]
    questions: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let args = Args::parse();
    let mut session = Session::new(&args.url);

    let pb = ProgressBar::new(args.questions.len() as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )?
        .progress_chars("=> "),
    );

    let mut admitted = 0;
    let mut cancelled = 0;

    for question in &args.questions {
        pb.set_message(format!("Asking {question}"));

        match session.ask(question, !args.no_wait).await? {
            Outcome::Answered(answer) => {
                admitted += 1;
                pb.println(format!("{question} -> {answer}"));
            }
            Outcome::Submitted => {
                admitted += 1;
                pb.println(format!("{question} -> submitted"));
            }
            Outcome::Unanswered => {
                admitted += 1;
                pb.println(format!("{question} -> no answer before timeout"));
            }
            Outcome::Cancelled => {
                cancelled += 1;
                pb.println(format!("{question} -> cancelled by gate"));
            }
        }

        pb.inc(1);
    }

    pb.finish_with_message("Done");

    println!("\nAdmitted: {admitted}");
    println!("Cancelled: {cancelled}");
    println!("Gate open: {}", session.gate_open());

    Ok(())
}
