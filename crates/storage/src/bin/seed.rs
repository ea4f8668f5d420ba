use std::fmt;
use std::path::PathBuf;

use quiz_core::model::{AnswerValue, Difficulty, Question, QuestionKind};
use storage::json::render_bank;
use storage::repository::validate_pool;

#[derive(Debug, Clone)]
struct Args {
    out: PathBuf,
    per_tier: u32,
    category: Option<String>,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidOut { raw: String },
    InvalidPerTier { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidOut { raw } => write!(f, "invalid --out value: {raw}"),
            ArgsError::InvalidPerTier { raw } => write!(f, "invalid --per-tier value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut out = std::env::var("QUIZ_QUESTIONS")
            .map_or_else(|_| PathBuf::from("questions.json"), PathBuf::from);
        let mut per_tier = std::env::var("QUIZ_SEED_PER_TIER")
            .ok()
            .and_then(|value| value.parse::<u32>().ok())
            .unwrap_or(4);
        let mut category = None;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--out" => {
                    let value = require_value(&mut args, "--out")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidOut { raw: value });
                    }
                    out = PathBuf::from(value);
                }
                "--per-tier" => {
                    let value = require_value(&mut args, "--per-tier")?;
                    per_tier = value
                        .parse::<u32>()
                        .map_err(|_| ArgsError::InvalidPerTier { raw: value.clone() })?;
                }
                "--category" => {
                    category = Some(require_value(&mut args, "--category")?);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            out,
            per_tier,
            category,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --out <path>              Where to write the bank (default: questions.json)");
    eprintln!("  --per-tier <n>            Questions generated per difficulty tier (default: 4)");
    eprintln!("  --category <name>         Category stamped on every question");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  QUIZ_QUESTIONS, QUIZ_SEED_PER_TIER");
}

/// Cycle through the four question kinds so a bank exercises every answer shape.
fn sample_question(tier: Difficulty, n: u32, category: Option<&str>) -> Question {
    let id = format!("{tier}-{n}");
    let question = match n % 4 {
        0 => Question::new(
            id,
            format!("[{tier}] Statement #{n} is true."),
            QuestionKind::TrueFalse,
            tier,
            AnswerValue::scalar("true"),
        )
        .with_options(["true", "false"]),
        1 => Question::new(
            id,
            format!("[{tier}] Which options are even? (#{n})"),
            QuestionKind::MultipleChoice,
            tier,
            AnswerValue::list(["2", "4"]),
        )
        .with_options(["1", "2", "3", "4"]),
        2 => Question::new(
            id,
            format!("[{tier}] Put the steps in order. (#{n})"),
            QuestionKind::Ordering,
            tier,
            AnswerValue::list(["plan", "build", "test"]),
        )
        .with_options(["test", "plan", "build"]),
        _ => Question::new(
            id,
            format!("[{tier}] Match each term to its layer. (#{n})"),
            QuestionKind::Matching,
            tier,
            AnswerValue::mapping([("tcp", "transport"), ("ip", "network")]),
        )
        .with_options(["tcp", "ip", "transport", "network"]),
    };
    let question = question.with_estimated_secs(30 + 15 * (n % 4));
    match category {
        Some(name) => question.with_category(name),
        None => question,
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let questions: Vec<Question> = Difficulty::ALL
        .into_iter()
        .flat_map(|tier| {
            let category = args.category.as_deref();
            (0..args.per_tier).map(move |n| sample_question(tier, n, category))
        })
        .collect();
    validate_pool(&questions)?;

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&args.out, render_bank(&questions)?)?;

    eprintln!(
        "seed: wrote {} questions to {}",
        questions.len(),
        args.out.display()
    );
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
