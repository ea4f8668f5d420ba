mod commands;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use quiz_core::model::{DifficultyFilter, SessionState, SimulatorConfig};
use services::{Clock, SessionManager, SimulatorLoader, TokioTicker, format_clock};
use storage::JsonFileQuestionSource;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::commands::{Command, HELP, parse_command};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDifficulty { raw: String },
    InvalidNumber { flag: &'static str, raw: String },
    InvalidPath { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDifficulty { raw } => write!(f, "invalid --difficulty value: {raw}"),
            ArgsError::InvalidNumber { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
            ArgsError::InvalidPath { raw } => write!(f, "invalid --questions value: {raw}"),
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

fn parse_number<T: std::str::FromStr>(raw: String, flag: &'static str) -> Result<T, ArgsError> {
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidNumber { flag, raw })
}

fn parse_difficulty(raw: String) -> Result<DifficultyFilter, ArgsError> {
    raw.parse()
        .map_err(|_| ArgsError::InvalidDifficulty { raw })
}

struct Args {
    questions: PathBuf,
    difficulty: DifficultyFilter,
    count: u32,
    minutes: u32,
    category: Option<String>,
    seed: Option<u64>,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!(
        "  cargo run -p app -- [--questions <path>] [--difficulty <all|basic|intermediate|advanced>]"
    );
    eprintln!("                     [--count <n>] [--minutes <n>] [--category <name>] [--seed <n>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --questions questions.json");
    eprintln!("  --difficulty all");
    eprintln!("  --count {}", SimulatorConfig::DEFAULT_QUESTION_COUNT);
    eprintln!("  --minutes {}", SimulatorConfig::DEFAULT_DURATION_MINUTES);
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_QUESTIONS, QUIZ_DIFFICULTY, QUIZ_COUNT, QUIZ_MINUTES, RUST_LOG");
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut questions = std::env::var("QUIZ_QUESTIONS")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map_or_else(|| PathBuf::from("questions.json"), PathBuf::from);
        let mut difficulty = match std::env::var("QUIZ_DIFFICULTY") {
            Ok(value) => parse_difficulty(value)?,
            Err(_) => DifficultyFilter::All,
        };
        let mut count = match std::env::var("QUIZ_COUNT") {
            Ok(value) => parse_number(value, "QUIZ_COUNT")?,
            Err(_) => SimulatorConfig::DEFAULT_QUESTION_COUNT,
        };
        let mut minutes = match std::env::var("QUIZ_MINUTES") {
            Ok(value) => parse_number(value, "QUIZ_MINUTES")?,
            Err(_) => SimulatorConfig::DEFAULT_DURATION_MINUTES,
        };
        let mut category = None;
        let mut seed = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--questions" => {
                    let value = require_value(args, "--questions")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidPath { raw: value });
                    }
                    questions = PathBuf::from(value);
                }
                "--difficulty" => {
                    difficulty = parse_difficulty(require_value(args, "--difficulty")?)?;
                }
                "--count" => count = parse_number(require_value(args, "--count")?, "--count")?,
                "--minutes" => {
                    minutes = parse_number(require_value(args, "--minutes")?, "--minutes")?;
                }
                "--category" => category = Some(require_value(args, "--category")?),
                "--seed" => seed = Some(parse_number(require_value(args, "--seed")?, "--seed")?),
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            questions,
            difficulty,
            count,
            minutes,
            category,
            seed,
        })
    }
}

/// Logs go to stderr so the question display on stdout stays clean.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn print_question(session: &SessionManager) {
    let snapshot = session.snapshot();
    let Some(question) = snapshot.current_question else {
        println!("[{}] no question to show", snapshot.state);
        return;
    };

    println!();
    println!(
        "Question {}/{}  [{}]  remaining {}  answered {}/{}",
        snapshot.current_index + 1,
        snapshot.total,
        question.difficulty,
        snapshot.remaining_clock,
        snapshot.answered,
        snapshot.total,
    );
    println!("{}", question.prompt);
    for (i, option) in question.options.iter().enumerate() {
        println!("  {}. {option}", i + 1);
    }
    if let Some(answer) = session.answer_for(&question.id) {
        match serde_json::to_string(&answer.value) {
            Ok(raw) => println!("  (your answer: {raw})"),
            Err(_) => println!("  (answered)"),
        }
    }
}

fn print_results(session: &SessionManager) -> Result<(), serde_json::Error> {
    println!();
    println!("Review:");
    for (i, review) in session.question_reviews().iter().enumerate() {
        let mark = match (review.is_answered(), review.is_correct) {
            (false, _) => "-",
            (true, true) => "+",
            (true, false) => "x",
        };
        println!(
            "  {mark} {:>2}. {}  (expected {})",
            i + 1,
            review.prompt,
            serde_json::to_string(&review.correct_answer)?
        );
    }
    println!();
    println!("{}", serde_json::to_string_pretty(&session.generate_report())?);
    Ok(())
}

/// Outcome of handling one line of input.
enum Flow {
    Continue,
    Finished,
    Quit,
}

fn apply(session: &mut SessionManager, command: Command) -> Flow {
    match command {
        Command::Next => session.next(),
        Command::Previous => session.previous(),
        Command::GoTo(index) => {
            if index >= session.total_questions() {
                println!("no question {}", index + 1);
                return Flow::Continue;
            }
            session.go_to(index);
        }
        Command::Answer(value) => {
            session.submit_answer(value);
            if session.state().is_active() {
                session.next();
            }
        }
        Command::Pause => {
            session.pause();
            println!("paused at {}", format_clock(session.remaining_secs()));
            return Flow::Continue;
        }
        Command::Resume => session.resume(),
        Command::Finish => {
            session.finalize();
            return Flow::Finished;
        }
        Command::Status => {}
        Command::Help => {
            println!("{HELP}");
            return Flow::Continue;
        }
        Command::Quit => return Flow::Quit,
    }
    print_question(session);
    Flow::Continue
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let parsed = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    init_logging();

    let mut config = SimulatorConfig::new(parsed.difficulty, parsed.count, parsed.minutes)?;
    if let Some(category) = parsed.category {
        config = config.with_category(category);
    }

    let source = Arc::new(JsonFileQuestionSource::new(&parsed.questions));
    let bank_path = source.path().display().to_string();
    let loader = SimulatorLoader::new(Clock::default_clock(), source).with_seed(parsed.seed);
    let (ticker, mut ticks) = TokioTicker::new();
    let mut session = loader.prepare(config, ticker).await?;

    session.start();
    info!(
        questions = session.total_questions(),
        path = %bank_path,
        "attempt started"
    );
    println!("{HELP}");
    print_question(&session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            Some(handle) = ticks.recv() => {
                if session.on_tick(handle) == SessionState::Finished {
                    println!();
                    println!("time is up");
                    break;
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    session.finalize();
                    break;
                };
                let flow = match parse_command(&line) {
                    Ok(command) => apply(&mut session, command),
                    Err(err) => {
                        println!("{err}");
                        Flow::Continue
                    }
                };
                match flow {
                    Flow::Continue => {}
                    Flow::Finished => break,
                    Flow::Quit => {
                        println!("attempt abandoned");
                        return Ok(());
                    }
                }
            }
        }
    }

    session.review();
    print_results(&session)?;
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
