use std::fmt;

use quiz_core::model::AnswerValue;

/// One line typed by the user during an attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Next,
    Previous,
    /// Zero-based index; users type it one-based.
    GoTo(usize),
    Answer(AnswerValue),
    Pause,
    Resume,
    Finish,
    Status,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Empty,
    Unknown(String),
    MissingArgument { command: &'static str },
    InvalidIndex { raw: String },
    InvalidAnswer { raw: String },
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Empty => write!(f, "type a command (help lists them)"),
            CommandError::Unknown(cmd) => write!(f, "unknown command: {cmd}"),
            CommandError::MissingArgument { command } => write!(f, "{command} needs an argument"),
            CommandError::InvalidIndex { raw } => {
                write!(f, "invalid question number (1-based): {raw}")
            }
            CommandError::InvalidAnswer { raw } => write!(f, "could not parse answer: {raw}"),
        }
    }
}

impl std::error::Error for CommandError {}

pub const HELP: &str = "\
commands:
  next | n              go to the next question
  prev | p              go to the previous question
  goto <n>              jump to question n (1-based)
  answer <value> | a    answer the current question
                        plain text is a single answer,
                        [\"x\",\"y\"] is a list, {\"k\":\"v\"} is a mapping
  pause | resume        stop or restart the timer
  status | s            show the current question again
  finish                end the attempt and print the report
  quit | q              leave without a report";

/// Parse one input line.
///
/// # Errors
///
/// Returns `CommandError` for blank lines, unknown commands and malformed arguments.
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(CommandError::Empty);
    }
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    match head.to_ascii_lowercase().as_str() {
        "next" | "n" => Ok(Command::Next),
        "prev" | "p" => Ok(Command::Previous),
        "goto" | "g" => parse_index(rest).map(Command::GoTo),
        "answer" | "a" => parse_answer(rest).map(Command::Answer),
        "pause" => Ok(Command::Pause),
        "resume" => Ok(Command::Resume),
        "finish" => Ok(Command::Finish),
        "status" | "s" => Ok(Command::Status),
        "help" | "h" | "?" => Ok(Command::Help),
        "quit" | "q" | "exit" => Ok(Command::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

fn parse_index(raw: &str) -> Result<usize, CommandError> {
    if raw.is_empty() {
        return Err(CommandError::MissingArgument { command: "goto" });
    }
    raw.parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .ok_or_else(|| CommandError::InvalidIndex {
            raw: raw.to_string(),
        })
}

/// Bracketed input is read as JSON, anything else as a single scalar answer.
fn parse_answer(raw: &str) -> Result<AnswerValue, CommandError> {
    if raw.is_empty() {
        return Err(CommandError::MissingArgument { command: "answer" });
    }
    if raw.starts_with('[') || raw.starts_with('{') {
        return serde_json::from_str(raw).map_err(|_| CommandError::InvalidAnswer {
            raw: raw.to_string(),
        });
    }
    Ok(AnswerValue::scalar(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_navigation() {
        assert_eq!(parse_command("n"), Ok(Command::Next));
        assert_eq!(parse_command("  PREV "), Ok(Command::Previous));
        assert_eq!(parse_command("goto 3"), Ok(Command::GoTo(2)));
    }

    #[test]
    fn goto_is_one_based() {
        assert!(matches!(
            parse_command("goto 0"),
            Err(CommandError::InvalidIndex { .. })
        ));
        assert_eq!(
            parse_command("goto"),
            Err(CommandError::MissingArgument { command: "goto" })
        );
    }

    #[test]
    fn parses_answer_shapes() {
        assert_eq!(
            parse_command("answer verdadero"),
            Ok(Command::Answer(AnswerValue::scalar("verdadero")))
        );
        assert_eq!(
            parse_command("a two words"),
            Ok(Command::Answer(AnswerValue::scalar("two words")))
        );
        assert_eq!(
            parse_command(r#"a ["b", "a"]"#),
            Ok(Command::Answer(AnswerValue::list(["b", "a"])))
        );
        assert_eq!(
            parse_command(r#"a {"x": "1"}"#),
            Ok(Command::Answer(AnswerValue::mapping([("x", "1")])))
        );
    }

    #[test]
    fn rejects_malformed_json_answer() {
        assert!(matches!(
            parse_command("a [unterminated"),
            Err(CommandError::InvalidAnswer { .. })
        ));
    }

    #[test]
    fn rejects_unknown_and_blank() {
        assert_eq!(parse_command("   "), Err(CommandError::Empty));
        assert_eq!(
            parse_command("jump"),
            Err(CommandError::Unknown("jump".into()))
        );
    }
}
