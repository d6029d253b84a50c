// Line command parser
//
// One command per line, whitespace separated:
//   chords [difficulty]
//   patterns [difficulty]
//   play [chord,chord,...] [pattern] [passes]
//   stop | state | tempo [bpm] | simulation | help | quit

use crate::command::types::PlayRequest;
use std::str::FromStr;

/// Tempo used by `tempo` without an argument
pub const DEFAULT_TEMPO_BPM: u32 = 120;

/// Errors that can occur while parsing a command line
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command '{0}' (try 'help')")]
    Unknown(String),

    #[error("Invalid argument '{argument}' for '{command}': {reason}")]
    InvalidArgument {
        command: &'static str,
        argument: String,
        reason: String,
    },

    #[error("Too many arguments for '{0}'")]
    TooManyArguments(&'static str),
}

/// Result type for command operations
pub type CommandResult<T> = Result<T, CommandError>;

/// A parsed front-end command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// List chords up to a difficulty, `None` uses the configured default
    Chords { difficulty: Option<u8> },
    /// List patterns up to a difficulty, `None` uses the configured default
    Patterns { difficulty: Option<u8> },
    Play(PlayRequest),
    Stop,
    State,
    Tempo { bpm: u32 },
    Simulation,
    Help,
    Quit,
}

impl Command {
    /// Keyword of the command
    pub fn name(&self) -> &'static str {
        match self {
            Command::Chords { .. } => "chords",
            Command::Patterns { .. } => "patterns",
            Command::Play(_) => "play",
            Command::Stop => "stop",
            Command::State => "state",
            Command::Tempo { .. } => "tempo",
            Command::Simulation => "simulation",
            Command::Help => "help",
            Command::Quit => "quit",
        }
    }

    /// Short usage text for `help`
    pub fn usage() -> &'static str {
        "chords [difficulty] | patterns [difficulty] | play [chord,chord,...] [pattern] [passes] | stop | state | tempo [bpm] | simulation | quit"
    }
}

fn parse_number<T: FromStr>(command: &'static str, argument: &str) -> CommandResult<T>
where
    T::Err: std::fmt::Display,
{
    argument
        .parse()
        .map_err(|e: T::Err| CommandError::InvalidArgument {
            command,
            argument: argument.to_string(),
            reason: e.to_string(),
        })
}

fn expect_no_more<'a>(
    command: &'static str,
    mut rest: impl Iterator<Item = &'a str>,
) -> CommandResult<()> {
    match rest.next() {
        Some(_) => Err(CommandError::TooManyArguments(command)),
        None => Ok(()),
    }
}

fn parse_play<'a>(mut args: impl Iterator<Item = &'a str>) -> CommandResult<PlayRequest> {
    let mut request = PlayRequest::default();

    if let Some(chords) = args.next() {
        let names: Vec<String> = chords
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();
        request.chords = Some(names);
    }
    if let Some(pattern) = args.next() {
        request.pattern = Some(pattern.to_string());
    }
    if let Some(passes) = args.next() {
        request.passes = Some(parse_number("play", passes)?);
    }

    expect_no_more("play", args)?;
    Ok(request)
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words.next().ok_or(CommandError::Empty)?;

        let command = match name.to_ascii_lowercase().as_str() {
            "chords" => Command::Chords {
                difficulty: words
                    .next()
                    .map(|d| parse_number("chords", d))
                    .transpose()?,
            },
            "patterns" => Command::Patterns {
                difficulty: words
                    .next()
                    .map(|d| parse_number("patterns", d))
                    .transpose()?,
            },
            "play" => return parse_play(words).map(Command::Play),
            "stop" => Command::Stop,
            "state" | "status" => Command::State,
            "tempo" => Command::Tempo {
                bpm: words
                    .next()
                    .map(|b| parse_number("tempo", b))
                    .transpose()?
                    .unwrap_or(DEFAULT_TEMPO_BPM),
            },
            "simulation" => Command::Simulation,
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };

        expect_no_more(command.name(), words)?;
        Ok(command)
    }
}
