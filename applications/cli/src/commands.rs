//! Console command parsing
//!
//! One command per line. Arguments are separated by whitespace; wrap a path
//! in double quotes to keep its spaces. Result numbers are 1-based, as
//! printed by `results` and `list`.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// A parsed console command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Add(Vec<PathBuf>),
    Play,
    Pause,
    Toggle,
    Next,
    Prev,
    Jump(usize),
    Shuffle,
    Clear,
    Repeat,
    Seek(Duration),
    Volume(u8),
    Mute,
    Search(String),
    Results,
    Pick(usize),
    Enqueue(usize),
    Fetch(String),
    List,
    Save,
    Load,
    Status,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command '{0}' (try 'help')")]
    Unknown(String),

    #[error("'{command}' needs {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },

    #[error("Invalid argument '{value}' for '{command}': expected {expected}")]
    InvalidArgument {
        command: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("Unterminated quote")]
    UnterminatedQuote,
}

pub const HELP: &str = "\
Commands:
  add <path>...      append local files to the playlist
  play | pause       start or pause playback
  toggle             play/pause
  next | prev        move through the playlist (wraps)
  jump <n>           play playlist entry n
  shuffle            shuffle the playlist and start from the top
  clear              empty the playlist and cancel downloads
  repeat             cycle repeat mode (off, all, one)
  seek <secs>        jump to a position in the current track
  volume <0-100>     set volume
  mute               toggle mute
  search <query>     search for remote tracks
  results            show the last search results
  pick <n>           download and play search result n
  enqueue <n>        queue search result n to play after the current track
  fetch <query>      download and play the first hit for query
  list               show the playlist and download queue
  save | load        write or read the playlist file
  status             show what is playing
  quit               stop downloads and exit";

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        let command = match name.to_ascii_lowercase().as_str() {
            "add" => {
                let paths = split_args(rest)?;
                if paths.is_empty() {
                    return Err(CommandError::MissingArgument {
                        command: "add",
                        expected: "at least one path",
                    });
                }
                Command::Add(paths.into_iter().map(PathBuf::from).collect())
            }
            "play" => Command::Play,
            "pause" => Command::Pause,
            "toggle" => Command::Toggle,
            "next" => Command::Next,
            "prev" | "previous" => Command::Prev,
            "jump" => Command::Jump(position("jump", rest)?),
            "shuffle" => Command::Shuffle,
            "clear" => Command::Clear,
            "repeat" => Command::Repeat,
            "seek" => Command::Seek(seconds("seek", rest)?),
            "volume" | "vol" => Command::Volume(volume(rest)?),
            "mute" => Command::Mute,
            "search" => Command::Search(text("search", rest)?),
            "results" => Command::Results,
            "pick" => Command::Pick(position("pick", rest)?),
            "enqueue" | "queue" => Command::Enqueue(position("enqueue", rest)?),
            "fetch" => Command::Fetch(text("fetch", rest)?),
            "list" | "ls" => Command::List,
            "save" => Command::Save,
            "load" => Command::Load,
            "status" => Command::Status,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}

fn text(command: &'static str, rest: &str) -> Result<String, CommandError> {
    if rest.is_empty() {
        return Err(CommandError::MissingArgument {
            command,
            expected: "a search query",
        });
    }
    Ok(rest.to_string())
}

/// 1-based position converted to an index
fn position(command: &'static str, rest: &str) -> Result<usize, CommandError> {
    if rest.is_empty() {
        return Err(CommandError::MissingArgument {
            command,
            expected: "a number",
        });
    }
    match rest.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n - 1),
        _ => Err(CommandError::InvalidArgument {
            command,
            value: rest.to_string(),
            expected: "a number starting at 1",
        }),
    }
}

fn seconds(command: &'static str, rest: &str) -> Result<Duration, CommandError> {
    if rest.is_empty() {
        return Err(CommandError::MissingArgument {
            command,
            expected: "a position in seconds",
        });
    }
    rest.parse::<f64>()
        .ok()
        .filter(|secs| secs.is_finite() && *secs >= 0.0)
        .map(Duration::from_secs_f64)
        .ok_or_else(|| CommandError::InvalidArgument {
            command,
            value: rest.to_string(),
            expected: "a non-negative number of seconds",
        })
}

fn volume(rest: &str) -> Result<u8, CommandError> {
    if rest.is_empty() {
        return Err(CommandError::MissingArgument {
            command: "volume",
            expected: "a level from 0 to 100",
        });
    }
    rest.parse::<u8>()
        .ok()
        .filter(|level| *level <= 100)
        .ok_or_else(|| CommandError::InvalidArgument {
            command: "volume",
            value: rest.to_string(),
            expected: "a level from 0 to 100",
        })
}

/// Whitespace-separated arguments with double-quote grouping
fn split_args(input: &str) -> Result<Vec<String>, CommandError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for c in input.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    args.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }

    if in_quotes {
        return Err(CommandError::UnterminatedQuote);
    }
    if has_token {
        args.push(current);
    }
    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<Command, CommandError> {
        line.parse()
    }

    #[test]
    fn simple_commands() {
        assert_eq!(parse("play"), Ok(Command::Play));
        assert_eq!(parse("  PAUSE "), Ok(Command::Pause));
        assert_eq!(parse("prev"), Ok(Command::Prev));
        assert_eq!(parse("exit"), Ok(Command::Quit));
    }

    #[test]
    fn add_takes_several_paths_with_quotes() {
        assert_eq!(
            parse(r#"add /music/a.mp3 "/music/My Song.flac""#),
            Ok(Command::Add(vec![
                PathBuf::from("/music/a.mp3"),
                PathBuf::from("/music/My Song.flac"),
            ]))
        );
        assert!(matches!(
            parse("add"),
            Err(CommandError::MissingArgument { command: "add", .. })
        ));
        assert_eq!(parse(r#"add "/music/open"#), Err(CommandError::UnterminatedQuote));
    }

    #[test]
    fn positions_are_one_based() {
        assert_eq!(parse("pick 1"), Ok(Command::Pick(0)));
        assert_eq!(parse("enqueue 3"), Ok(Command::Enqueue(2)));
        assert_eq!(parse("jump 2"), Ok(Command::Jump(1)));
        assert!(matches!(
            parse("pick 0"),
            Err(CommandError::InvalidArgument { .. })
        ));
        assert!(matches!(
            parse("pick two"),
            Err(CommandError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn search_keeps_the_whole_query() {
        assert_eq!(
            parse("search  lofi   hip hop "),
            Ok(Command::Search("lofi   hip hop".to_string()))
        );
        assert!(parse("search").is_err());
    }

    #[test]
    fn numeric_arguments_are_checked() {
        assert_eq!(parse("seek 12.5"), Ok(Command::Seek(Duration::from_millis(12_500))));
        assert!(parse("seek -3").is_err());
        assert_eq!(parse("volume 100"), Ok(Command::Volume(100)));
        assert!(parse("volume 101").is_err());
        assert!(parse("volume").is_err());
    }

    #[test]
    fn unknown_command() {
        assert_eq!(
            parse("dance"),
            Err(CommandError::Unknown("dance".to_string()))
        );
    }
}
