use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use monkpath::{map::Direction, session::SessionMode};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq)]
pub enum ScriptCommand {
    Session { mode: SessionMode, seconds: u32 },
    Wait { seconds: i64 },
    ExtraStep,
    Direction(Direction),
    Pending(u32),
    Move { x: i32, y: i32 },
    Walk { x: i32, y: i32 },
    Place { token: String, x: i32, y: i32, rotation: i32 },
    Relocate { id: String, x: i32, y: i32 },
    Rotate { id: String, degrees: i32 },
    Remove { id: String },
    Status,
}

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("cannot read script: {0}")]
    Io(#[from] io::Error),
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
}

/// Line-oriented command script; `#` starts a comment line.
pub struct Script {
    script_commands: Vec<ScriptCommand>,
    current_command_index: usize,
}

impl Script {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScriptError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, ScriptError> {
        let mut script_commands = Vec::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed_line = line.trim();
            if trimmed_line.is_empty() || trimmed_line.starts_with('#') {
                continue;
            }
            let command = parse_command(trimmed_line).map_err(|message| ScriptError::Parse {
                line: idx + 1,
                message,
            })?;
            script_commands.push(command);
        }

        Ok(Self {
            script_commands,
            current_command_index: 0,
        })
    }

    pub fn next_command(&mut self) -> Option<ScriptCommand> {
        let command = self.script_commands.get(self.current_command_index)?.clone();
        self.current_command_index += 1;
        Some(command)
    }
}

fn number<T: std::str::FromStr>(word: Option<&str>, what: &str) -> Result<T, String> {
    let word = word.ok_or_else(|| format!("missing {what}"))?;
    word.parse()
        .map_err(|_| format!("{what} must be a number, got {word:?}"))
}

fn word<'a>(word: Option<&'a str>, what: &str) -> Result<&'a str, String> {
    word.ok_or_else(|| format!("missing {what}"))
}

fn parse_command(line: &str) -> Result<ScriptCommand, String> {
    let mut words = line.split_whitespace();
    let verb = words.next().unwrap_or_default().to_ascii_lowercase();
    let command = match verb.as_str() {
        "session" => {
            let raw_mode = word(words.next(), "mode")?;
            let mode = SessionMode::parse(raw_mode)
                .ok_or_else(|| format!("unknown session mode {raw_mode:?}"))?;
            ScriptCommand::Session {
                mode,
                seconds: number(words.next(), "seconds")?,
            }
        }
        "wait" => ScriptCommand::Wait {
            seconds: number(words.next(), "seconds")?,
        },
        "extra" => ScriptCommand::ExtraStep,
        "dir" => {
            let raw = word(words.next(), "direction")?;
            ScriptCommand::Direction(
                Direction::parse(raw).ok_or_else(|| format!("unknown direction {raw:?}"))?,
            )
        }
        "pending" => ScriptCommand::Pending(number(words.next(), "steps")?),
        "move" => ScriptCommand::Move {
            x: number(words.next(), "x")?,
            y: number(words.next(), "y")?,
        },
        "walk" => ScriptCommand::Walk {
            x: number(words.next(), "x")?,
            y: number(words.next(), "y")?,
        },
        "place" => ScriptCommand::Place {
            token: word(words.next(), "token")?.to_string(),
            x: number(words.next(), "x")?,
            y: number(words.next(), "y")?,
            rotation: match words.next() {
                Some(raw) => number(Some(raw), "rotation")?,
                None => 0,
            },
        },
        "relocate" => ScriptCommand::Relocate {
            id: word(words.next(), "item id")?.to_string(),
            x: number(words.next(), "x")?,
            y: number(words.next(), "y")?,
        },
        "rotate" => ScriptCommand::Rotate {
            id: word(words.next(), "item id")?.to_string(),
            degrees: number(words.next(), "degrees")?,
        },
        "remove" => ScriptCommand::Remove {
            id: word(words.next(), "item id")?.to_string(),
        },
        "status" => ScriptCommand::Status,
        other => return Err(format!("unknown command {other:?}")),
    };
    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_and_skips_comments() {
        let text = "# warm up\nsession flow 1800\n\nwait 60\n\
                    place koi-pond 1 4 90\nrotate koi-pond-1 -90\n";
        let mut script = Script::from_reader(text.as_bytes()).unwrap();
        assert_eq!(
            script.next_command(),
            Some(ScriptCommand::Session {
                mode: SessionMode::Flow,
                seconds: 1800
            })
        );
        assert_eq!(script.next_command(), Some(ScriptCommand::Wait { seconds: 60 }));
        assert_eq!(
            script.next_command(),
            Some(ScriptCommand::Place {
                token: "koi-pond".to_string(),
                x: 1,
                y: 4,
                rotation: 90
            })
        );
        assert_eq!(
            script.next_command(),
            Some(ScriptCommand::Rotate {
                id: "koi-pond-1".to_string(),
                degrees: -90
            })
        );
        assert_eq!(script.next_command(), None);
    }

    #[test]
    fn reports_line_of_bad_command() {
        let err = Script::from_reader("status\nsession nap 10\n".as_bytes())
            .err()
            .unwrap();
        match err {
            ScriptError::Parse { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("nap"));
            }
            other => panic!("unexpected {other}"),
        }
    }
}
