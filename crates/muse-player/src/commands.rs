//! Prompt commands

use anyhow::{anyhow, bail, Result};

pub const HELP: &str = "\
Commands:
  list                 show the catalog
  play <id>            play a track (resumes if already loaded)
  pause | resume | toggle | stop
  next | prev
  queue <id>           append to the queue
  unqueue <id>         remove from the queue
  move <from> <to>     reorder the queue
  clear                empty the queue
  all <id>             play <id> and queue the rest of the catalog
  seek <seconds>
  vol <0..1> | mute | rate <0.25..2>
  loop | shuffle       toggle looping / shuffling
  status
  quit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    List,
    Play(String),
    Pause,
    Resume,
    Toggle,
    Stop,
    Next,
    Prev,
    Queue(String),
    Unqueue(String),
    Move(usize, usize),
    Clear,
    PlayAll(String),
    Seek(f64),
    Volume(f32),
    Mute,
    Rate(f32),
    Loop,
    Shuffle,
    Status,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Option<Command>> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(None);
        };
        let mut arg = |what: &str| words.next().ok_or_else(|| anyhow!("'{}' needs {}", name, what));

        let command = match name {
            "list" | "ls" => Command::List,
            "play" => Command::Play(arg("a track id")?.to_string()),
            "pause" => Command::Pause,
            "resume" => Command::Resume,
            "toggle" => Command::Toggle,
            "stop" => Command::Stop,
            "next" => Command::Next,
            "prev" => Command::Prev,
            "queue" => Command::Queue(arg("a track id")?.to_string()),
            "unqueue" => Command::Unqueue(arg("a track id")?.to_string()),
            "move" => {
                let from = arg("two positions")?.parse()?;
                let to = arg("two positions")?.parse()?;
                Command::Move(from, to)
            }
            "clear" => Command::Clear,
            "all" => Command::PlayAll(arg("a track id")?.to_string()),
            "seek" => Command::Seek(arg("a position in seconds")?.parse()?),
            "vol" | "volume" => Command::Volume(arg("a level")?.parse()?),
            "mute" => Command::Mute,
            "rate" => Command::Rate(arg("a rate")?.parse()?),
            "loop" => Command::Loop,
            "shuffle" => Command::Shuffle,
            "status" | "st" => Command::Status,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => bail!("Unknown command '{}' (try 'help')", other),
        };
        Ok(Some(command))
    }
}
