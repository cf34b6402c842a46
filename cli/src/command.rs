use gemmines_core::{BetAmount, CellCount, Coord2, GridSize, TileIndex};
use thiserror::Error;

use crate::wager;

pub const HELP: &str = "\
commands:
  mines N          set the mine count for the next round
  bet N            set the bet, 0 plays in demo mode
  half | double    halve or double the bet
  inc | dec        raise or lower the bet by one
  preset N         bet one of 10, 100, 1000, 10000
  start            place mines and start a round
  reveal I         reveal tile I (row-major index)
  reveal ROW COL   reveal the tile at ROW, COL
  cashout          leave the round after finding a gem
  reset            clear the board (play again)
  state            print the session as JSON
  help             show this text
  quit             leave";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Target {
    Index(TileIndex),
    Coords(Coord2),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Mines(CellCount),
    Bet(BetAmount),
    Half,
    Double,
    Inc,
    Dec,
    Preset(BetAmount),
    Start,
    Reveal(Target),
    CashOut,
    Reset,
    State,
    Help,
    Quit,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty command, try `help`")]
    Empty,
    #[error("unknown command `{0}`, try `help`")]
    Unknown(String),
    #[error("`{command}` expects {expected}")]
    Arguments {
        command: &'static str,
        expected: &'static str,
    },
    #[error("{0} is not one of the preset amounts 10, 100, 1000, 10000")]
    NotAPreset(BetAmount),
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Err(ParseError::Empty);
        };
        let args: Vec<&str> = words.collect();

        let command = match name.to_ascii_lowercase().as_str() {
            "mines" => Self::Mines(single(&args, "mines", "a mine count")?),
            "bet" => Self::Bet(single(&args, "bet", "an amount")?),
            "half" => nullary(&args, "half", Self::Half)?,
            "double" => nullary(&args, "double", Self::Double)?,
            "inc" | "+" => nullary(&args, "inc", Self::Inc)?,
            "dec" | "-" => nullary(&args, "dec", Self::Dec)?,
            "preset" => {
                let amount = single(&args, "preset", "an amount")?;
                if !wager::is_preset(amount) {
                    return Err(ParseError::NotAPreset(amount));
                }
                Self::Preset(amount)
            }
            "start" | "bet!" => nullary(&args, "start", Self::Start)?,
            "reveal" | "r" => Self::Reveal(target(&args)?),
            "cashout" | "cash" => nullary(&args, "cashout", Self::CashOut)?,
            "reset" | "again" => nullary(&args, "reset", Self::Reset)?,
            "state" => nullary(&args, "state", Self::State)?,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => return Err(ParseError::Unknown(other.to_owned())),
        };
        Ok(command)
    }
}

fn nullary(args: &[&str], command: &'static str, value: Command) -> Result<Command, ParseError> {
    if args.is_empty() {
        Ok(value)
    } else {
        Err(ParseError::Arguments {
            command,
            expected: "no arguments",
        })
    }
}

fn single<T: std::str::FromStr>(
    args: &[&str],
    command: &'static str,
    expected: &'static str,
) -> Result<T, ParseError> {
    match args {
        [value] => value
            .parse()
            .map_err(|_| ParseError::Arguments { command, expected }),
        _ => Err(ParseError::Arguments { command, expected }),
    }
}

fn target(args: &[&str]) -> Result<Target, ParseError> {
    let error = ParseError::Arguments {
        command: "reveal",
        expected: "an index or a row and column",
    };
    match args {
        [index] => index.parse().map(Target::Index).map_err(|_| error),
        [row, col] => match (row.parse::<GridSize>(), col.parse::<GridSize>()) {
            (Ok(row), Ok(col)) => Ok(Target::Coords((row, col))),
            _ => Err(error),
        },
        _ => Err(error),
    }
}
