use std::io::{self, BufRead, Write};

use anyhow::Context;
use clap::Parser;
use gemmines_core::{
    Feedback, GameSession, GridSize, Intent, RevealAllOutcome, RevealSchedule, SessionDriver,
    coords_to_index,
};
use thiserror::Error;
use web_time::Instant;

use crate::command::{Command, HELP, Target};
use crate::config::{Args, Settings};

mod command;
mod config;
mod render;
mod wager;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbosity.log_level_filter())
        .init();

    let settings = Settings::resolve(&args)?;
    let session = GameSession::new(settings.game, settings.seed)?.with_sampling(settings.sampling);
    let mut driver = SessionDriver::new(session, RevealSchedule::new(settings.reveal_delay));

    let stdin = io::stdin();
    let mut out = io::stdout().lock();
    writeln!(out, "type `help` for commands")?;
    render::render(driver.session(), &mut out)?;

    for line in stdin.lock().lines() {
        let line = line.context("reading command")?;
        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(err) => {
                writeln!(out, "{err}")?;
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Help => writeln!(out, "{HELP}")?,
            Command::State => {
                let json = serde_json::to_string_pretty(&driver.session().snapshot())?;
                writeln!(out, "{json}")?;
            }
            command => {
                let intent = match intent_for(command, driver.session()) {
                    Ok(intent) => intent,
                    Err(err) => {
                        writeln!(out, "{err}")?;
                        continue;
                    }
                };
                match driver.handle(intent, Instant::now()) {
                    Ok(feedback) => {
                        report(feedback, &mut out)?;
                        if feedback.has_update() {
                            render::render(driver.session(), &mut out)?;
                        }
                    }
                    Err(err) => {
                        log::debug!("rejected {:?}: {}", intent, err);
                        writeln!(out, "{err}")?;
                    }
                }
            }
        }

        wait_for_reveal(&mut driver, &mut out)?;
        out.flush()?;
    }

    Ok(())
}

#[derive(Error, Debug, PartialEq, Eq)]
enum Unroutable {
    #[error("tile ({row}, {col}) is not on the board")]
    OffBoard { row: GridSize, col: GridSize },
    #[error("`{0:?}` is answered by the terminal, not the session")]
    Local(Command),
}

/// Translates a line command into a session intent.
fn intent_for(command: Command, session: &GameSession) -> Result<Intent, Unroutable> {
    let mine_count = session.mine_count();
    let bet_amount = session.bet_amount();
    let configure_bet = |bet_amount| Intent::Configure {
        mine_count,
        bet_amount,
    };

    Ok(match command {
        Command::Mines(mine_count) => Intent::Configure {
            mine_count,
            bet_amount,
        },
        Command::Bet(amount) | Command::Preset(amount) => configure_bet(amount),
        Command::Half => configure_bet(wager::half(bet_amount)),
        Command::Double => configure_bet(wager::double(bet_amount)),
        Command::Inc => configure_bet(wager::increment(bet_amount)),
        Command::Dec => configure_bet(wager::decrement(bet_amount)),
        Command::Start => Intent::StartRound,
        Command::Reveal(Target::Index(index)) => Intent::RevealTile(index),
        Command::Reveal(Target::Coords((row, col))) => Intent::RevealTile(
            coords_to_index((row, col), session.grid_size())
                .ok_or(Unroutable::OffBoard { row, col })?,
        ),
        Command::CashOut => Intent::CashOut,
        Command::Reset => Intent::Reset,
        local @ (Command::State | Command::Help | Command::Quit) => {
            return Err(Unroutable::Local(local));
        }
    })
}

fn report(feedback: Feedback, out: &mut impl Write) -> io::Result<()> {
    match feedback {
        Feedback::CashedOut(receipt) if receipt.bet_amount == 0 => writeln!(
            out,
            "cashed out of demo round {} with {} gems",
            receipt.round, receipt.gems_revealed
        ),
        Feedback::CashedOut(receipt) => writeln!(
            out,
            "cashed out bet {} of round {} with {} gems",
            receipt.bet_amount, receipt.round, receipt.gems_revealed
        ),
        _ => Ok(()),
    }
}

/// Blocks until a scheduled reveal-all is due, then shows the whole board.
fn wait_for_reveal(driver: &mut SessionDriver, out: &mut impl Write) -> io::Result<()> {
    let Some(wait) = driver.schedule().time_until_due(Instant::now()) else {
        return Ok(());
    };
    std::thread::sleep(wait);
    if driver.tick(Instant::now()) == Some(RevealAllOutcome::Applied) {
        render::render(driver.session(), out)?;
    }
    Ok(())
}
