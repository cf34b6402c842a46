use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::*;

/// User intent forwarded by a presentation layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    Configure {
        mine_count: CellCount,
        bet_amount: BetAmount,
    },
    StartRound,
    RevealTile(TileIndex),
    CashOut,
    Reset,
}

/// What handling an [`Intent`] did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Feedback {
    Configured,
    RoundStarted(RoundId),
    Revealed(RevealOutcome),
    CashedOut(CashOut),
    Reset,
}

impl Feedback {
    /// Whether the board needs to be drawn again
    pub const fn has_update(self) -> bool {
        match self {
            Self::Revealed(outcome) => outcome.has_update(),
            _ => true,
        }
    }
}

/// One session plus the timer for its deferred reveal-all, driven by a single event loop.
#[derive(Clone, Debug)]
pub struct SessionDriver {
    session: GameSession,
    schedule: RevealSchedule,
}

impl SessionDriver {
    pub fn new(session: GameSession, schedule: RevealSchedule) -> Self {
        Self { session, schedule }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn schedule(&self) -> &RevealSchedule {
        &self.schedule
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.schedule.next_deadline()
    }

    pub fn handle(&mut self, intent: Intent, now: Instant) -> Result<Feedback> {
        log::trace!("handling {:?}", intent);
        let feedback = match intent {
            Intent::Configure {
                mine_count,
                bet_amount,
            } => {
                self.session.configure(mine_count, bet_amount)?;
                Feedback::Configured
            }
            Intent::StartRound => Feedback::RoundStarted(self.session.start_round()?),
            Intent::RevealTile(index) => Feedback::Revealed(self.session.reveal_tile(index)?),
            Intent::CashOut => Feedback::CashedOut(self.session.cash_out()?),
            Intent::Reset => {
                self.session.reset();
                Feedback::Reset
            }
        };
        self.sync_schedule(now);
        Ok(feedback)
    }

    /// Fires the reveal-all if it is due, returns what happened when it fired.
    pub fn tick(&mut self, now: Instant) -> Option<RevealAllOutcome> {
        let ticket = self.schedule.take_due(now)?;
        Some(self.session.apply_reveal_all(ticket))
    }

    fn sync_schedule(&mut self, now: Instant) {
        match self.session.pending_reveal_all() {
            Some(ticket) if self.schedule.pending() != Some(ticket) => {
                log::debug!("scheduling reveal for round {}", ticket.round());
                self.schedule.schedule(ticket, now);
            }
            Some(_) => {}
            None => {
                if let Some(ticket) = self.schedule.cancel() {
                    log::debug!("cancelled reveal for round {}", ticket.round());
                }
            }
        }
    }
}
