use alloc::collections::BTreeSet;
use alloc::vec::Vec;
use core::fmt;

use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - Idle -> Playing
/// - Playing -> Playing
/// - Playing -> Won
/// - Playing -> Lost
/// - any -> Idle
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Between rounds, configuration may change
    Idle,
    /// Round in progress
    Playing,
    /// Round ended with every safe tile revealed
    Won,
    /// Round ended on a mine
    Lost,
}

impl Phase {
    pub const fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }

    pub const fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }

    /// Indicates the round has ended and only a reset is accepted
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for Phase {
    fn default() -> Self {
        Self::Idle
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Playing => "playing",
            Self::Won => "won",
            Self::Lost => "lost",
        })
    }
}

/// Monotonic round counter, bumped on every reset and round start.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct RoundId(u64);

impl RoundId {
    pub const fn get(self) -> u64 {
        self.0
    }

    const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for RoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Permission to reveal the whole board once the round that issued it ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealTicket {
    round: RoundId,
}

impl RevealTicket {
    pub const fn round(self) -> RoundId {
        self.round
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealAllOutcome {
    Applied,
    /// The ticket belongs to another round or was already used
    Stale,
}

/// Receipt handed out when a player leaves a round early.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashOut {
    pub round: RoundId,
    pub bet_amount: BetAmount,
    pub gems_revealed: CellCount,
}

/// Authoritative state of one player's table.
#[derive(Clone, Debug)]
pub struct GameSession {
    config: GameConfig,
    sampling: Sampling,
    rng: SmallRng,
    layout: MineLayout,
    revealed: BTreeSet<TileIndex>,
    phase: Phase,
    round: RoundId,
    pending_reveal: Option<RevealTicket>,
    triggered_mine: Option<TileIndex>,
}

impl GameSession {
    pub fn new(config: GameConfig, seed: u64) -> Result<Self> {
        use rand::prelude::*;

        config.validate()?;
        Ok(Self {
            config,
            sampling: Sampling::default(),
            rng: SmallRng::seed_from_u64(seed),
            layout: MineLayout::empty(config.grid_size),
            revealed: BTreeSet::new(),
            phase: Phase::default(),
            round: RoundId::default(),
            pending_reveal: None,
            triggered_mine: None,
        })
    }

    pub fn with_sampling(mut self, sampling: Sampling) -> Self {
        self.sampling = sampling;
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn round(&self) -> RoundId {
        self.round
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn grid_size(&self) -> GridSize {
        self.config.grid_size
    }

    pub fn mine_count(&self) -> CellCount {
        self.config.mine_count
    }

    pub fn bet_amount(&self) -> BetAmount {
        self.config.bet_amount
    }

    pub fn is_demo(&self) -> bool {
        self.config.is_demo()
    }

    pub fn sampling(&self) -> Sampling {
        self.sampling
    }

    pub fn total_tiles(&self) -> CellCount {
        self.config.total_tiles()
    }

    pub fn tile(&self, index: TileIndex) -> Result<Tile> {
        let index = self.layout.validate_index(index)?;
        Ok(self.layout.tile(index))
    }

    pub fn tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        (0..self.layout.total_tiles()).map(|index| self.layout.tile(index))
    }

    pub fn revealed_indices(&self) -> &BTreeSet<TileIndex> {
        &self.revealed
    }

    pub fn is_revealed(&self, index: TileIndex) -> bool {
        self.revealed.contains(&index)
    }

    pub fn tile_view(&self, index: TileIndex) -> Result<TileView> {
        let tile = self.tile(index)?;
        Ok(TileView::of(tile, self.is_revealed(index)))
    }

    /// Safe tiles still hidden in the current round, 0 outside of one.
    pub fn gems_left(&self) -> CellCount {
        if self.phase.is_playing() {
            self.layout.safe_tile_count() - self.gem_count()
        } else {
            0
        }
    }

    /// Mine that ended a lost round.
    pub fn triggered_mine(&self) -> Option<TileIndex> {
        self.triggered_mine
    }

    /// Reveal-all issued by the last terminal transition and not applied yet.
    pub fn pending_reveal_all(&self) -> Option<RevealTicket> {
        self.pending_reveal
    }

    /// Changes the mine count and bet for the next round.
    pub fn configure(&mut self, mine_count: CellCount, bet_amount: BetAmount) -> Result<()> {
        self.check_not_playing(Operation::Configure)?;
        self.config.check_mine_count(mine_count)?;

        self.config.mine_count = mine_count;
        self.config.bet_amount = bet_amount;
        log::debug!("configured {} mines, bet {}", mine_count, bet_amount);
        Ok(())
    }

    /// Clears the board and returns to idle, from any phase.
    pub fn reset(&mut self) {
        self.layout = MineLayout::empty(self.config.grid_size);
        self.revealed.clear();
        self.phase = Phase::Idle;
        self.round = self.round.next();
        self.pending_reveal = None;
        self.triggered_mine = None;
        log::debug!("reset, now round {}", self.round);
    }

    /// Places mines and begins a round.
    pub fn start_round(&mut self) -> Result<RoundId> {
        use rand::prelude::*;

        if !self.phase.is_idle() {
            return Err(self.illegal(Operation::StartRound));
        }

        let seed: u64 = self.rng.random();
        self.layout = RandomLayoutGenerator::new(seed, self.sampling)
            .generate(self.config.grid_size, self.config.mine_count);
        self.revealed.clear();
        self.phase = Phase::Playing;
        self.round = self.round.next();
        self.pending_reveal = None;
        self.triggered_mine = None;
        log::debug!(
            "round {} started with {} mines, bet {}",
            self.round,
            self.layout.mine_count(),
            self.config.bet_amount
        );
        Ok(self.round)
    }

    pub fn reveal_tile(&mut self, index: TileIndex) -> Result<RevealOutcome> {
        use RevealOutcome::*;

        let index = self.layout.validate_index(index)?;
        if !self.phase.is_playing() {
            return Err(self.illegal(Operation::RevealTile));
        }

        if !self.revealed.insert(index) {
            log::trace!("tile {} already revealed", index);
            return Ok(NoChange);
        }

        if self.layout.contains_mine(index) {
            log::debug!("tile {} is a mine", index);
            self.triggered_mine = Some(index);
            self.end_round(Phase::Lost);
            Ok(HitMine)
        } else if self.gem_count() == self.layout.safe_tile_count() {
            log::debug!("tile {} was the last gem", index);
            self.end_round(Phase::Won);
            Ok(Won)
        } else {
            log::debug!("tile {} is a gem", index);
            Ok(Gem)
        }
    }

    /// Leaves a round after at least one gem was found, then resets.
    pub fn cash_out(&mut self) -> Result<CashOut> {
        if !self.phase.is_playing() || self.revealed.is_empty() {
            return Err(self.illegal(Operation::CashOut));
        }

        let receipt = CashOut {
            round: self.round,
            bet_amount: self.config.bet_amount,
            gems_revealed: self.gem_count(),
        };
        log::debug!(
            "cashed out round {} after {} gems",
            receipt.round,
            receipt.gems_revealed
        );
        self.reset();
        Ok(receipt)
    }

    /// Reveals every tile if `ticket` still belongs to the current, finished round.
    pub fn apply_reveal_all(&mut self, ticket: RevealTicket) -> RevealAllOutcome {
        if self.pending_reveal != Some(ticket) || !self.phase.is_finished() {
            log::debug!(
                "dropping stale reveal for round {}, now round {} ({})",
                ticket.round,
                self.round,
                self.phase
            );
            return RevealAllOutcome::Stale;
        }

        self.revealed.extend(0..self.layout.total_tiles());
        self.pending_reveal = None;
        log::debug!("revealed whole board of round {}", self.round);
        RevealAllOutcome::Applied
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            grid_size: self.config.grid_size,
            mine_count: self.config.mine_count,
            bet_amount: self.config.bet_amount,
            phase: self.phase,
            round: self.round,
            tiles: self
                .tiles()
                .map(|tile| TileView::of(tile, self.is_revealed(tile.index)))
                .collect(),
            revealed: self.revealed.iter().copied().collect(),
            triggered_mine: self.triggered_mine,
        }
    }

    fn end_round(&mut self, phase: Phase) {
        self.phase = phase;
        self.pending_reveal = Some(RevealTicket { round: self.round });
        log::debug!("round {} ended: {}", self.round, phase);
    }

    /// Revealed tiles that are not mines.
    fn gem_count(&self) -> CellCount {
        let mines_revealed = CellCount::from(self.triggered_mine.is_some());
        self.revealed.len() as CellCount - mines_revealed
    }

    fn check_not_playing(&self, operation: Operation) -> Result<()> {
        if self.phase.is_playing() {
            Err(self.illegal(operation))
        } else {
            Ok(())
        }
    }

    fn illegal(&self, operation: Operation) -> SessionError {
        SessionError::IllegalTransition {
            operation,
            phase: self.phase,
        }
    }
}

/// Everything a presentation layer may read, with unrevealed mines hidden.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub grid_size: GridSize,
    pub mine_count: CellCount,
    pub bet_amount: BetAmount,
    pub phase: Phase,
    pub round: RoundId,
    pub tiles: Vec<TileView>,
    pub revealed: Vec<TileIndex>,
    pub triggered_mine: Option<TileIndex>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn session(mine_count: CellCount) -> GameSession {
        GameSession::new(GameConfig::new(5, mine_count, 10).unwrap(), 7).unwrap()
    }

    fn started(mine_count: CellCount) -> GameSession {
        let mut session = session(mine_count);
        session.start_round().unwrap();
        session
    }

    fn mines(session: &GameSession) -> Vec<TileIndex> {
        session
            .tiles()
            .filter(|tile| tile.has_mine)
            .map(|tile| tile.index)
            .collect()
    }

    fn gems(session: &GameSession) -> Vec<TileIndex> {
        session
            .tiles()
            .filter(|tile| tile.is_safe())
            .map(|tile| tile.index)
            .collect()
    }

    #[test]
    fn new_session_is_idle_and_mine_free() {
        let session = session(3);

        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.tiles().count(), 25);
        assert!(session.tiles().all(|tile| !tile.has_mine));
        assert!(session.revealed_indices().is_empty());
    }

    #[test]
    fn start_round_places_exact_mine_count() {
        for mine_count in 0..=25 {
            let session = started(mine_count);
            assert_eq!(session.phase(), Phase::Playing);
            assert_eq!(mines(&session).len(), usize::from(mine_count));
        }
    }

    #[test]
    fn start_round_requires_idle() {
        let mut session = started(3);
        let round = session.round();

        assert_eq!(
            session.start_round(),
            Err(SessionError::IllegalTransition {
                operation: Operation::StartRound,
                phase: Phase::Playing
            })
        );
        assert_eq!(session.round(), round);
    }

    #[test]
    fn revealing_every_gem_wins_only_at_the_end() {
        let mut session = started(3);
        let gems = gems(&session);
        assert_eq!(gems.len(), 22);

        for (n, &index) in gems.iter().enumerate() {
            let outcome = session.reveal_tile(index).unwrap();
            if n + 1 < gems.len() {
                assert_eq!(outcome, RevealOutcome::Gem);
                assert_eq!(session.phase(), Phase::Playing);
            } else {
                assert_eq!(outcome, RevealOutcome::Won);
                assert_eq!(session.phase(), Phase::Won);
            }
        }
        assert_eq!(session.revealed_indices().len(), 22);
        assert!(session.pending_reveal_all().is_some());
    }

    #[test]
    fn mine_loses_regardless_of_progress() {
        let mut session = started(3);
        let gems = gems(&session);
        let mine = mines(&session)[1];

        for &index in &gems[..21] {
            session.reveal_tile(index).unwrap();
        }
        assert_eq!(session.reveal_tile(mine).unwrap(), RevealOutcome::HitMine);
        assert_eq!(session.phase(), Phase::Lost);
        assert_eq!(session.triggered_mine(), Some(mine));
    }

    #[test]
    fn repeated_reveal_changes_nothing() {
        let mut session = started(3);
        let gem = gems(&session)[0];

        assert_eq!(session.reveal_tile(gem).unwrap(), RevealOutcome::Gem);
        let before = session.revealed_indices().clone();

        assert_eq!(session.reveal_tile(gem).unwrap(), RevealOutcome::NoChange);
        assert_eq!(session.revealed_indices(), &before);
        assert_eq!(session.phase(), Phase::Playing);
    }

    #[test]
    fn reveal_rejects_bad_index_and_wrong_phase() {
        let mut session = session(3);

        assert_eq!(
            session.reveal_tile(3),
            Err(SessionError::IllegalTransition {
                operation: Operation::RevealTile,
                phase: Phase::Idle
            })
        );
        session.start_round().unwrap();
        assert_eq!(session.reveal_tile(25), Err(SessionError::InvalidIndex(25)));
        assert!(session.revealed_indices().is_empty());
    }

    #[test]
    fn no_mines_wins_on_last_of_all_tiles() {
        let mut session = started(0);

        for index in 0..24 {
            assert_eq!(session.reveal_tile(index).unwrap(), RevealOutcome::Gem);
        }
        assert_eq!(session.reveal_tile(24).unwrap(), RevealOutcome::Won);
    }

    #[test]
    fn full_board_loses_on_first_reveal() {
        for index in [0, 12, 24] {
            let mut session = started(25);
            assert_eq!(session.reveal_tile(index).unwrap(), RevealOutcome::HitMine);
            assert_eq!(session.phase(), Phase::Lost);
        }
    }

    #[test]
    fn finished_round_only_accepts_reset() {
        let mut session = started(25);
        session.reveal_tile(0).unwrap();

        assert!(session.reveal_tile(1).is_err());
        assert!(session.start_round().is_err());
        assert!(session.cash_out().is_err());

        session.reset();
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[test]
    fn reset_clears_everything_from_any_phase() {
        let mut idle = session(3);
        let mut playing = started(3);
        let mut lost = started(25);
        lost.reveal_tile(4).unwrap();
        let mut won = session(24).with_sampling(Sampling::Rejection);
        won.start_round().unwrap();
        let gem = gems(&won)[0];
        assert_eq!(won.reveal_tile(gem).unwrap(), RevealOutcome::Won);

        for session in [&mut idle, &mut playing, &mut lost, &mut won] {
            let ticket = session.pending_reveal_all();
            session.reset();
            assert_eq!(session.phase(), Phase::Idle);
            assert!(session.revealed_indices().is_empty());
            assert!(session.tiles().all(|tile| !tile.has_mine));
            assert_eq!(session.pending_reveal_all(), None);
            assert_eq!(session.triggered_mine(), None);

            if let Some(ticket) = ticket {
                assert_eq!(session.apply_reveal_all(ticket), RevealAllOutcome::Stale);
                assert!(session.revealed_indices().is_empty());
            }
        }
    }

    #[test]
    fn configure_rejected_while_playing() {
        let mut session = started(3);

        assert_eq!(
            session.configure(5, 100),
            Err(SessionError::IllegalTransition {
                operation: Operation::Configure,
                phase: Phase::Playing
            })
        );
        assert_eq!(session.mine_count(), 3);
        assert_eq!(session.bet_amount(), 10);
    }

    #[test]
    fn configure_outside_playing() {
        let mut session = session(3);
        session.configure(24, 0).unwrap();
        assert_eq!(session.mine_count(), 24);
        assert!(session.is_demo());

        assert!(matches!(
            session.configure(26, 0),
            Err(SessionError::InvalidConfiguration(_))
        ));
        assert_eq!(session.mine_count(), 24);

        let mut lost = started(25);
        lost.reveal_tile(0).unwrap();
        lost.configure(1, 5).unwrap();
        assert_eq!(lost.mine_count(), 1);
    }

    #[test]
    fn cash_out_needs_a_gem_first() {
        let mut session = started(3);
        assert!(session.cash_out().is_err());

        let gems = gems(&session);
        session.reveal_tile(gems[0]).unwrap();
        session.reveal_tile(gems[1]).unwrap();
        let round = session.round();

        let receipt = session.cash_out().unwrap();
        assert_eq!(
            receipt,
            CashOut {
                round,
                bet_amount: 10,
                gems_revealed: 2
            }
        );
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.revealed_indices().is_empty());
    }

    #[test]
    fn reveal_all_applies_once_for_its_round() {
        let mut session = started(25);
        session.reveal_tile(3).unwrap();
        let ticket = session.pending_reveal_all().unwrap();

        assert_eq!(session.apply_reveal_all(ticket), RevealAllOutcome::Applied);
        assert_eq!(session.revealed_indices().len(), 25);
        assert_eq!(session.phase(), Phase::Lost);
        assert_eq!(session.apply_reveal_all(ticket), RevealAllOutcome::Stale);
    }

    #[test]
    fn reveal_all_after_reset_is_stale() {
        let mut session = started(25);
        session.reveal_tile(3).unwrap();
        let ticket = session.pending_reveal_all().unwrap();

        session.reset();
        assert_eq!(session.apply_reveal_all(ticket), RevealAllOutcome::Stale);
        assert!(session.revealed_indices().is_empty());

        session.start_round().unwrap();
        assert_eq!(session.apply_reveal_all(ticket), RevealAllOutcome::Stale);
        assert!(session.revealed_indices().is_empty());
        assert_eq!(session.phase(), Phase::Playing);
    }

    #[test]
    fn rounds_differ_but_session_seed_is_reproducible() {
        let mut a = session(5);
        let mut b = session(5);
        let mut layouts = Vec::new();

        for _ in 0..4 {
            a.start_round().unwrap();
            b.start_round().unwrap();
            assert_eq!(mines(&a), mines(&b));
            layouts.push(mines(&a));
            a.reset();
            b.reset();
        }
        layouts.dedup();
        assert!(layouts.len() > 1);
    }

    #[test]
    fn snapshot_hides_unrevealed_mines() {
        let mut session = started(3);
        let gem = gems(&session)[0];
        session.reveal_tile(gem).unwrap();

        let snapshot = session.snapshot();
        assert_eq!(snapshot.phase, Phase::Playing);
        assert_eq!(snapshot.revealed, vec![gem]);
        assert_eq!(snapshot.tiles[usize::from(gem)], TileView::Gem);
        assert_eq!(
            snapshot.tiles.iter().filter(|view| view.is_hidden()).count(),
            24
        );

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: SessionSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}
