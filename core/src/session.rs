use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::*;

/// Layouts tried on the first click before giving up on a zero start cell.
pub const MAX_SAFE_START_ATTEMPTS: u32 = 10_000;

/// The elapsed-time display has three digits.
pub const MAX_ELAPSED_SECS: u32 = 999;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    #[default]
    NotStarted,
    Active,
    Won,
    Lost,
}

impl SessionState {
    pub const fn is_started(self) -> bool {
        !matches!(self, Self::NotStarted)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    NoChange,
    Revealed(RevealOutcome),
    Won(RevealOutcome),
    Lost(DisclosureReport),
}

impl MoveOutcome {
    pub const fn has_update(&self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

/// One game from the first click to a win or loss. Starting a new game means building a new
/// session; nothing carries over.
#[derive(Clone, Debug)]
pub struct GameSession {
    board: Board,
    state: SessionState,
    rng: SmallRng,
    started_at: Option<Instant>,
    ended_at: Option<Instant>,
    disclosure: Option<DisclosureReport>,
}

impl GameSession {
    pub fn new(difficulty: Difficulty, seed: u64) -> Self {
        Self::with_board(Board::new(difficulty), seed)
    }

    pub fn for_level(level: u8, seed: u64) -> Self {
        Self::new(Difficulty::from_level(level), seed)
    }

    /// An already initialized board is played as is, without the safe start shuffle.
    pub fn with_board(board: Board, seed: u64) -> Self {
        Self {
            board,
            state: SessionState::default(),
            rng: SmallRng::seed_from_u64(seed),
            started_at: None,
            ended_at: None,
            disclosure: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    /// The on-screen counter, mine count minus placed flags.
    pub fn flags_remaining(&self) -> CellCount {
        self.board.bomb_count() - self.board.used_flag_count()
    }

    pub fn elapsed_secs(&self, now: Instant) -> u32 {
        let Some(started_at) = self.started_at else {
            return 0;
        };
        let secs = self
            .ended_at
            .unwrap_or(now)
            .saturating_duration_since(started_at)
            .as_secs();
        secs.min(u64::from(MAX_ELAPSED_SECS)) as u32
    }

    pub fn disclosure(&self) -> Option<&DisclosureReport> {
        self.disclosure.as_ref()
    }

    pub fn reveal(&mut self, index: CellIndex, now: Instant) -> MoveOutcome {
        if self.state.is_finished() {
            return MoveOutcome::NoChange;
        }

        if !self.state.is_started() {
            self.start(index, now);
        }

        let cell = self.board.cell(index);
        if cell.is_mined() {
            if cell.is_flagged() {
                return MoveOutcome::NoChange;
            }
            let report = self.board.trigger_loss(index);
            self.finish(SessionState::Lost, now);
            self.disclosure = Some(report.clone());
            return MoveOutcome::Lost(report);
        }

        let outcome = self.board.reveal_cell(index);
        if self.board.is_won() {
            self.finish(SessionState::Won, now);
            MoveOutcome::Won(outcome)
        } else if outcome.has_update() {
            MoveOutcome::Revealed(outcome)
        } else {
            MoveOutcome::NoChange
        }
    }

    /// Ignored until the first reveal has laid out the board, and after the game ends.
    pub fn toggle_flag(&mut self, index: CellIndex) -> FlagOutcome {
        if !matches!(self.state, SessionState::Active) {
            return FlagOutcome::NoChange;
        }
        self.board.toggle_flag(index)
    }

    fn start(&mut self, index: CellIndex, now: Instant) {
        if !self.board.is_initialized() {
            self.initialize_safe_start(index);
        }
        self.state = SessionState::Active;
        self.started_at = Some(now);
        log::debug!("game started at cell {:?}", self.board.coords_of(index));
    }

    fn initialize_safe_start(&mut self, index: CellIndex) {
        // the start cell and its neighbors must all fit outside the mines
        let clear_zone = self.board.adjacency(index).len() + 1;
        let total = usize::from(self.board.total_cells());
        if usize::from(self.board.bomb_count()) + clear_zone > total {
            log::debug!("Too many mines for a zero start cell, fallback to simple safe");
        } else {
            for attempt in 1..=MAX_SAFE_START_ATTEMPTS {
                self.board.initialize(&mut self.rng);
                let cell = self.board.cell(index);
                if !cell.is_mined() && cell.adjacent_mine_count() == 0 {
                    log::trace!("zero start cell after {} layouts", attempt);
                    return;
                }
            }
            log::warn!("Cannot make start cell zero, fallback to simple safe");
        }

        for _ in 0..MAX_SAFE_START_ATTEMPTS {
            self.board.initialize(&mut self.rng);
            if !self.board.cell(index).is_mined() {
                return;
            }
        }

        log::warn!("Cannot make start cell safe, fallback to random");
    }

    fn finish(&mut self, state: SessionState, now: Instant) {
        self.state = state;
        self.ended_at = Some(now);
        log::debug!(
            "game finished: {:?} after {}s",
            state,
            self.elapsed_secs(now)
        );
    }
}
