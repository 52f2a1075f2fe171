use serde::{Deserialize, Serialize};

/// One grid position. The adjacent mine count is fixed once the board is laid out.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    mined: bool,
    flagged: bool,
    revealed: bool,
    triggered: bool,
    adjacent_mine_count: u8,
}

impl Cell {
    pub(crate) const fn mine() -> Self {
        Self {
            mined: true,
            flagged: false,
            revealed: false,
            triggered: false,
            adjacent_mine_count: 0,
        }
    }

    pub const fn is_mined(self) -> bool {
        self.mined
    }

    pub const fn is_flagged(self) -> bool {
        self.flagged
    }

    pub const fn is_revealed(self) -> bool {
        self.revealed
    }

    /// Only the mine whose reveal lost the game.
    pub const fn is_triggered(self) -> bool {
        self.triggered
    }

    pub const fn adjacent_mine_count(self) -> u8 {
        self.adjacent_mine_count
    }

    pub const fn is_incorrect_flag(self) -> bool {
        self.flagged && !self.mined
    }

    pub(crate) fn set_adjacent_mine_count(&mut self, count: u8) {
        self.adjacent_mine_count = count;
    }

    pub(crate) fn set_flagged(&mut self, flagged: bool) {
        self.flagged = flagged;
    }

    pub(crate) fn mark_revealed(&mut self) {
        self.revealed = true;
    }

    pub(crate) fn mark_triggered(&mut self) {
        self.triggered = true;
    }
}
