use alloc::vec;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealOutcome {
    NoChange,
    /// A safe cell bordering mines, no propagation.
    ExposedCount(u8),
    /// Every cell opened by a zero-count reveal, starting with the clicked one.
    Flood(Vec<CellIndex>),
    MineHit,
    MineDisclosed,
}

impl RevealOutcome {
    pub const fn has_update(&self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlagOutcome {
    NoChange,
    Flagged(CellCount),
    Unflagged(CellCount),
}

impl FlagOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }

    pub const fn flag_count(self) -> Option<CellCount> {
        match self {
            Self::NoChange => None,
            Self::Flagged(count) | Self::Unflagged(count) => Some(count),
        }
    }
}

/// End-of-game disclosure for a lost game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisclosureReport {
    pub triggered_index: CellIndex,
    pub disclosed_mine_indexes: Vec<CellIndex>,
    pub incorrect_flag_indexes: Vec<CellIndex>,
}

impl Board {
    /// Flagged and already revealed cells are left alone.
    pub fn reveal_cell(&mut self, index: CellIndex) -> RevealOutcome {
        let cell = self.cell(index);
        if cell.is_revealed() || cell.is_flagged() {
            return RevealOutcome::NoChange;
        }

        self.cell_mut(index).mark_revealed();

        if cell.is_mined() {
            if cell.is_triggered() {
                RevealOutcome::MineHit
            } else {
                RevealOutcome::MineDisclosed
            }
        } else if cell.adjacent_mine_count() == 0 {
            RevealOutcome::Flood(self.flood_from(index))
        } else {
            RevealOutcome::ExposedCount(cell.adjacent_mine_count())
        }
    }

    // `revealed` doubles as the visited marker, each cell is pushed at most once
    fn flood_from(&mut self, origin: CellIndex) -> Vec<CellIndex> {
        let mut opened = vec![origin];
        let mut to_visit = vec![origin];

        while let Some(current) = to_visit.pop() {
            for neighbor in self.adjacency(current) {
                let cell = self.cells()[neighbor];
                if cell.is_mined() || cell.is_revealed() || cell.is_flagged() {
                    continue;
                }

                self.cell_mut(neighbor).mark_revealed();
                opened.push(neighbor);
                if cell.adjacent_mine_count() == 0 {
                    to_visit.push(neighbor);
                }
            }
        }

        log::trace!("flood from {} opened {} cells", origin, opened.len());
        opened
    }

    /// New flags are refused once the flag count reaches the mine count.
    pub fn toggle_flag(&mut self, index: CellIndex) -> FlagOutcome {
        let cell = self.cell(index);
        if cell.is_revealed() {
            return FlagOutcome::NoChange;
        }

        if cell.is_flagged() {
            self.cell_mut(index).set_flagged(false);
            FlagOutcome::Unflagged(self.used_flag_count())
        } else if self.used_flag_count() < self.bomb_count() {
            self.cell_mut(index).set_flagged(true);
            FlagOutcome::Flagged(self.used_flag_count())
        } else {
            FlagOutcome::NoChange
        }
    }

    pub fn is_won(&self) -> bool {
        self.count_cells(|cell| cell.is_revealed() && !cell.is_mined()) == self.safe_cell_count()
    }

    pub fn trigger_loss(&mut self, index: CellIndex) -> DisclosureReport {
        let cell = self.cell(index);
        assert!(
            cell.is_mined() && !cell.is_flagged(),
            "only an unflagged mine can be triggered"
        );

        self.cell_mut(index).mark_triggered();
        let outcome = self.reveal_cell(index);
        debug_assert_eq!(outcome, RevealOutcome::MineHit);

        let mut disclosed_mine_indexes = Vec::new();
        let mut incorrect_flag_indexes = Vec::new();
        for i in 0..self.cells().len() {
            let cell = self.cells()[i];
            if cell.is_incorrect_flag() {
                incorrect_flag_indexes.push(i);
            } else if cell.is_mined() && !cell.is_flagged() && !cell.is_revealed() {
                self.reveal_cell(i);
                disclosed_mine_indexes.push(i);
            }
        }

        log::debug!(
            "mine {} triggered, {} mines disclosed, {} incorrect flags",
            index,
            disclosed_mine_indexes.len(),
            incorrect_flag_indexes.len()
        );
        DisclosureReport {
            triggered_index: index,
            disclosed_mine_indexes,
            incorrect_flag_indexes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(size: Coord2, mines: &[CellIndex]) -> Board {
        Board::from_mine_indexes(size, mines).unwrap()
    }

    fn revealed(board: &Board) -> Vec<CellIndex> {
        (0..board.cells().len())
            .filter(|&i| board.cell(i).is_revealed())
            .collect()
    }

    #[test]
    fn flood_opens_zero_region_and_its_border() {
        // 3x3 with a single mine in the bottom-right corner
        let mut board = board((3, 3), &[8]);

        let RevealOutcome::Flood(mut opened) = board.reveal_cell(0) else {
            panic!("expected flood");
        };
        opened.sort_unstable();
        assert_eq!(opened, vec![0, 1, 2, 3, 4, 5, 6, 7]);
        assert!(!board.cell(8).is_revealed());
        assert!(board.is_won());
    }

    #[test]
    fn flood_reports_each_cell_once() {
        let mut board = board((10, 10), &[99]);

        let RevealOutcome::Flood(opened) = board.reveal_cell(0) else {
            panic!("expected flood");
        };

        let mut deduped = opened.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(deduped.len(), opened.len());
        assert_eq!(opened.len(), 99);
        assert_eq!(opened[0], 0);
    }

    #[test]
    fn reveal_is_idempotent() {
        let mut board = board((3, 3), &[8]);
        board.reveal_cell(0);
        let before = board.clone();

        assert_eq!(board.reveal_cell(0), RevealOutcome::NoChange);
        assert_eq!(board.reveal_cell(4), RevealOutcome::NoChange);
        assert_eq!(board, before);
    }

    #[test]
    fn flood_stops_at_flagged_cells() {
        // mine in the bottom-right corner, flag on the left edge
        let mut board = board((4, 3), &[11]);
        board.toggle_flag(4);

        board.reveal_cell(0);

        assert!(!board.cell(4).is_revealed());
        assert!(board.cell(4).is_flagged());
        assert!(board.cell(8).is_revealed());
    }

    #[test]
    fn numbered_cell_exposes_count_without_flooding() {
        let mut board = board((10, 10), &[44, 46, 56]);

        assert_eq!(board.reveal_cell(45), RevealOutcome::ExposedCount(3));
        assert_eq!(revealed(&board), vec![45]);
    }

    #[test]
    fn reveal_on_flagged_cell_is_noop() {
        let mut board = board((3, 3), &[8]);
        board.toggle_flag(0);
        let before = board.clone();

        assert_eq!(board.reveal_cell(0), RevealOutcome::NoChange);
        assert_eq!(board, before);
    }

    #[test]
    fn untriggered_mine_is_disclosed() {
        let mut board = board((2, 2), &[0]);

        assert_eq!(board.reveal_cell(0), RevealOutcome::MineDisclosed);
        assert!(!board.cell(0).is_triggered());
    }

    #[test]
    fn flag_count_is_capped_at_mine_count() {
        let mut board = board((3, 3), &[0, 1]);

        assert_eq!(board.toggle_flag(5), FlagOutcome::Flagged(1));
        assert_eq!(board.toggle_flag(6), FlagOutcome::Flagged(2));
        assert_eq!(board.toggle_flag(7), FlagOutcome::NoChange);
        assert_eq!(board.used_flag_count(), 2);

        assert_eq!(board.toggle_flag(5), FlagOutcome::Unflagged(1));
        assert_eq!(board.toggle_flag(7), FlagOutcome::Flagged(2));
    }

    #[test]
    fn revealed_cell_cannot_be_flagged() {
        let mut board = board((2, 2), &[0]);
        board.reveal_cell(3);

        assert_eq!(board.toggle_flag(3), FlagOutcome::NoChange);
    }

    #[test]
    fn win_ignores_flags() {
        let mut board = board((2, 1), &[0]);
        assert!(!board.is_won());

        board.reveal_cell(1);

        assert!(board.is_won());
        assert_eq!(board.used_flag_count(), 0);
    }

    #[test]
    fn trigger_loss_discloses_unflagged_mines_and_reports_bad_flags() {
        let mut board = board((3, 3), &[0, 2, 6]);
        board.toggle_flag(2);
        board.toggle_flag(4);

        let report = board.trigger_loss(0);

        assert_eq!(report.triggered_index, 0);
        assert_eq!(report.disclosed_mine_indexes, vec![6]);
        assert_eq!(report.incorrect_flag_indexes, vec![4]);
        assert!(board.cell(0).is_triggered());
        assert!(board.cell(0).is_revealed());
        assert!(board.cell(6).is_revealed());
        assert!(!board.cell(6).is_triggered());
        assert!(!board.cell(2).is_revealed());
        assert!(!board.cell(4).is_revealed());
    }

    #[test]
    #[should_panic(expected = "unflagged mine")]
    fn trigger_loss_rejects_safe_cell() {
        let mut board = board((2, 2), &[0]);

        board.trigger_loss(1);
    }
}
