use serde::{Deserialize, Serialize};

use crate::*;

/// The three preset tiers, selected by level 1, 2 or 3.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Self; 3] = [Self::Easy, Self::Medium, Self::Hard];

    /// Any level other than 1 or 2 selects the hardest preset.
    pub const fn from_level(level: u8) -> Self {
        match level {
            1 => Self::Easy,
            2 => Self::Medium,
            _ => Self::Hard,
        }
    }

    pub const fn level(self) -> u8 {
        match self {
            Self::Easy => 1,
            Self::Medium => 2,
            Self::Hard => 3,
        }
    }

    pub const fn config(self) -> GameConfig {
        match self {
            Self::Easy => GameConfig::new_unchecked((10, 10), 20),
            Self::Medium => GameConfig::new_unchecked((16, 16), 40),
            Self::Hard => GameConfig::new_unchecked((30, 16), 99),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }

    pub const fn easier(self) -> Self {
        match self {
            Self::Easy | Self::Medium => Self::Easy,
            Self::Hard => Self::Medium,
        }
    }

    pub const fn harder(self) -> Self {
        match self {
            Self::Easy => Self::Medium,
            Self::Medium | Self::Hard => Self::Hard,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_match_levels() {
        assert_eq!(Difficulty::from_level(1).config().size, (10, 10));
        assert_eq!(Difficulty::from_level(1).config().mines, 20);
        assert_eq!(Difficulty::from_level(2).config().size, (16, 16));
        assert_eq!(Difficulty::from_level(2).config().mines, 40);
        assert_eq!(Difficulty::from_level(3).config().size, (30, 16));
        assert_eq!(Difficulty::from_level(3).config().mines, 99);
    }

    #[test]
    fn unknown_level_falls_back_to_hardest() {
        assert_eq!(Difficulty::from_level(0), Difficulty::Hard);
        assert_eq!(Difficulty::from_level(7), Difficulty::Hard);
    }

    #[test]
    fn stepping_clamps_at_both_ends() {
        assert_eq!(Difficulty::Easy.easier(), Difficulty::Easy);
        assert_eq!(Difficulty::Easy.harder(), Difficulty::Medium);
        assert_eq!(Difficulty::Hard.harder(), Difficulty::Hard);
        assert_eq!(Difficulty::Hard.easier().easier(), Difficulty::Easy);
    }

    #[test]
    fn every_preset_leaves_room_for_a_zero_start() {
        for difficulty in Difficulty::ALL {
            let config = difficulty.config();
            assert!(config.mines + 9 <= config.total_cells());
            assert_eq!(Difficulty::from_level(difficulty.level()), difficulty);
        }
    }
}
