use thiserror::Error;

use crate::{CellCount, CellIndex};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Cell index {index} is outside a board of {total} cells")]
    InvalidIndex { index: CellIndex, total: CellCount },
    #[error("Too many mines, {mines} requested for {total} cells")]
    TooManyMines { mines: CellCount, total: CellCount },
}

pub type Result<T> = core::result::Result<T, GameError>;
