use thiserror::Error;

use crate::grid::Cell;
use crate::role::Role;

/// Rejected construction of a snake or a session. These are caller bugs, not game events.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SetupError {
    #[error("snake must be at least {min} cells long, got {actual}")]
    SnakeTooShort { min: usize, actual: usize },
    #[error("cell {0} is outside the playable area")]
    OutOfBounds(Cell),
    #[error("snake occupies cell {0} more than once")]
    DuplicateBodyCell(Cell),
    #[error("food at {0} overlaps the snake or another food")]
    FoodOverlap(Cell),
    #[error("at most {max} foods may be on the board, got {actual}")]
    TooManyFoods { max: usize, actual: usize },
    #[error("revive charges must be at most {max}, got {actual}")]
    TooManyCharges { max: u8, actual: u8 },
    #[error("role {0:?} cannot hold skill energy")]
    EnergyWithoutSkill(Role),
    #[error("role {0:?} cannot hold revive charges")]
    ChargesWithoutRevive(Role),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShopError {
    #[error("{0:?} is already unlocked")]
    AlreadyUnlocked(Role),
    #[error("not enough points: need {needed}, have {available}")]
    InsufficientPoints { needed: u32, available: u32 },
    #[error("{0:?} is not for sale")]
    NotForSale(Role),
}
