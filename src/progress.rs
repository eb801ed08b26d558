use log::info;

use crate::error::ShopError;
use crate::role::Role;

/// Points needed to unlock a skill role.
pub const ROLE_PRICE: u32 = 500;

/// Progress carried between sessions for the lifetime of the process.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Progress {
    pub points: u32,
    pub unlocked_clear: bool,
    pub unlocked_revive: bool,
    pub high_score: u32,
}

/// Outcome of banking a finished session's score.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoreReport {
    pub score: u32,
    pub high_score: u32,
    pub new_record: bool,
    pub points_earned: u32,
    pub total_points: u32,
}

impl Progress {
    pub fn is_unlocked(&self, role: Role) -> bool {
        match role {
            Role::Normal => true,
            Role::ClearSkill => self.unlocked_clear,
            Role::ReviveSkill => self.unlocked_revive,
        }
    }

    /// Updates the high score and converts the score into points one for one.
    pub fn record_score(&mut self, score: u32) -> ScoreReport {
        let new_record = score > self.high_score;
        if new_record {
            self.high_score = score;
            info!("New high score: {}", score);
        }
        self.points += score;

        ScoreReport {
            score,
            high_score: self.high_score,
            new_record,
            points_earned: score,
            total_points: self.points,
        }
    }

    pub fn purchase(&mut self, role: Role) -> Result<(), ShopError> {
        let unlocked = match role {
            Role::Normal => return Err(ShopError::NotForSale(role)),
            Role::ClearSkill => &mut self.unlocked_clear,
            Role::ReviveSkill => &mut self.unlocked_revive,
        };
        if *unlocked {
            return Err(ShopError::AlreadyUnlocked(role));
        }
        if self.points < ROLE_PRICE {
            return Err(ShopError::InsufficientPoints {
                needed: ROLE_PRICE,
                available: self.points,
            });
        }

        self.points -= ROLE_PRICE;
        *unlocked = true;
        info!("Unlocked {:?}, {} points left", role, self.points);
        Ok(())
    }
}
