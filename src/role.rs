/// Energy spent by one skill activation.
pub const SKILL_COST: u32 = 10;
/// Charges granted by the revive skill. Also the cap on held charges.
pub const MAX_REVIVE_CHARGES: u8 = 3;

/// Playable character, fixed for the whole session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// Plain snake without a skill.
    Normal,
    /// "Orbital Beam": eats every food on the board at once.
    ClearSkill,
    /// "Three More Lives": grants escape charges for fatal collisions.
    ReviveSkill,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Normal, Role::ClearSkill, Role::ReviveSkill];

    pub fn has_skill(&self) -> bool {
        !matches!(self, Role::Normal)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Role::Normal => "Snake",
            Role::ClearSkill => "Inferno",
            Role::ReviveSkill => "Phoenix",
        }
    }

    pub fn skill_description(&self) -> &'static str {
        match self {
            Role::Normal => "none",
            Role::ClearSkill => "Orbital Beam: press K to spend 10 energy and eat every food on the board",
            Role::ReviveSkill => "Three More Lives: press K to spend 10 energy for 3 escape charges",
        }
    }
}
