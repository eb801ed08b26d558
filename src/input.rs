use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::grid::Direction;
use crate::session::Input;

/// Decodes a raw key into a game intent. Arrows and WASD (any case) steer, K fires the skill.
pub fn map_key(key: KeyEvent) -> Option<Input> {
    match key.code {
        KeyCode::Up => Some(Input::Move(Direction::Up)),
        KeyCode::Down => Some(Input::Move(Direction::Down)),
        KeyCode::Left => Some(Input::Move(Direction::Left)),
        KeyCode::Right => Some(Input::Move(Direction::Right)),
        KeyCode::Esc => Some(Input::Quit),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'w' => Some(Input::Move(Direction::Up)),
            's' => Some(Input::Move(Direction::Down)),
            'a' => Some(Input::Move(Direction::Left)),
            'd' => Some(Input::Move(Direction::Right)),
            'k' => Some(Input::UseSkill),
            _ => None,
        },
        _ => None,
    }
}

pub fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Release events show up on some platforms. Only presses count.
pub fn is_press(key: &KeyEvent) -> bool {
    key.kind != KeyEventKind::Release
}

/// Numbered menu choice, `1`..=`max`.
pub fn menu_choice(key: &KeyEvent, max: u8) -> Option<u8> {
    match key.code {
        KeyCode::Char(c) => c
            .to_digit(10)
            .map(|d| d as u8)
            .filter(|d| (1..=max).contains(d)),
        _ => None,
    }
}
