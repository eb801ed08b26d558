use std::collections::VecDeque;

use crate::error::SetupError;
use crate::grid::{self, Cell, Direction, HEIGHT, WIDTH};

pub const MIN_SNAKE_LENGTH: usize = 3;

/// Occupied cells, head first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snake {
    body: VecDeque<Cell>,
}

impl Default for Snake {
    fn default() -> Self {
        let (mid_x, mid_y) = (WIDTH / 2, HEIGHT / 2);
        Snake {
            body: (0..MIN_SNAKE_LENGTH as i32)
                .map(|i| Cell::new(mid_x - i, mid_y))
                .collect(),
        }
    }
}

impl Snake {
    /// Builds a snake from explicit cells, head first.
    pub fn from_cells(cells: impl IntoIterator<Item = Cell>) -> Result<Self, SetupError> {
        let body: VecDeque<Cell> = cells.into_iter().collect();
        if body.len() < MIN_SNAKE_LENGTH {
            return Err(SetupError::SnakeTooShort {
                min: MIN_SNAKE_LENGTH,
                actual: body.len(),
            });
        }
        for (i, cell) in body.iter().enumerate() {
            if grid::is_out_of_bounds(*cell) {
                return Err(SetupError::OutOfBounds(*cell));
            }
            if body.iter().take(i).any(|c| c == cell) {
                return Err(SetupError::DuplicateBodyCell(*cell));
            }
        }
        Ok(Snake { body })
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn tail(&self) -> Cell {
        self.body[self.body.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.body.iter()
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    pub fn proposed_head(&self, direction: Direction) -> Cell {
        self.head().step(direction)
    }

    /// Stacks `n` copies of the tail onto the end. They unfold as the snake moves.
    pub fn grow_by(&mut self, n: usize) {
        let tail = self.tail();
        self.body.extend(std::iter::repeat(tail).take(n));
    }

    pub fn advance(&mut self, new_head: Cell, ate: bool) {
        self.body.push_front(new_head);
        if !ate {
            self.body.pop_back();
        }
    }
}
