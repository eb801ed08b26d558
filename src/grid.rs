use std::fmt;

pub const WIDTH: i32 = 40;
pub const HEIGHT: i32 = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Cell { x, y }
    }

    pub fn offset(&self, delta: CellDelta) -> Cell {
        Cell {
            x: self.x + delta.x,
            y: self.y + delta.y,
        }
    }

    pub fn step(&self, direction: Direction) -> Cell {
        self.offset(direction.into())
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellDelta {
    pub x: i32,
    pub y: i32,
}

impl From<Direction> for CellDelta {
    fn from(dir: Direction) -> Self {
        match dir {
            Direction::Up => CellDelta { x: 0, y: -1 },
            Direction::Down => CellDelta { x: 0, y: 1 },
            Direction::Left => CellDelta { x: -1, y: 0 },
            Direction::Right => CellDelta { x: 1, y: 0 },
        }
    }
}

/// The outermost ring of the board is wall. Anything beyond it counts as wall too.
pub fn is_out_of_bounds(cell: Cell) -> bool {
    cell.x <= 0 || cell.x >= WIDTH - 1 || cell.y <= 0 || cell.y >= HEIGHT - 1
}

/// Every playable cell in row-major order.
pub fn interior_cells() -> impl Iterator<Item = Cell> {
    (1..HEIGHT - 1).flat_map(|y| (1..WIDTH - 1).map(move |x| Cell::new(x, y)))
}

pub const INTERIOR_AREA: usize = ((WIDTH - 2) * (HEIGHT - 2)) as usize;
