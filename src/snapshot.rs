use ratatui::prelude::*;

use crate::food::FoodPool;
use crate::grid::{self, Cell, HEIGHT, WIDTH};
use crate::snake::Snake;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tile {
    Wall,
    Empty,
    Food,
    Head,
    Body,
}

impl Tile {
    pub fn symbol(&self) -> char {
        match self {
            Tile::Wall => '#',
            Tile::Empty => ' ',
            Tile::Food => '*',
            Tile::Head => '@',
            Tile::Body => 'o',
        }
    }

    fn color(&self) -> Color {
        match self {
            Tile::Wall => Color::DarkGray,
            Tile::Empty => Color::Reset,
            Tile::Food => Color::LightRed,
            Tile::Head => Color::Yellow,
            Tile::Body => Color::Green,
        }
    }
}

/// Read-only picture of the board at the end of a tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    tiles: Vec<Tile>,
}

impl Snapshot {
    pub fn capture(snake: &Snake, foods: &FoodPool) -> Self {
        let mut tiles = Vec::with_capacity((WIDTH * HEIGHT) as usize);
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                tiles.push(if grid::is_out_of_bounds(Cell::new(x, y)) {
                    Tile::Wall
                } else {
                    Tile::Empty
                });
            }
        }

        let mut snapshot = Snapshot { tiles };
        for food in foods.iter() {
            snapshot.set(food.pos, Tile::Food);
        }
        snapshot.set(snake.head(), Tile::Head);
        for cell in snake.cells().skip(1) {
            snapshot.set(*cell, Tile::Body);
        }
        snapshot
    }

    fn index(cell: Cell) -> Option<usize> {
        if (0..WIDTH).contains(&cell.x) && (0..HEIGHT).contains(&cell.y) {
            Some((cell.y * WIDTH + cell.x) as usize)
        } else {
            None
        }
    }

    fn set(&mut self, cell: Cell, tile: Tile) {
        if let Some(i) = Self::index(cell) {
            self.tiles[i] = tile;
        }
    }

    /// Tile at `cell`; anything off the board reads as wall.
    pub fn tile(&self, cell: Cell) -> Tile {
        Self::index(cell).map_or(Tile::Wall, |i| self.tiles[i])
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.tiles.chunks(WIDTH as usize)
    }

    pub fn lines(&self) -> Vec<String> {
        self.rows()
            .map(|row| row.iter().map(Tile::symbol).collect())
            .collect()
    }
}

impl Widget for &Snapshot {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for (y, row) in self.rows().enumerate().take(area.height as usize) {
            for (x, tile) in row.iter().enumerate().take(area.width as usize) {
                buf[(area.x + x as u16, area.y + y as u16)]
                    .set_char(tile.symbol())
                    .set_fg(tile.color());
            }
        }
    }
}
