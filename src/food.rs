use std::time::{Duration, Instant};

use log::{debug, warn};
use rand::Rng;

use crate::grid::{self, Cell, HEIGHT, WIDTH};
use crate::snake::Snake;

pub const MIN_FOODS: usize = 3;
pub const MAX_FOODS: usize = 7;
/// Foods at least this old become candidates for eviction.
pub const FOOD_LIFETIME: Duration = Duration::from_secs(8);
/// Chance per tick of adding one food when the pool is between its bounds.
pub const EXTRA_SPAWN_CHANCE: f64 = 0.30;
/// Random placements tried before falling back to a scan of the board.
const MAX_SPAWN_ATTEMPTS: usize = 256;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Food {
    pub pos: Cell,
    pub spawned_at: Instant,
}

impl Food {
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.spawned_at)
    }
}

#[derive(Clone, Debug, Default)]
pub struct FoodPool {
    foods: Vec<Food>,
}

impl FoodPool {
    pub fn len(&self) -> usize {
        self.foods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.foods.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Food> {
        self.foods.iter()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.foods.iter().any(|f| f.pos == cell)
    }

    /// Places a food directly. Callers are responsible for keeping cells free.
    pub(crate) fn insert(&mut self, food: Food) {
        self.foods.push(food);
    }

    pub fn take_at(&mut self, cell: Cell) -> Option<Food> {
        let index = self.foods.iter().position(|f| f.pos == cell)?;
        Some(self.foods.remove(index))
    }

    // Returns how many foods were removed.
    pub fn clear(&mut self) -> usize {
        let count = self.foods.len();
        self.foods.clear();
        count
    }

    pub fn oldest_age(&self, now: Instant) -> Option<Duration> {
        self.foods.iter().map(|f| f.age(now)).max()
    }

    fn is_free(&self, cell: Cell, snake: &Snake) -> bool {
        !snake.occupies(cell) && !self.contains(cell)
    }

    /// Drops a food on a random free interior cell. Returns `None` when the board is full.
    pub fn spawn(&mut self, snake: &Snake, rng: &mut impl Rng, now: Instant) -> Option<Cell> {
        let random_pick = (0..MAX_SPAWN_ATTEMPTS)
            .map(|_| Cell::new(rng.gen_range(1..WIDTH - 1), rng.gen_range(1..HEIGHT - 1)))
            .find(|cell| self.is_free(*cell, snake));

        let pos = match random_pick {
            Some(pos) => pos,
            None => {
                debug!("Random food placement exhausted, scanning for a free cell");
                match grid::interior_cells().find(|cell| self.is_free(*cell, snake)) {
                    Some(pos) => pos,
                    None => {
                        warn!("No free cell left for food, skipping spawn");
                        return None;
                    }
                }
            }
        };

        self.foods.push(Food {
            pos,
            spawned_at: now,
        });
        Some(pos)
    }

    /// Keeps the population between its bounds and retires at most one stale food.
    pub fn maintain(&mut self, snake: &Snake, rng: &mut impl Rng, now: Instant) {
        if self.foods.len() < MIN_FOODS {
            for _ in self.foods.len()..MIN_FOODS {
                if self.spawn(snake, rng, now).is_none() {
                    break;
                }
            }
            return;
        }

        if self.foods.len() < MAX_FOODS && rng.gen_bool(EXTRA_SPAWN_CHANCE) {
            let _ = self.spawn(snake, rng, now);
        }

        if self.foods.len() > MIN_FOODS {
            let stale: Vec<usize> = self
                .foods
                .iter()
                .enumerate()
                .filter(|(_, f)| f.age(now) >= FOOD_LIFETIME)
                .map(|(i, _)| i)
                .collect();

            if !stale.is_empty() {
                let evicted = self.foods.remove(stale[rng.gen_range(0..stale.len())]);
                debug!("Evicted stale food at {}", evicted.pos);
            }
        }
    }
}
