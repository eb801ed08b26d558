use std::time::{Duration, Instant};

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::SetupError;
use crate::food::{Food, FoodPool, MAX_FOODS, MIN_FOODS};
use crate::grid::{self, Cell, Direction};
use crate::role::{Role, MAX_REVIVE_CHARGES, SKILL_COST};
use crate::snake::Snake;
use crate::snapshot::Snapshot;

pub const SCORE_PER_FOOD: u32 = 10;
pub const BASE_FRAME_MS: u64 = 100;
pub const MIN_FRAME_MS: u64 = 30;
/// Milliseconds shaved off the frame period per 10 points.
pub const FRAME_STEP_MS: u64 = 5;

/// Frame period for a given score. Never drops below `MIN_FRAME_MS`.
pub fn frame_delay_ms(score: u32) -> u64 {
    let speedup = u64::from(score / 10) * FRAME_STEP_MS;
    BASE_FRAME_MS.saturating_sub(speedup).max(MIN_FRAME_MS)
}

/// Abstract player intent, already decoded from raw keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Input {
    Move(Direction),
    UseSkill,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Collision {
    Wall,
    Body,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeathCause {
    Collision(Collision),
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Running,
    /// A revive charge was spent on `threat`; the next direction input decides the outcome.
    AwaitingEscape { threat: Collision },
    GameOver(DeathCause),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickEvent {
    Ate(Cell),
    SkillUsed { role: Role, cleared: usize },
    ReviveTriggered { threat: Collision, charges_left: u8 },
    Escaped(Direction),
    Died(DeathCause),
}

#[derive(Clone, Debug)]
pub struct TickResult {
    pub snapshot: Snapshot,
    pub score: u32,
    pub energy: u32,
    pub revive_charges: u8,
    pub length: usize,
    pub food_count: usize,
    pub oldest_food_age: Option<Duration>,
    pub phase: Phase,
    pub is_over: bool,
    pub events: Vec<TickEvent>,
}

/// Explicit starting state for a session, validated by [`Session::from_setup`].
#[derive(Clone, Debug)]
pub struct SessionSetup {
    pub role: Role,
    /// Head first.
    pub snake: Vec<Cell>,
    pub direction: Direction,
    pub foods: Vec<Cell>,
    pub score: u32,
    pub energy: u32,
    pub revive_charges: u8,
}

impl SessionSetup {
    pub fn new(role: Role) -> Self {
        SessionSetup {
            role,
            snake: Snake::default().cells().copied().collect(),
            direction: Direction::Right,
            foods: Vec::new(),
            score: 0,
            energy: 0,
            revive_charges: 0,
        }
    }
}

#[derive(Debug)]
pub struct Session<R = StdRng> {
    rng: R,
    role: Role,
    snake: Snake,
    foods: FoodPool,
    direction: Direction,
    next_direction: Direction,
    score: u32,
    energy: u32,
    revive_charges: u8,
    phase: Phase,
}

impl Session<StdRng> {
    pub fn new(role: Role) -> Self {
        Session::with_rng(role, StdRng::from_entropy())
    }
}

impl<R: Rng> Session<R> {
    /// Fresh game: default snake heading right and a random starting spread of food.
    pub fn with_rng(role: Role, rng: R) -> Self {
        let mut session = Session {
            rng,
            role,
            snake: Snake::default(),
            foods: FoodPool::default(),
            direction: Direction::Right,
            next_direction: Direction::Right,
            score: 0,
            energy: 0,
            revive_charges: 0,
            phase: Phase::Running,
        };

        let now = Instant::now();
        let initial = session.rng.gen_range(MIN_FOODS..=MAX_FOODS);
        for _ in 0..initial {
            let _ = session.foods.spawn(&session.snake, &mut session.rng, now);
        }

        info!(
            "Session started as {:?} with {} foods",
            role,
            session.foods.len()
        );
        session
    }

    /// Restores a session from an explicit state, rejecting states the game could never reach.
    pub fn from_setup(setup: SessionSetup, rng: R, now: Instant) -> Result<Self, SetupError> {
        let snake = Snake::from_cells(setup.snake)?;

        if setup.foods.len() > MAX_FOODS {
            return Err(SetupError::TooManyFoods {
                max: MAX_FOODS,
                actual: setup.foods.len(),
            });
        }
        let mut foods = FoodPool::default();
        for pos in setup.foods {
            if grid::is_out_of_bounds(pos) {
                return Err(SetupError::OutOfBounds(pos));
            }
            if snake.occupies(pos) || foods.contains(pos) {
                return Err(SetupError::FoodOverlap(pos));
            }
            foods.insert(Food {
                pos,
                spawned_at: now,
            });
        }

        if setup.revive_charges > MAX_REVIVE_CHARGES {
            return Err(SetupError::TooManyCharges {
                max: MAX_REVIVE_CHARGES,
                actual: setup.revive_charges,
            });
        }
        if setup.energy > 0 && !setup.role.has_skill() {
            return Err(SetupError::EnergyWithoutSkill(setup.role));
        }
        if setup.revive_charges > 0 && setup.role != Role::ReviveSkill {
            return Err(SetupError::ChargesWithoutRevive(setup.role));
        }

        Ok(Session {
            rng,
            role: setup.role,
            snake,
            foods,
            direction: setup.direction,
            next_direction: setup.direction,
            score: setup.score,
            energy: setup.energy,
            revive_charges: setup.revive_charges,
            phase: Phase::Running,
        })
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn energy(&self) -> u32 {
        self.energy
    }

    pub fn revive_charges(&self) -> u8 {
        self.revive_charges
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, Phase::GameOver(_))
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn foods(&self) -> &FoodPool {
        &self.foods
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn next_direction(&self) -> Direction {
        self.next_direction
    }

    pub fn frame_delay_ms(&self) -> u64 {
        frame_delay_ms(self.score)
    }

    pub fn frame_delay(&self) -> Duration {
        Duration::from_millis(self.frame_delay_ms())
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.snake, &self.foods)
    }

    pub fn status(&self) -> TickResult {
        self.result(Vec::new(), Instant::now())
    }

    pub fn tick(&mut self, input: Option<Input>) -> TickResult {
        self.tick_at(input, Instant::now())
    }

    /// Advances one frame, sampling food ages against `now`.
    pub fn tick_at(&mut self, input: Option<Input>, now: Instant) -> TickResult {
        let mut events = Vec::new();
        match self.phase {
            Phase::Running => self.step(input, now, &mut events),
            Phase::AwaitingEscape { threat } => self.escape(threat, input, now, &mut events),
            Phase::GameOver(_) => {}
        }
        self.result(events, now)
    }

    /// Queues a turn. Reversing onto the neck is ignored.
    pub fn queue_direction(&mut self, direction: Direction) {
        if direction != self.direction.opposite() {
            self.next_direction = direction;
        }
    }

    /// Spends energy on the role's skill. The cost is paid even if the skill has nothing to act on.
    pub fn use_skill(&mut self) -> Option<TickEvent> {
        if self.phase != Phase::Running || !self.role.has_skill() || self.energy < SKILL_COST {
            return None;
        }
        self.energy -= SKILL_COST;

        let cleared = match self.role {
            Role::ClearSkill => {
                let cleared = self.foods.clear();
                self.score += SCORE_PER_FOOD * cleared as u32;
                self.snake.grow_by(cleared);
                cleared
            }
            Role::ReviveSkill => {
                self.revive_charges = MAX_REVIVE_CHARGES;
                0
            }
            Role::Normal => 0,
        };

        info!(
            "{:?} skill used, {} foods cleared, energy left {}",
            self.role, cleared, self.energy
        );
        Some(TickEvent::SkillUsed {
            role: self.role,
            cleared,
        })
    }

    fn step(&mut self, input: Option<Input>, now: Instant, events: &mut Vec<TickEvent>) {
        match input {
            Some(Input::Move(direction)) => self.queue_direction(direction),
            Some(Input::UseSkill) => events.extend(self.use_skill()),
            Some(Input::Quit) => {
                self.finish(DeathCause::Quit, events);
                return;
            }
            None => {}
        }

        self.direction = self.next_direction;
        let head = self.snake.proposed_head(self.direction);

        match self.collision_at(head) {
            None => self.move_to(head, now, events),
            Some(threat) if self.role == Role::ReviveSkill && self.revive_charges > 0 => {
                self.revive_charges -= 1;
                self.phase = Phase::AwaitingEscape { threat };
                info!(
                    "Revive triggered by {:?}, {} charges left",
                    threat, self.revive_charges
                );
                events.push(TickEvent::ReviveTriggered {
                    threat,
                    charges_left: self.revive_charges,
                });
            }
            Some(threat) => self.finish(DeathCause::Collision(threat), events),
        }
    }

    fn escape(
        &mut self,
        threat: Collision,
        input: Option<Input>,
        now: Instant,
        events: &mut Vec<TickEvent>,
    ) {
        match input {
            Some(Input::Quit) => self.finish(DeathCause::Quit, events),
            Some(Input::Move(direction)) if direction != self.direction.opposite() => {
                let head = self.snake.proposed_head(direction);
                match self.collision_at(head) {
                    Some(collision) => {
                        info!("Escape {:?} from {:?} failed", direction, threat);
                        self.finish(DeathCause::Collision(collision), events);
                    }
                    None => {
                        info!("Escaped {:?} heading {:?}", threat, direction);
                        self.direction = direction;
                        self.next_direction = direction;
                        self.phase = Phase::Running;
                        events.push(TickEvent::Escaped(direction));
                        self.move_to(head, now, events);
                    }
                }
            }
            _ => {}
        }
    }

    /// Walls are checked first; the body check uses the body before this tick's move.
    fn collision_at(&self, head: Cell) -> Option<Collision> {
        if grid::is_out_of_bounds(head) {
            Some(Collision::Wall)
        } else if self.snake.occupies(head) {
            Some(Collision::Body)
        } else {
            None
        }
    }

    fn move_to(&mut self, head: Cell, now: Instant, events: &mut Vec<TickEvent>) {
        let ate = self.foods.take_at(head).is_some();
        if ate {
            self.score += SCORE_PER_FOOD;
            if self.role.has_skill() {
                self.energy += 1;
            }
            debug!("Ate food at {}, score {}", head, self.score);
            events.push(TickEvent::Ate(head));
        }

        self.snake.advance(head, ate);
        self.foods.maintain(&self.snake, &mut self.rng, now);
    }

    fn finish(&mut self, cause: DeathCause, events: &mut Vec<TickEvent>) {
        self.phase = Phase::GameOver(cause);
        info!(
            "Game over ({:?}): score {}, length {}",
            cause,
            self.score,
            self.snake.len()
        );
        events.push(TickEvent::Died(cause));
    }

    fn result(&self, events: Vec<TickEvent>, now: Instant) -> TickResult {
        TickResult {
            snapshot: self.snapshot(),
            score: self.score,
            energy: self.energy,
            revive_charges: self.revive_charges,
            length: self.snake.len(),
            food_count: self.foods.len(),
            oldest_food_age: self.foods.oldest_age(now),
            phase: self.phase,
            is_over: self.is_over(),
            events,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{HEIGHT, WIDTH};

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn setup(setup: SessionSetup) -> Session {
        Session::from_setup(setup, rng(), Instant::now()).unwrap()
    }

    /// A snake whose head sits right next to the right-hand wall, heading into it.
    fn against_wall(role: Role) -> SessionSetup {
        let x = WIDTH - 2;
        SessionSetup {
            snake: vec![Cell::new(x, 5), Cell::new(x - 1, 5), Cell::new(x - 2, 5)],
            ..SessionSetup::new(role)
        }
    }

    /// A 5-cell hook: heading Left from (5,5) runs into its own body at (4,5).
    fn hooked(role: Role) -> SessionSetup {
        SessionSetup {
            snake: vec![
                Cell::new(5, 5),
                Cell::new(5, 6),
                Cell::new(4, 6),
                Cell::new(4, 5),
                Cell::new(4, 4),
            ],
            direction: Direction::Up,
            ..SessionSetup::new(role)
        }
    }

    #[test]
    fn test_frame_delay() {
        assert_eq!(frame_delay_ms(0), 100);
        assert_eq!(frame_delay_ms(9), 100);
        assert_eq!(frame_delay_ms(10), 95);
        assert_eq!(frame_delay_ms(100), 50);
        assert_eq!(frame_delay_ms(140), 30);
        assert_eq!(frame_delay_ms(500), 30);
        assert_eq!(frame_delay_ms(u32::MAX), 30);

        let mut previous = frame_delay_ms(0);
        for score in (0..1_000).step_by(10) {
            let delay = frame_delay_ms(score);
            assert!(delay <= previous, "delay rose at score {score}");
            assert!(delay >= MIN_FRAME_MS);
            previous = delay;
        }
    }

    #[test]
    fn test_new_session() {
        let session = Session::with_rng(Role::Normal, rng());
        assert_eq!(session.phase(), Phase::Running);
        assert_eq!(session.snake().len(), 3);
        assert_eq!(session.snake().head(), Cell::new(WIDTH / 2, HEIGHT / 2));
        assert_eq!(session.direction(), Direction::Right);
        assert!((MIN_FOODS..=MAX_FOODS).contains(&session.foods().len()));
        assert_eq!(session.frame_delay_ms(), 100);
    }

    #[test]
    fn test_from_setup_rejects_invalid_state() {
        let now = Instant::now();
        let bad = |s: SessionSetup| Session::from_setup(s, rng(), now).unwrap_err();

        assert_eq!(
            bad(SessionSetup {
                energy: 5,
                ..SessionSetup::new(Role::Normal)
            }),
            SetupError::EnergyWithoutSkill(Role::Normal)
        );
        assert_eq!(
            bad(SessionSetup {
                revive_charges: 1,
                ..SessionSetup::new(Role::ClearSkill)
            }),
            SetupError::ChargesWithoutRevive(Role::ClearSkill)
        );
        assert_eq!(
            bad(SessionSetup {
                revive_charges: 4,
                ..SessionSetup::new(Role::ReviveSkill)
            }),
            SetupError::TooManyCharges { max: 3, actual: 4 }
        );
        assert_eq!(
            bad(SessionSetup {
                foods: vec![Cell::new(19, 10)],
                ..SessionSetup::new(Role::Normal)
            }),
            SetupError::FoodOverlap(Cell::new(19, 10))
        );
        assert_eq!(
            bad(SessionSetup {
                foods: vec![Cell::new(0, 3)],
                ..SessionSetup::new(Role::Normal)
            }),
            SetupError::OutOfBounds(Cell::new(0, 3))
        );
        assert_eq!(
            bad(SessionSetup {
                foods: (1..=8).map(|x| Cell::new(x, 1)).collect(),
                ..SessionSetup::new(Role::Normal)
            }),
            SetupError::TooManyFoods { max: 7, actual: 8 }
        );
    }

    #[test]
    fn test_tick_reports_oldest_food_age() {
        let start = Instant::now();
        let mut session = Session::from_setup(
            SessionSetup {
                foods: vec![Cell::new(2, 2), Cell::new(3, 3), Cell::new(4, 4)],
                ..SessionSetup::new(Role::Normal)
            },
            rng(),
            start,
        )
        .unwrap();

        let result = session.tick_at(None, start + Duration::from_secs(6));
        assert_eq!(result.oldest_food_age, Some(Duration::from_secs(6)));
    }

    #[test]
    fn test_plain_move_keeps_length() {
        let mut session = setup(SessionSetup::new(Role::Normal));
        let result = session.tick(None);

        assert!(!result.is_over);
        assert_eq!(result.length, 3);
        assert_eq!(session.snake().head(), Cell::new(21, 10));
        assert!((MIN_FOODS..=MAX_FOODS).contains(&result.food_count));
    }

    #[test]
    fn test_normal_role_eats_three_foods() {
        let mut session = setup(SessionSetup {
            foods: vec![Cell::new(21, 10), Cell::new(22, 10), Cell::new(23, 10)],
            ..SessionSetup::new(Role::Normal)
        });

        for _ in 0..3 {
            let result = session.tick(None);
            assert!(matches!(result.events.as_slice(), [TickEvent::Ate(_)]));
        }

        assert_eq!(session.score(), 30);
        assert_eq!(session.snake().len(), 6);
        assert_eq!(session.energy(), 0, "normal role never gains energy");
        assert_eq!(session.phase(), Phase::Running);
        assert_eq!(session.frame_delay_ms(), 85);
    }

    #[test]
    fn test_skill_roles_gain_energy() {
        let mut session = setup(SessionSetup {
            foods: vec![Cell::new(21, 10)],
            ..SessionSetup::new(Role::ReviveSkill)
        });
        let result = session.tick(None);
        assert_eq!(result.energy, 1);
        assert_eq!(result.score, 10);
    }

    #[test]
    fn test_reverse_input_is_ignored() {
        let mut session = setup(SessionSetup::new(Role::Normal));
        session.queue_direction(Direction::Left);
        assert_eq!(session.next_direction(), Direction::Right);

        let _ = session.tick(Some(Input::Move(Direction::Left)));
        assert_eq!(session.next_direction(), Direction::Right);
        assert_eq!(session.snake().head(), Cell::new(21, 10));

        let _ = session.tick(Some(Input::Move(Direction::Up)));
        assert_eq!(session.direction(), Direction::Up);
        assert_eq!(session.snake().head(), Cell::new(21, 9));
    }

    #[test]
    fn test_wall_collision_ends_game() {
        let mut session = setup(against_wall(Role::Normal));
        let result = session.tick(None);

        assert!(result.is_over);
        assert_eq!(
            result.phase,
            Phase::GameOver(DeathCause::Collision(Collision::Wall))
        );
        assert_eq!(result.length, 3, "dead snake does not move");
    }

    #[test]
    fn test_self_collision_ends_game() {
        let mut session = setup(hooked(Role::Normal));
        let result = session.tick(Some(Input::Move(Direction::Left)));
        assert_eq!(
            result.phase,
            Phase::GameOver(DeathCause::Collision(Collision::Body))
        );
    }

    #[test]
    fn test_moving_onto_the_tail_collides() {
        // A 2x2 loop: the next head is the current tail cell.
        let mut session = setup(SessionSetup {
            snake: vec![
                Cell::new(5, 5),
                Cell::new(6, 5),
                Cell::new(6, 6),
                Cell::new(5, 6),
            ],
            direction: Direction::Left,
            ..SessionSetup::new(Role::Normal)
        });
        let result = session.tick(Some(Input::Move(Direction::Down)));
        assert_eq!(
            result.phase,
            Phase::GameOver(DeathCause::Collision(Collision::Body))
        );
    }

    #[test]
    fn test_game_over_is_terminal() {
        let mut session = setup(against_wall(Role::Normal));
        let _ = session.tick(None);
        let before = (session.score(), session.snake().clone());

        let result = session.tick(Some(Input::Move(Direction::Up)));
        assert!(result.is_over);
        assert!(result.events.is_empty());
        assert_eq!((session.score(), session.snake().clone()), before);
    }

    #[test]
    fn test_quit_changes_nothing_else() {
        let mut session = setup(SessionSetup {
            foods: vec![Cell::new(21, 10)],
            ..SessionSetup::new(Role::Normal)
        });
        let result = session.tick(Some(Input::Quit));

        assert_eq!(result.phase, Phase::GameOver(DeathCause::Quit));
        assert_eq!(result.score, 0);
        assert_eq!(session.snake().head(), Cell::new(20, 10));
        assert_eq!(result.food_count, 1);
    }

    #[test]
    fn test_clear_skill() {
        let foods = vec![
            Cell::new(2, 2),
            Cell::new(3, 3),
            Cell::new(4, 4),
            Cell::new(5, 5),
        ];
        let mut session = setup(SessionSetup {
            foods,
            energy: 10,
            ..SessionSetup::new(Role::ClearSkill)
        });

        let event = session.use_skill();
        assert_eq!(
            event,
            Some(TickEvent::SkillUsed {
                role: Role::ClearSkill,
                cleared: 4
            })
        );
        assert_eq!(session.score(), 40);
        assert_eq!(session.snake().len(), 7);
        assert!(session.foods().is_empty());
        assert_eq!(session.energy(), 0);

        let result = session.tick(None);
        assert_eq!(result.length, 7);
        assert!(
            (MIN_FOODS..=MAX_FOODS).contains(&result.food_count),
            "pool refilled by the next maintenance pass"
        );
    }

    #[test]
    fn test_clear_skill_through_tick() {
        let mut session = setup(SessionSetup {
            foods: vec![Cell::new(2, 2), Cell::new(3, 3)],
            energy: 12,
            ..SessionSetup::new(Role::ClearSkill)
        });
        let result = session.tick(Some(Input::UseSkill));

        assert_eq!(result.score, 20);
        assert_eq!(result.length, 5);
        assert_eq!(result.energy, 2);
        assert_eq!(
            result.events,
            vec![TickEvent::SkillUsed {
                role: Role::ClearSkill,
                cleared: 2
            }]
        );
    }

    #[test]
    fn test_clear_skill_with_no_food_still_costs_energy() {
        let mut session = setup(SessionSetup {
            energy: 10,
            ..SessionSetup::new(Role::ClearSkill)
        });
        assert!(session.use_skill().is_some());
        assert_eq!(session.energy(), 0);
        assert_eq!(session.score(), 0);
        assert_eq!(session.snake().len(), 3);
    }

    #[test]
    fn test_skill_needs_energy() {
        let mut session = setup(SessionSetup {
            energy: 9,
            ..SessionSetup::new(Role::ReviveSkill)
        });
        assert_eq!(session.use_skill(), None);
        assert_eq!(session.energy(), 9);
        assert_eq!(session.revive_charges(), 0);

        let mut normal = setup(SessionSetup::new(Role::Normal));
        assert_eq!(normal.use_skill(), None);
    }

    #[test]
    fn test_revive_skill_resets_charges() {
        let mut session = setup(SessionSetup {
            energy: 20,
            revive_charges: 2,
            ..SessionSetup::new(Role::ReviveSkill)
        });
        assert!(session.use_skill().is_some());
        assert_eq!(session.revive_charges(), 3, "reset, not stacked");
        assert!(session.use_skill().is_some());
        assert_eq!(session.revive_charges(), 3);
        assert_eq!(session.energy(), 0);
    }

    #[test]
    fn test_revive_without_charges_dies_immediately() {
        let mut session = setup(against_wall(Role::ReviveSkill));
        let result = session.tick(None);
        assert_eq!(
            result.phase,
            Phase::GameOver(DeathCause::Collision(Collision::Wall))
        );
    }

    #[test]
    fn test_revive_escape_from_self_collision() {
        let mut session = setup(SessionSetup {
            revive_charges: 1,
            ..hooked(Role::ReviveSkill)
        });

        let result = session.tick(Some(Input::Move(Direction::Left)));
        assert_eq!(
            result.phase,
            Phase::AwaitingEscape {
                threat: Collision::Body
            }
        );
        assert_eq!(result.revive_charges, 0);
        assert_eq!(session.snake().head(), Cell::new(5, 5), "nothing moved yet");

        let result = session.tick(Some(Input::Move(Direction::Up)));
        assert_eq!(result.phase, Phase::Running);
        assert_eq!(result.revive_charges, 0);
        assert_eq!(session.snake().head(), Cell::new(5, 4));
        assert_eq!(session.direction(), Direction::Up);
        assert_eq!(session.next_direction(), Direction::Up);
        assert!(result.events.contains(&TickEvent::Escaped(Direction::Up)));
    }

    #[test]
    fn test_escape_waits_for_a_usable_direction() {
        let mut session = setup(SessionSetup {
            revive_charges: 2,
            ..against_wall(Role::ReviveSkill)
        });
        let _ = session.tick(None);

        for input in [
            None,
            Some(Input::UseSkill),
            Some(Input::Move(Direction::Left)),
        ] {
            let result = session.tick(input);
            assert_eq!(
                result.phase,
                Phase::AwaitingEscape {
                    threat: Collision::Wall
                },
                "{input:?} should not resolve the escape"
            );
        }

        let result = session.tick(Some(Input::Move(Direction::Down)));
        assert_eq!(result.phase, Phase::Running);
        assert_eq!(result.revive_charges, 1);
        assert_eq!(session.snake().head(), Cell::new(WIDTH - 2, 6));
    }

    #[test]
    fn test_failed_escape_ends_game() {
        let mut session = setup(SessionSetup {
            revive_charges: 3,
            ..against_wall(Role::ReviveSkill)
        });
        let _ = session.tick(None);
        let result = session.tick(Some(Input::Move(Direction::Right)));
        assert_eq!(
            result.phase,
            Phase::GameOver(DeathCause::Collision(Collision::Wall))
        );
        assert_eq!(result.revive_charges, 2);
    }

    #[test]
    fn test_escape_into_own_body_ends_game() {
        let mut session = setup(SessionSetup {
            revive_charges: 1,
            ..hooked(Role::ReviveSkill)
        });
        let _ = session.tick(Some(Input::Move(Direction::Left)));

        // Right would reverse the blocked heading, so it is not an escape option.
        let result = session.tick(Some(Input::Move(Direction::Right)));
        assert!(!result.is_over);

        let result = session.tick(Some(Input::Move(Direction::Down)));
        assert_eq!(
            result.phase,
            Phase::GameOver(DeathCause::Collision(Collision::Body))
        );
    }

    #[test]
    fn test_quit_while_awaiting_escape() {
        let mut session = setup(SessionSetup {
            revive_charges: 1,
            ..against_wall(Role::ReviveSkill)
        });
        let _ = session.tick(None);
        let result = session.tick(Some(Input::Quit));
        assert_eq!(result.phase, Phase::GameOver(DeathCause::Quit));
    }

    #[test]
    fn test_escape_can_eat() {
        let mut session = setup(SessionSetup {
            revive_charges: 1,
            foods: vec![Cell::new(WIDTH - 2, 4)],
            energy: 3,
            ..against_wall(Role::ReviveSkill)
        });
        let _ = session.tick(None);
        let result = session.tick(Some(Input::Move(Direction::Up)));

        assert_eq!(result.score, 10);
        assert_eq!(result.energy, 4);
        assert_eq!(result.length, 4);
    }
}
