use std::time::Duration;

use crossterm::event::KeyEvent;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::{
    prelude::*,
    style::{Style, Stylize},
    widgets::*,
};

use crate::grid::{HEIGHT, WIDTH};
use crate::input::{self, is_ctrl_c};
use crate::progress::{Progress, ScoreReport, ROLE_PRICE};
use crate::role::Role;
use crate::session::{Collision, DeathCause, Input, Phase, Session, TickEvent, TickResult};

#[derive(Debug)]
enum Screen {
    Intro,
    ChooseRole {
        notice: Option<String>,
    },
    Shop {
        notice: Option<String>,
    },
    Playing {
        session: Box<Session>,
        last: TickResult,
    },
    GameOver {
        last: TickResult,
        report: ScoreReport,
    },
    Exit,
}

/// Menus, shop and the running session, driven by the terminal loop in `main`.
pub struct App {
    screen: Screen,
    progress: Progress,
    seed: Option<u64>,
    sessions_started: u64,
    pending: Option<Input>,
}

impl App {
    pub fn new(seed: Option<u64>) -> Self {
        App {
            screen: Screen::Intro,
            progress: Progress::default(),
            seed,
            sessions_started: 0,
            pending: None,
        }
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn should_exit(&self) -> bool {
        matches!(self.screen, Screen::Exit)
    }

    /// Timer period while the snake is moving on its own. `None` means wait for a key.
    pub fn frame_delay(&self) -> Option<Duration> {
        match &self.screen {
            Screen::Playing { session, .. } if session.phase() == Phase::Running => {
                Some(session.frame_delay())
            }
            _ => None,
        }
    }

    fn start_session(&mut self, role: Role) {
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(self.sessions_started)),
            None => StdRng::from_entropy(),
        };
        self.sessions_started += 1;
        self.pending = None;

        let session = Box::new(Session::with_rng(role, rng));
        let last = session.status();
        self.screen = Screen::Playing { session, last };
    }

    fn after_tick(&mut self, result: TickResult) {
        if let Screen::Playing { last, .. } = &mut self.screen {
            *last = result;
        }
        let over = matches!(&self.screen, Screen::Playing { last, .. } if last.is_over);
        if over {
            if let Screen::Playing { last, .. } =
                std::mem::replace(&mut self.screen, Screen::Exit)
            {
                let report = self.progress.record_score(last.score);
                self.screen = Screen::GameOver { last, report };
            }
        }
    }

    /// Advances the running session by one frame using at most one buffered input.
    pub fn update(&mut self) {
        let input = self.pending.take();
        let result = match &mut self.screen {
            Screen::Playing { session, .. } if session.phase() == Phase::Running => {
                session.tick(input)
            }
            _ => return,
        };
        self.after_tick(result);
    }

    pub fn handle_input(&mut self, key: KeyEvent) {
        if !input::is_press(&key) {
            return;
        }
        if is_ctrl_c(&key) {
            info!("Exit requested");
            self.screen = Screen::Exit;
            return;
        }

        match &mut self.screen {
            Screen::Intro => {
                self.screen = Screen::ChooseRole { notice: None };
            }
            Screen::ChooseRole { notice } => match input::menu_choice(&key, 4) {
                Some(4) => self.screen = Screen::Shop { notice: None },
                Some(n) => {
                    let role = Role::ALL[usize::from(n - 1)];
                    if self.progress.is_unlocked(role) {
                        self.start_session(role);
                    } else {
                        *notice = Some(format!(
                            "{} is locked. Unlock it in the shop first.",
                            role.name()
                        ));
                    }
                }
                None => {}
            },
            Screen::Shop { notice } => {
                let role = match input::menu_choice(&key, 3) {
                    Some(1) => Role::ClearSkill,
                    Some(2) => Role::ReviveSkill,
                    Some(_) => {
                        self.screen = Screen::ChooseRole { notice: None };
                        return;
                    }
                    None => return,
                };
                *notice = Some(match self.progress.purchase(role) {
                    Ok(()) => format!("Unlocked {}!", role.name()),
                    Err(e) => {
                        warn!("Purchase of {:?} rejected: {}", role, e);
                        format!("Cannot buy {}: {}", role.name(), e)
                    }
                });
            }
            Screen::Playing { session, .. } => {
                let Some(intent) = input::map_key(key) else {
                    return;
                };
                if matches!(session.phase(), Phase::AwaitingEscape { .. }) {
                    let result = session.tick(Some(intent));
                    self.after_tick(result);
                } else if self.pending.is_none() {
                    self.pending = Some(intent);
                }
            }
            Screen::GameOver { .. } => match input::menu_choice(&key, 3) {
                Some(1) => self.screen = Screen::ChooseRole { notice: None },
                Some(2) => self.screen = Screen::Shop { notice: None },
                Some(_) => self.screen = Screen::Exit,
                None => {}
            },
            Screen::Exit => {}
        }
    }

    pub fn render(&self, frame: &mut Frame) {
        let header = format!(
            "VALOSNAKE    High Score: {}    Points: {}",
            self.progress.high_score, self.progress.points
        );

        let layout = Layout::default()
            .direction(layout::Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(frame.area());

        frame.render_widget(
            Paragraph::new(header)
                .alignment(Alignment::Left)
                .block(Block::default().borders(Borders::ALL)),
            layout[0],
        );

        match &self.screen {
            Screen::Intro => render_menu(frame, layout[1], "Welcome", intro_lines()),
            Screen::ChooseRole { notice } => render_menu(
                frame,
                layout[1],
                "Choose your role",
                self.role_lines(notice.as_deref()),
            ),
            Screen::Shop { notice } => render_menu(
                frame,
                layout[1],
                "Shop",
                self.shop_lines(notice.as_deref()),
            ),
            Screen::Playing { session, last } => {
                let [board, status] = board_layout(layout[1]);
                frame.render_widget(&last.snapshot, board);
                frame.render_widget(
                    Paragraph::new(status_lines(session.role(), last)),
                    status,
                );
            }
            Screen::GameOver { last, report } => {
                let [board, status] = board_layout(layout[1]);
                frame.render_widget(&last.snapshot, board);
                frame.render_widget(
                    Paragraph::new(game_over_lines(last, report))
                        .block(Block::default().title("GAME OVER").borders(Borders::ALL)),
                    status,
                );
            }
            Screen::Exit => {}
        }
    }

    fn role_lines(&self, notice: Option<&str>) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        for (i, role) in Role::ALL.iter().enumerate() {
            let lock = match (role.has_skill(), self.progress.is_unlocked(*role)) {
                (false, _) => "",
                (true, true) => " [unlocked]",
                (true, false) => " [locked]",
            };
            lines.push(Line::from(format!(
                "  {} - {} ({}){}",
                i + 1,
                role.name(),
                role.skill_description(),
                lock
            )));
        }
        lines.push(Line::from("  4 - Shop"));
        lines.push(Line::from(""));
        lines.push(Line::from(format!("Points: {}", self.progress.points)));
        push_notice(&mut lines, notice);
        lines
    }

    fn shop_lines(&self, notice: Option<&str>) -> Vec<Line<'static>> {
        let price = |role: Role| {
            if self.progress.is_unlocked(role) {
                "[unlocked]".to_string()
            } else {
                format!("[price: {} points]", ROLE_PRICE)
            }
        };
        let mut lines = vec![
            Line::from(format!("Points: {}", self.progress.points)),
            Line::from(""),
            Line::from(format!(
                "  1 - {}  {}",
                Role::ClearSkill.name(),
                price(Role::ClearSkill)
            )),
            Line::from(format!(
                "  2 - {}  {}",
                Role::ReviveSkill.name(),
                price(Role::ReviveSkill)
            )),
            Line::from("  3 - Back"),
        ];
        push_notice(&mut lines, notice);
        lines
    }
}

fn push_notice(lines: &mut Vec<Line<'static>>, notice: Option<&str>) {
    if let Some(notice) = notice {
        lines.push(Line::from(""));
        lines.push(Line::from(notice.to_string()).yellow());
    }
}

fn intro_lines() -> Vec<Line<'static>> {
    vec![
        Line::from("Eat food to grow and score. Spend your score to unlock heroes."),
        Line::from("Don't hit the walls or yourself."),
        Line::from(""),
        Line::from("Move: W A S D or arrow keys    Skill: K    Quit: Esc"),
        Line::from(""),
        Line::from("Press any key to continue").bold(),
    ]
}

fn render_menu(frame: &mut Frame, area: Rect, title: &str, lines: Vec<Line<'static>>) {
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().title(title.to_string()).borders(Borders::ALL)),
        area,
    );
}

fn board_layout(area: Rect) -> [Rect; 2] {
    let parts = Layout::default()
        .direction(layout::Direction::Vertical)
        .constraints([Constraint::Length(HEIGHT as u16), Constraint::Min(0)])
        .split(area);
    let board = Rect {
        width: parts[0].width.min(WIDTH as u16),
        ..parts[0]
    };
    [board, parts[1]]
}

fn status_lines(role: Role, last: &TickResult) -> Vec<Line<'static>> {
    let mut role_line = format!("Role: {} | Energy: {}", role.name(), last.energy);
    if role == Role::ReviveSkill {
        role_line.push_str(&format!(" | Revives left: {}", last.revive_charges));
    }

    let mut lines = vec![
        Line::from(format!("Score: {}", last.score)),
        Line::from(format!(
            "Length: {} | Food: {}",
            last.length, last.food_count
        )),
        Line::from(role_line),
        Line::from(match last.oldest_food_age {
            Some(age) => format!("Oldest food: {}s", age.as_secs()),
            None => "Oldest food: -".to_string(),
        }),
        Line::from(format!("Skill: {}", role.skill_description())),
        Line::from("Controls: W A S D or arrows | K skill | Esc quit"),
    ];

    for event in &last.events {
        if let TickEvent::SkillUsed { cleared, .. } = event {
            if role == Role::ClearSkill {
                lines.push(Line::from(format!("Orbital Beam cleared {} food", cleared)).cyan());
            } else {
                lines.push(Line::from("Three More Lives: revives refilled").cyan());
            }
        }
    }

    if let Phase::AwaitingEscape { threat } = last.phase {
        let what = match threat {
            Collision::Wall => "the wall",
            Collision::Body => "yourself",
        };
        lines.push(
            Line::from(format!(
                "You hit {}! A revive was used. Press a direction to escape...",
                what
            ))
            .yellow()
            .bold(),
        );
    }
    lines
}

fn game_over_lines(last: &TickResult, report: &ScoreReport) -> Vec<Line<'static>> {
    let cause = match last.phase {
        Phase::GameOver(DeathCause::Collision(Collision::Wall)) => "Hit the wall",
        Phase::GameOver(DeathCause::Collision(Collision::Body)) => "Bit yourself",
        _ => "Quit",
    };
    let record = if report.new_record {
        Line::from(format!("New record! High score: {}", report.high_score)).green()
    } else {
        Line::from(format!("High score: {}", report.high_score))
    };

    let mut lines = vec![
        Line::from(format!("{} | Score: {} | Length: {}", cause, report.score, last.length)),
        record,
    ];
    // Nothing is banked for a scoreless run
    if report.points_earned > 0 {
        lines.push(Line::from(format!(
            "Points earned: +{} | Total points: {}",
            report.points_earned, report.total_points
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from("1 - Play again    2 - Shop    3 - Quit").style(Style::default().bold()));
    lines
}
