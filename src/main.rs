use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::info;
use ratatui::prelude::*;
use std::io;
use std::time::Instant;

use valosnake::app::App;
use valosnake::config::Config;

fn main() -> Result<(), io::Error> {
    let config = Config::parse();

    // Set up logging before anything else
    config.init_logging()?;
    info!("Starting Valosnake");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.hide_cursor()?;

    let mut app = App::new(config.seed);
    let outcome = run(&mut terminal, &mut app);

    // Cleanup terminal, even when the loop failed
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    outcome?;

    let progress = app.progress();
    info!(
        "Exiting with high score {} and {} points",
        progress.high_score, progress.points
    );
    println!("Thanks for playing!");
    println!("High score: {}", progress.high_score);
    println!("Points: {}", progress.points);

    Ok(())
}

fn run<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let mut last_tick = Instant::now();

    while !app.should_exit() {
        terminal.draw(|f| app.render(f))?;

        match app.frame_delay() {
            Some(tick_rate) => {
                let timeout = tick_rate.saturating_sub(last_tick.elapsed());
                if event::poll(timeout)? {
                    if let Event::Key(key) = event::read()? {
                        app.handle_input(key);
                    }
                }

                if last_tick.elapsed() >= tick_rate {
                    app.update();
                    last_tick = Instant::now();
                }
            }
            // Menus and the revive prompt wait on the player
            None => {
                if let Event::Key(key) = event::read()? {
                    app.handle_input(key);
                }
                last_tick = Instant::now();
            }
        }
    }

    Ok(())
}
