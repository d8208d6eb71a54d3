use color_eyre::Result;
use ratatui::{Terminal, backend::Backend};
use std::time::{Duration, Instant};

use crate::config::GameConfig;
use crate::game::Game;
use crate::input::{InputEvent, InputManager, Key};
use crate::renderer::GameRenderer;

/// The main application which holds the state and logic of the application.
pub struct App {
    running: bool,
    game: Game,
    /// Frame clock; `None` until the first frame is drawn
    last_frame_time: Option<Instant>,
    frame_sleep: Duration,
    /// internal components
    input_manager: InputManager,
    renderer: GameRenderer,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(config: GameConfig, frame_ms: u64, reports_releases: bool) -> Self {
        Self {
            running: true,
            game: Game::new(config),
            last_frame_time: None,
            frame_sleep: Duration::from_millis(frame_ms),
            input_manager: InputManager::new(reports_releases),
            renderer: GameRenderer::new(),
        }
    }

    /// Run the application's main loop.
    pub fn run<B: Backend>(mut self, terminal: &mut Terminal<B>) -> Result<()> {
        while self.running {
            self.input_manager.poll_events()?;
            let events = self.input_manager.take_events();
            self.process_events(&events);
            if !self.running {
                break;
            }

            let delta_ms = self.next_delta_ms();
            terminal.draw(|frame| self.renderer.render(frame, &mut self.game, delta_ms))?;

            std::thread::sleep(self.frame_sleep);
        }
        log::info!("Quit with score {}", self.game.score());
        Ok(())
    }

    /// Forward key transitions to the game; quit is handled here.
    fn process_events(&mut self, events: &[InputEvent]) {
        for event in events {
            match *event {
                InputEvent::Pressed(Key::Quit) => self.running = false,
                InputEvent::Pressed(key) => self.game.key_down(key),
                InputEvent::Released(key) => self.game.key_up(key),
            }
        }
    }

    /// Milliseconds since the previous frame; the first frame gets 0.
    fn next_delta_ms(&mut self) -> f32 {
        let now = Instant::now();
        let delta = self
            .last_frame_time
            .map(|last| now.duration_since(last).as_secs_f32() * 1000.0)
            .unwrap_or(0.0);
        self.last_frame_time = Some(now);
        delta
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    fn app() -> App {
        let config = GameConfig {
            seed: Some(3),
            ..GameConfig::default()
        };
        App::new(config, 0, true)
    }

    #[test]
    fn test_first_frame_delta_is_zero() {
        let mut app = app();
        assert_eq!(app.next_delta_ms(), 0.0);
        assert!(app.next_delta_ms() >= 0.0);
    }

    #[test]
    fn test_quit_stops_the_loop() {
        let mut app = app();
        app.process_events(&[InputEvent::Pressed(Key::Quit)]);
        assert!(!app.is_running());
    }

    #[test]
    fn test_events_reach_the_game() {
        let mut app = app();
        app.process_events(&[
            InputEvent::Pressed(Key::Fire),
            InputEvent::Released(Key::Fire),
            InputEvent::Pressed(Key::Fire),
            InputEvent::Pressed(Key::MoveRight),
        ]);
        assert_eq!(app.game().projectiles().in_flight(), 2);
        assert!(app.game().keys().is_held(Key::MoveRight));
        assert!(app.game().player().fire_latched);
    }

    #[test]
    fn test_frame_draws_into_terminal() {
        let mut app = app();
        let mut terminal = Terminal::new(TestBackend::new(80, 41)).unwrap();
        let delta_ms = app.next_delta_ms();
        terminal
            .draw(|frame| app.renderer.render(frame, &mut app.game, delta_ms))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = (0..buffer.area.height)
            .flat_map(|y| (0..buffer.area.width).map(move |x| (x, y)))
            .filter_map(|pos| buffer.cell(pos).map(|cell| cell.symbol().to_string()))
            .collect();
        assert!(text.contains("Score: 0"));
        assert!(text.contains("Wave: 1"));
    }
}
