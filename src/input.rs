use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::{Duration, Instant};

/// Semantic keys the game understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    MoveLeft,
    MoveRight,
    /// One shot per press
    Fire,
    /// Only honoured after game over
    Restart,
    Quit,
}

impl Key {
    /// Map a terminal key code onto a game key.
    pub fn from_code(code: KeyCode, modifiers: KeyModifiers) -> Option<Self> {
        match code {
            KeyCode::Char('c') | KeyCode::Char('C') if modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Key::Quit)
            }
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Key::MoveLeft),
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Key::MoveRight),
            KeyCode::Char(' ') | KeyCode::Char('1') => Some(Key::Fire),
            KeyCode::Char('r') | KeyCode::Char('R') => Some(Key::Restart),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Key::Quit),
            _ => None,
        }
    }
}

/// Keys currently held down, in the order they were pressed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySet {
    keys: Vec<Key>,
}

impl KeySet {
    pub fn press(&mut self, key: Key) {
        if !self.keys.contains(&key) {
            self.keys.push(key);
        }
    }

    pub fn release(&mut self, key: Key) {
        self.keys.retain(|held| *held != key);
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.keys.contains(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Key> {
        self.keys.iter()
    }
}

/// A key going down or coming back up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Pressed(Key),
    Released(Key),
}

/// Without release reports, a key is considered up once no press or repeat
/// has arrived for this long. The first repeat only comes after the
/// terminal's initial delay, hence the longer grace period.
const INITIAL_REPEAT_DELAY: Duration = Duration::from_millis(600);
const REPEAT_GAP: Duration = Duration::from_millis(150);

#[derive(Debug, Clone, Copy)]
struct HeldKey {
    key: Key,
    last_seen: Instant,
    repeating: bool,
}

impl HeldKey {
    fn is_stale(&self, now: Instant) -> bool {
        let grace = if self.repeating {
            REPEAT_GAP
        } else {
            INITIAL_REPEAT_DELAY
        };
        now.saturating_duration_since(self.last_seen) > grace
    }
}

/// Polls terminal events and translates them into [`InputEvent`]s
pub struct InputManager {
    /// Whether the terminal reports key releases
    reports_releases: bool,
    held: Vec<HeldKey>,
    events: Vec<InputEvent>,
}

impl InputManager {
    /// Terminals without the keyboard enhancement protocol never send
    /// releases; for those, auto-repeat keeps a key held and it is released
    /// once the repeats stop.
    pub fn new(reports_releases: bool) -> Self {
        Self {
            reports_releases,
            held: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Drain every pending terminal event without blocking.
    /// Should be called once per frame before taking the events.
    pub fn poll_events(&mut self) -> color_eyre::Result<()> {
        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key_event) = event::read()? {
                self.handle_key_event_at(key_event, Instant::now());
            }
        }
        self.release_stale(Instant::now());

        Ok(())
    }

    /// Processes a key event and records the resulting transition
    pub fn handle_key_event(&mut self, key_event: KeyEvent) {
        self.handle_key_event_at(key_event, Instant::now());
    }

    /// Like [`Self::handle_key_event`] with an explicit arrival time.
    pub fn handle_key_event_at(&mut self, key_event: KeyEvent, now: Instant) {
        let Some(key) = Key::from_code(key_event.code, key_event.modifiers) else {
            return;
        };

        match key_event.kind {
            // Legacy terminals report auto-repeat as further presses
            KeyEventKind::Press | KeyEventKind::Repeat => {
                if let Some(held) = self.held.iter_mut().find(|held| held.key == key) {
                    held.last_seen = now;
                    held.repeating = true;
                } else if key_event.kind == KeyEventKind::Press {
                    self.held.push(HeldKey {
                        key,
                        last_seen: now,
                        repeating: false,
                    });
                    self.events.push(InputEvent::Pressed(key));
                }
            }
            KeyEventKind::Release => self.release(key),
        }
    }

    /// Release keys whose repeats have stopped arriving. Does nothing on
    /// terminals that report releases themselves.
    pub fn release_stale(&mut self, now: Instant) {
        if self.reports_releases {
            return;
        }
        let stale: Vec<Key> = self
            .held
            .iter()
            .filter(|held| held.is_stale(now))
            .map(|held| held.key)
            .collect();
        for key in stale {
            self.release(key);
        }
    }

    fn release(&mut self, key: Key) {
        if let Some(index) = self.held.iter().position(|held| held.key == key) {
            self.held.remove(index);
            self.events.push(InputEvent::Released(key));
        }
    }

    /// Take the transitions collected since the last call, oldest first.
    pub fn take_events(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::game::Game;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Press)
    }

    fn release(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Release)
    }

    fn repeat(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Repeat)
    }

    #[test]
    fn test_key_mapping() {
        let none = KeyModifiers::NONE;
        assert_eq!(Key::from_code(KeyCode::Left, none), Some(Key::MoveLeft));
        assert_eq!(Key::from_code(KeyCode::Char('d'), none), Some(Key::MoveRight));
        assert_eq!(Key::from_code(KeyCode::Char('1'), none), Some(Key::Fire));
        assert_eq!(Key::from_code(KeyCode::Char(' '), none), Some(Key::Fire));
        assert_eq!(Key::from_code(KeyCode::Char('r'), none), Some(Key::Restart));
        assert_eq!(Key::from_code(KeyCode::Esc, none), Some(Key::Quit));
        assert_eq!(
            Key::from_code(KeyCode::Char('c'), KeyModifiers::CONTROL),
            Some(Key::Quit)
        );
        assert_eq!(Key::from_code(KeyCode::Char('c'), none), None);
    }

    #[test]
    fn test_key_set_keeps_press_order_without_duplicates() {
        let mut keys = KeySet::default();
        keys.press(Key::MoveRight);
        keys.press(Key::MoveLeft);
        keys.press(Key::MoveRight);
        let held: Vec<Key> = keys.iter().copied().collect();
        assert_eq!(held, vec![Key::MoveRight, Key::MoveLeft]);

        keys.release(Key::MoveRight);
        assert!(!keys.is_held(Key::MoveRight));
        assert!(keys.is_held(Key::MoveLeft));
    }

    #[test]
    fn test_press_and_release_events() {
        let mut input = InputManager::new(true);
        input.handle_key_event(press(KeyCode::Left));
        input.handle_key_event(release(KeyCode::Left));
        assert_eq!(
            input.take_events(),
            vec![
                InputEvent::Pressed(Key::MoveLeft),
                InputEvent::Released(Key::MoveLeft)
            ]
        );
        assert!(input.take_events().is_empty());
    }

    #[test]
    fn test_repeats_do_not_retrigger() {
        let mut input = InputManager::new(true);
        input.handle_key_event(press(KeyCode::Char(' ')));
        input.handle_key_event(repeat(KeyCode::Char(' ')));
        input.handle_key_event(press(KeyCode::Char(' ')));
        assert_eq!(input.take_events(), vec![InputEvent::Pressed(Key::Fire)]);
    }

    #[test]
    fn test_held_fire_without_release_reports_fires_once() {
        let start = Instant::now();
        let at = |ms: u64| start + Duration::from_millis(ms);
        let mut input = InputManager::new(false);
        let mut game = Game::new(GameConfig {
            seed: Some(1),
            ..GameConfig::default()
        });

        // Initial press, a 500 ms repeat delay, then a repeat every 33 ms
        let mut arrivals = vec![0];
        arrivals.extend((500..1200).step_by(33));
        let mut pending = arrivals.into_iter().peekable();

        let mut released_at = None;
        for frame in 0..100u64 {
            let now = at(frame * 16);
            while pending.peek().is_some_and(|ms| at(*ms) <= now) {
                pending.next();
                input.handle_key_event_at(press(KeyCode::Char(' ')), now);
            }
            input.release_stale(now);
            for event in input.take_events() {
                match event {
                    InputEvent::Pressed(key) => game.key_down(key),
                    InputEvent::Released(key) => {
                        game.key_up(key);
                        if released_at.is_none() {
                            released_at = Some(frame * 16);
                        }
                    }
                }
            }
        }

        assert_eq!(game.projectiles().in_flight(), 1);
        // Last repeat is seen on the 1200 ms frame, released 150 ms later
        assert_eq!(released_at, Some(1360));
    }

    #[test]
    fn test_held_movement_survives_frames_between_repeats() {
        let start = Instant::now();
        let mut input = InputManager::new(false);
        input.handle_key_event_at(press(KeyCode::Left), start);
        input.release_stale(start + Duration::from_millis(400));
        assert_eq!(input.take_events(), vec![InputEvent::Pressed(Key::MoveLeft)]);

        input.release_stale(start + Duration::from_millis(601));
        assert_eq!(input.take_events(), vec![InputEvent::Released(Key::MoveLeft)]);
    }

    #[test]
    fn test_release_reporting_terminals_never_time_out() {
        let start = Instant::now();
        let mut input = InputManager::new(true);
        input.handle_key_event_at(press(KeyCode::Right), start);
        input.release_stale(start + Duration::from_secs(5));
        assert_eq!(input.take_events(), vec![InputEvent::Pressed(Key::MoveRight)]);
    }

    #[test]
    fn test_unmapped_keys_are_ignored() {
        let mut input = InputManager::new(true);
        input.handle_key_event(press(KeyCode::Char('z')));
        assert!(input.take_events().is_empty());
    }
}
