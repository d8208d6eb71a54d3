//! The frame loop: owns every entity and advances them once per frame.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::config::GameConfig;
use crate::entities::{Bounds, FrameContext, Player, ProjectilePool, Wave, check_collision};
use crate::input::{Key, KeySet};
use crate::renderer::{DrawSurface, TextAlign, TextSize, TextStyle};

/// Shared animation clock. Fires a one-frame pulse every `interval` ms so all
/// enemies animate in lockstep.
#[derive(Debug, Clone)]
pub struct SpriteTicker {
    timer: f32,
    interval: f32,
    pulse: bool,
}

impl SpriteTicker {
    pub fn new(interval: f32) -> Self {
        Self {
            timer: 0.0,
            interval,
            pulse: false,
        }
    }

    /// Advance by one frame. The frame that fires does not accumulate time.
    pub fn advance(&mut self, delta_ms: f32) -> bool {
        if self.timer > self.interval {
            self.pulse = true;
            self.timer = 0.0;
        } else {
            self.pulse = false;
            self.timer += delta_ms;
        }
        self.pulse
    }

    pub fn is_pulse(&self) -> bool {
        self.pulse
    }
}

/// Whether `count` cells of `size` still span less than `ratio` of `extent`.
/// Compared in f64 so a 0.6 cap of 800 is exactly 480.
fn fits_under_cap(count: u32, size: f32, extent: f32, ratio: f64) -> bool {
    f64::from(count) * f64::from(size) < f64::from(extent) * ratio
}

pub struct Game {
    config: GameConfig,
    keys: KeySet,
    player: Player,
    projectiles: ProjectilePool,
    waves: Vec<Wave>,
    /// Formation density of the next wave
    rows: u32,
    columns: u32,
    /// 1-based number of the wave being played
    wave: u32,
    score: u32,
    game_over: bool,
    sprite_ticker: SpriteTicker,
    rng: Pcg32,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        log::info!("Starting game with seed {seed}");
        let mut rng = Pcg32::seed_from_u64(seed);

        let first_wave = Wave::new(
            &config,
            config.initial_rows,
            config.initial_columns,
            &mut rng,
        );

        Self {
            keys: KeySet::default(),
            player: Player::new(&config.player, config.width, config.height),
            projectiles: ProjectilePool::new(config.projectile_count, &config.projectile),
            waves: vec![first_wave],
            rows: config.initial_rows,
            columns: config.initial_columns,
            wave: 1,
            score: 0,
            game_over: false,
            sprite_ticker: SpriteTicker::new(config.sprite_interval_ms),
            rng,
            config,
        }
    }

    /// Advance one frame without drawing anything.
    pub fn update(&mut self, delta_ms: f32) {
        self.step(delta_ms, None);
    }

    /// Advance one frame, drawing HUD, player, projectiles and enemies as
    /// each is processed.
    pub fn render(&mut self, surface: &mut dyn DrawSurface, delta_ms: f32) {
        self.step(delta_ms, Some(surface));
    }

    fn step(&mut self, delta_ms: f32, mut surface: Option<&mut dyn DrawSurface>) {
        let sprite_update = self.sprite_ticker.advance(delta_ms);

        if let Some(surface) = surface.as_deref_mut() {
            self.draw_status_text(surface);
            self.player.draw(surface);
        }
        self.player.update(&self.keys, self.config.width);

        self.projectiles.update();
        if let Some(surface) = surface.as_deref_mut() {
            self.projectiles.draw(surface);
        }

        // Waves spawned during this pass start moving next frame
        let wave_count = self.waves.len();
        for index in 0..wave_count {
            let mut ctx = FrameContext {
                projectiles: &mut self.projectiles,
                player: &mut self.player,
                score: &mut self.score,
                game_over: &mut self.game_over,
                sprite_update,
                game_width: self.config.width,
                game_height: self.config.height,
            };
            let wave = &mut self.waves[index];
            match surface.as_deref_mut() {
                Some(surface) => wave.render(surface, &mut ctx),
                None => {
                    wave.update(&mut ctx);
                    wave.sweep();
                }
            }

            if wave.is_cleared() && !wave.next_wave_triggered && !self.game_over {
                wave.next_wave_triggered = true;
                self.new_wave();
                self.wave += 1;
                self.player.lives += 1;
                log::info!(
                    "Wave {} incoming ({}x{}), {} lives left",
                    self.wave,
                    self.rows,
                    self.columns,
                    self.player.lives
                );
            }
        }

        log::trace!(
            "Frame {delta_ms:.1}ms: score {}, {} projectiles in flight, {} waves",
            self.score,
            self.projectiles.in_flight(),
            self.waves.len()
        );
    }

    fn draw_status_text(&self, surface: &mut dyn DrawSurface) {
        surface.save();
        surface.fill_text(&format!("Score: {}", self.score), 20.0, 40.0);
        surface.fill_text(&format!("Wave: {}", self.wave), 20.0, 80.0);
        for i in 0..self.player.lives.max(0) {
            surface.fill_rect(Bounds::new(30.0 + 10.0 * i as f32, 95.0, 5.0, 20.0));
        }

        if self.game_over {
            let center_x = self.config.width * 0.5;
            let center_y = self.config.height * 0.5;
            surface.set_text_style(TextStyle {
                align: TextAlign::Center,
                size: TextSize::Large,
            });
            surface.fill_text("GAME OVER", center_x, center_y);
            surface.set_text_style(TextStyle {
                align: TextAlign::Center,
                size: TextSize::Small,
            });
            surface.fill_text("Press R to Restart!", center_x, center_y + 30.0);
        }
        surface.restore();
    }

    /// Grow the formation by one column or one row (each capped by the
    /// playfield) and queue a new wave.
    pub fn new_wave(&mut self) {
        let size = self.config.enemy_size;
        let columns_fit = fits_under_cap(
            self.columns,
            size,
            self.config.width,
            self.config.column_cap_ratio,
        );
        let rows_fit =
            fits_under_cap(self.rows, size, self.config.height, self.config.row_cap_ratio);

        if self.rng.random_bool(0.5) && columns_fit {
            self.columns += 1;
        } else if rows_fit {
            self.rows += 1;
        }

        let wave = Wave::new(&self.config, self.rows, self.columns, &mut self.rng);
        self.waves.push(wave);
    }

    pub fn check_collision(a: &Bounds, b: &Bounds) -> bool {
        check_collision(a, b)
    }

    /// Start over after game over. In-flight projectiles are left alone.
    pub fn restart(&mut self) {
        self.player.restart(self.config.width, self.config.height);
        self.rows = self.config.initial_rows;
        self.columns = self.config.initial_columns;

        self.waves.clear();
        let wave = Wave::new(&self.config, self.rows, self.columns, &mut self.rng);
        self.waves.push(wave);

        self.wave = 1;
        self.score = 0;
        self.game_over = false;
        log::info!("Game restarted");
    }

    /// A key went down. Fire shoots once per press; restart only works once
    /// the game is over.
    pub fn key_down(&mut self, key: Key) {
        match key {
            Key::Fire if !self.player.fire_latched => {
                self.player.shoot(&mut self.projectiles);
                self.player.fire_latched = true;
            }
            Key::Restart if self.game_over => self.restart(),
            _ => {}
        }
        self.keys.press(key);
    }

    pub fn key_up(&mut self, key: Key) {
        if key == Key::Fire {
            self.player.fire_latched = false;
        }
        self.keys.release(key);
    }

    pub fn width(&self) -> f32 {
        self.config.width
    }

    pub fn height(&self) -> f32 {
        self.config.height
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn wave_number(&self) -> u32 {
        self.wave
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn keys(&self) -> &KeySet {
        &self.keys
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn projectiles(&self) -> &ProjectilePool {
        &self.projectiles
    }

    pub fn waves(&self) -> &[Wave] {
        &self.waves
    }

    pub fn waves_mut(&mut self) -> &mut Vec<Wave> {
        &mut self.waves
    }
}
