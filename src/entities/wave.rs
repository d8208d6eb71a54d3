use rand::Rng;

use super::enemy::{Enemy, EnemyKind};
use super::game_state::FrameContext;
use crate::config::GameConfig;
use crate::renderer::DrawSurface;

/// A rigid block of enemies that drifts sideways and steps down at the edges.
#[derive(Debug, Clone)]
pub struct Wave {
    /// Top-left corner of the formation
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Horizontal drift per frame, -1 or 1
    pub speed_x: f32,
    /// Vertical drop applied this frame
    pub speed_y: f32,
    pub enemies: Vec<Enemy>,
    pub next_wave_triggered: bool,
    enemy_size: f32,
    entry_step: f32,
}

impl Wave {
    /// Build a `rows` x `columns` formation centred horizontally and parked
    /// just above the top of the screen.
    pub fn new(config: &GameConfig, rows: u32, columns: u32, rng: &mut impl Rng) -> Self {
        let enemy_size = config.enemy_size;
        let width = columns as f32 * enemy_size;
        let height = rows as f32 * enemy_size;
        let speed_x = if rng.random_bool(0.5) { -1.0 } else { 1.0 };

        let mut enemies = Vec::with_capacity(rows as usize * columns as usize);
        for row in 0..rows {
            for column in 0..columns {
                let kind = EnemyKind::pick(rng);
                enemies.push(Enemy::new(
                    kind,
                    enemy_size,
                    column as f32 * enemy_size,
                    row as f32 * enemy_size,
                    rng,
                ));
            }
        }

        Self {
            x: config.width * 0.5 - width * 0.5,
            y: -height,
            width,
            height,
            speed_x,
            speed_y: 0.0,
            enemies,
            next_wave_triggered: false,
            enemy_size,
            entry_step: config.entry_step,
        }
    }

    /// Move the formation and update every enemy against it.
    pub fn update(&mut self, ctx: &mut FrameContext) {
        if self.y < 0.0 {
            self.y += self.entry_step;
        }

        // Reflect before stepping so the block never leaves [0, width - self.width]
        self.speed_y = 0.0;
        let next_x = self.x + self.speed_x;
        if next_x < 0.0 || next_x > ctx.game_width - self.width {
            self.speed_x = -self.speed_x;
            self.speed_y = self.enemy_size;
            log::debug!(
                "Wave bounced at x={}, dropping to y={}",
                self.x,
                self.y + self.speed_y
            );
        }
        self.x += self.speed_x;
        self.y += self.speed_y;

        for enemy in &mut self.enemies {
            enemy.update(self.x, self.y, ctx);
        }
    }

    pub fn draw(&self, surface: &mut dyn DrawSurface) {
        for enemy in &self.enemies {
            enemy.draw(surface);
        }
    }

    /// Drop every enemy marked for deletion during the last update.
    pub fn sweep(&mut self) {
        self.enemies.retain(|enemy| !enemy.marked_for_deletion);
    }

    /// Full frame for this wave: update, draw, then sweep.
    pub fn render(&mut self, surface: &mut dyn DrawSurface, ctx: &mut FrameContext) {
        self.update(ctx);
        self.draw(surface);
        self.sweep();
    }

    pub fn is_cleared(&self) -> bool {
        self.enemies.is_empty()
    }
}
