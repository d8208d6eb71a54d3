use super::bounds::Bounds;
use super::projectile::ProjectilePool;
use crate::config::PlayerConfig;
use crate::input::{Key, KeySet};
use crate::renderer::DrawSurface;

#[derive(Debug, Clone)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub lives: i32,
    /// Set once a shot is fired, cleared when the fire key is released
    pub fire_latched: bool,
    starting_lives: i32,
}

impl Player {
    /// A player centred at the bottom of a `game_width` x `game_height` field.
    pub fn new(config: &PlayerConfig, game_width: f32, game_height: f32) -> Self {
        let mut player = Self {
            x: 0.0,
            y: 0.0,
            width: config.width,
            height: config.height,
            speed: config.speed,
            lives: config.lives,
            fire_latched: false,
            starting_lives: config.lives,
        };
        player.restart(game_width, game_height);
        player
    }

    /// Apply held movement keys, left first then right, and keep at least
    /// half of the ship on screen.
    pub fn update(&mut self, keys: &KeySet, game_width: f32) {
        if keys.is_held(Key::MoveLeft) {
            self.x -= self.speed;
        }
        if keys.is_held(Key::MoveRight) {
            self.x += self.speed;
        }

        let min_x = -self.width * 0.5;
        let max_x = game_width - self.width * 0.5;
        if self.x < min_x {
            self.x = min_x;
        } else if self.x > max_x {
            self.x = max_x;
        }
    }

    /// Fire from the nose of the ship. Does nothing when the pool is empty.
    pub fn shoot(&self, pool: &mut ProjectilePool) -> bool {
        let fired = pool
            .acquire(self.x + self.width * 0.5, self.y)
            .is_some();
        if !fired {
            log::debug!("Projectile pool exhausted, shot dropped");
        }
        fired
    }

    /// Back to the starting spot with full lives.
    pub fn restart(&mut self, game_width: f32, game_height: f32) {
        self.x = game_width * 0.5 - self.width * 0.5;
        self.y = game_height - self.height;
        self.lives = self.starting_lives;
    }

    pub fn is_alive(&self) -> bool {
        self.lives > 0
    }

    pub fn hitbox(&self) -> Bounds {
        Bounds::new(self.x, self.y, self.width, self.height)
    }

    pub fn draw(&self, surface: &mut dyn DrawSurface) {
        surface.fill_rect(self.hitbox());
    }
}
