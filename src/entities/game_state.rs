use super::player::Player;
use super::projectile::ProjectilePool;

/// The slice of game state an enemy may touch during one update.
///
/// Borrowed from [`crate::Game`] for the length of a wave pass so enemies can
/// consume projectiles, hurt the player and move the score without holding
/// a reference to the game itself.
pub struct FrameContext<'a> {
    pub projectiles: &'a mut ProjectilePool,
    pub player: &'a mut Player,
    pub score: &'a mut u32,
    pub game_over: &'a mut bool,
    /// True on the single frame the shared sprite timer fires
    pub sprite_update: bool,
    pub game_width: f32,
    pub game_height: f32,
}

impl FrameContext<'_> {
    pub fn award(&mut self, points: u32) {
        if !*self.game_over {
            *self.score += points;
        }
    }

    /// Player rammed by an enemy: lose a point (if any) and a life.
    pub fn player_collision(&mut self) {
        if !*self.game_over && *self.score > 0 {
            *self.score -= 1;
        }
        self.player.lives -= 1;
        if self.player.lives < 1 {
            self.end_game();
        }
    }

    pub fn end_game(&mut self) {
        if !*self.game_over {
            log::info!("Game over with score {}", self.score);
        }
        *self.game_over = true;
    }
}
