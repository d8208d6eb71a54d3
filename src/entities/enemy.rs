use rand::Rng;

use super::bounds::Bounds;
use super::game_state::FrameContext;
use crate::renderer::{DrawSurface, SpriteFrame, SpriteSheet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyKind {
    Beetlemorph,
}

impl EnemyKind {
    /// Choose the kind for a new formation slot.
    pub fn pick(_rng: &mut impl Rng) -> Self {
        EnemyKind::Beetlemorph
    }

    pub fn max_lives(&self) -> i32 {
        match self {
            EnemyKind::Beetlemorph => 1,
        }
    }

    /// Last column of the death animation; one column past it removes the enemy.
    pub fn max_frame(&self) -> u8 {
        match self {
            EnemyKind::Beetlemorph => 2,
        }
    }

    /// Number of cosmetic rows on the sprite sheet.
    pub fn animation_rows(&self) -> u8 {
        match self {
            EnemyKind::Beetlemorph => 4,
        }
    }

    pub fn sprite_sheet(&self) -> SpriteSheet {
        match self {
            EnemyKind::Beetlemorph => SpriteSheet::Beetlemorph,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Fixed position inside the wave
    pub offset_x: f32,
    pub offset_y: f32,
    pub lives: i32,
    pub max_lives: i32,
    pub frame_x: u8,
    pub frame_y: u8,
    pub kind: EnemyKind,
    pub marked_for_deletion: bool,
}

impl Enemy {
    pub fn new(
        kind: EnemyKind,
        size: f32,
        offset_x: f32,
        offset_y: f32,
        rng: &mut impl Rng,
    ) -> Self {
        let lives = kind.max_lives();
        Self {
            x: 0.0,
            y: 0.0,
            width: size,
            height: size,
            offset_x,
            offset_y,
            lives,
            max_lives: lives,
            frame_x: 0,
            frame_y: rng.random_range(0..kind.animation_rows()),
            kind,
            marked_for_deletion: false,
        }
    }

    /// Follow the wave, then resolve projectile, player and floor contact.
    ///
    /// The three checks are independent: an enemy finishing its death
    /// animation can still ram the player in the same frame.
    pub fn update(&mut self, wave_x: f32, wave_y: f32, ctx: &mut FrameContext) {
        self.x = wave_x + self.offset_x;
        self.y = wave_y + self.offset_y;

        let hitbox = self.hitbox();
        for projectile in ctx.projectiles.iter_mut() {
            if projectile.is_in_flight() && hitbox.overlaps(&projectile.hitbox()) && self.lives > 0
            {
                self.hit(projectile.damage());
                projectile.release();
            }
        }

        if !self.is_alive() {
            if ctx.sprite_update {
                self.frame_x += 1;
            }
            if self.frame_x > self.kind.max_frame() {
                self.marked_for_deletion = true;
                ctx.award(self.max_lives as u32);
            }
        }

        if hitbox.overlaps(&ctx.player.hitbox()) {
            self.marked_for_deletion = true;
            ctx.player_collision();
        }

        if self.y + self.height > ctx.game_height {
            self.marked_for_deletion = true;
            ctx.end_game();
        }
    }

    pub fn hit(&mut self, damage: i32) {
        self.lives -= damage;
    }

    pub fn is_alive(&self) -> bool {
        self.lives > 0
    }

    pub fn hitbox(&self) -> Bounds {
        Bounds::new(self.x, self.y, self.width, self.height)
    }

    pub fn draw(&self, surface: &mut dyn DrawSurface) {
        let frame = SpriteFrame {
            sheet: self.kind.sprite_sheet(),
            column: self.frame_x,
            row: self.frame_y,
        };
        surface.draw_sprite(frame, self.hitbox());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PlayerConfig, ProjectileConfig};
    use crate::entities::{Player, ProjectilePool};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    struct World {
        pool: ProjectilePool,
        player: Player,
        score: u32,
        game_over: bool,
    }

    impl World {
        fn new() -> Self {
            Self {
                pool: ProjectilePool::new(10, &ProjectileConfig::default()),
                player: Player::new(&PlayerConfig::default(), 600.0, 800.0),
                score: 0,
                game_over: false,
            }
        }

        fn ctx(&mut self, sprite_update: bool) -> FrameContext<'_> {
            FrameContext {
                projectiles: &mut self.pool,
                player: &mut self.player,
                score: &mut self.score,
                game_over: &mut self.game_over,
                sprite_update,
                game_width: 600.0,
                game_height: 800.0,
            }
        }
    }

    fn beetle() -> Enemy {
        let mut rng = Pcg32::seed_from_u64(1);
        Enemy::new(EnemyKind::Beetlemorph, 80.0, 0.0, 0.0, &mut rng)
    }

    #[test]
    fn test_beetlemorph_stats() {
        let enemy = beetle();
        assert_eq!(enemy.lives, 1);
        assert_eq!(enemy.max_lives, 1);
        assert_eq!(enemy.frame_x, 0);
        assert!(enemy.frame_y < 4);
        assert!(!enemy.marked_for_deletion);
    }

    #[test]
    fn test_enemy_follows_wave_origin() {
        let mut world = World::new();
        let mut enemy = beetle();
        enemy.offset_x = 80.0;
        enemy.offset_y = 160.0;
        enemy.update(100.0, 20.0, &mut world.ctx(false));
        assert_eq!(enemy.x, 180.0);
        assert_eq!(enemy.y, 180.0);
    }

    #[test]
    fn test_hit_has_no_floor() {
        let mut enemy = beetle();
        enemy.hit(1);
        enemy.hit(1);
        assert_eq!(enemy.lives, -1);
        assert!(!enemy.is_alive());
    }

    #[test]
    fn test_projectile_hit_consumes_one_projectile() {
        let mut world = World::new();
        world.pool.acquire(140.0, 150.0);
        world.pool.acquire(140.0, 160.0);

        let mut enemy = beetle();
        enemy.update(100.0, 100.0, &mut world.ctx(false));

        assert_eq!(enemy.lives, 0);
        assert_eq!(world.pool.in_flight(), 1);
        assert!(!enemy.marked_for_deletion);
    }

    #[test]
    fn test_death_animation_then_score() {
        let mut world = World::new();
        world.pool.acquire(140.0, 150.0);
        let mut enemy = beetle();

        enemy.update(100.0, 100.0, &mut world.ctx(false));
        assert_eq!(enemy.lives, 0);

        for tick in 1..=2 {
            enemy.update(100.0, 100.0, &mut world.ctx(true));
            assert_eq!(enemy.frame_x, tick);
            assert!(!enemy.marked_for_deletion);
        }
        // Frames without a sprite tick do not advance the animation
        enemy.update(100.0, 100.0, &mut world.ctx(false));
        assert_eq!(enemy.frame_x, 2);

        enemy.update(100.0, 100.0, &mut world.ctx(true));
        assert!(enemy.marked_for_deletion);
        assert_eq!(world.score, 1);
    }

    #[test]
    fn test_no_score_after_game_over() {
        let mut world = World::new();
        world.game_over = true;
        let mut enemy = beetle();
        enemy.hit(1);
        for _ in 0..3 {
            enemy.update(100.0, 100.0, &mut world.ctx(true));
        }
        assert!(enemy.marked_for_deletion);
        assert_eq!(world.score, 0);
    }

    #[test]
    fn test_ramming_player_costs_life_and_point() {
        let mut world = World::new();
        world.score = 5;
        let mut enemy = beetle();
        enemy.update(world.player.x, world.player.y, &mut world.ctx(false));

        assert!(enemy.marked_for_deletion);
        assert_eq!(world.player.lives, 2);
        assert_eq!(world.score, 4);
        assert!(!world.game_over);
    }

    #[test]
    fn test_ramming_with_zero_score_keeps_score() {
        let mut world = World::new();
        let mut enemy = beetle();
        enemy.update(world.player.x, world.player.y, &mut world.ctx(false));
        assert_eq!(world.score, 0);
        assert_eq!(world.player.lives, 2);
    }

    #[test]
    fn test_last_life_lost_ends_game() {
        let mut world = World::new();
        world.player.lives = 1;
        let mut enemy = beetle();
        enemy.update(world.player.x, world.player.y, &mut world.ctx(false));
        assert_eq!(world.player.lives, 0);
        assert!(world.game_over);
    }

    #[test]
    fn test_touching_player_edge_is_not_a_collision() {
        let mut world = World::new();
        let mut enemy = beetle();
        // Enemy bottom edge sits exactly on the player's top edge
        let (x, y) = (world.player.x, world.player.y - 80.0);
        enemy.update(x, y, &mut world.ctx(false));
        assert!(!enemy.marked_for_deletion);
        assert_eq!(world.player.lives, 3);
    }

    #[test]
    fn test_dying_enemy_can_still_ram_player() {
        let mut world = World::new();
        world.score = 3;
        let mut enemy = beetle();
        enemy.hit(1);
        enemy.frame_x = 2;
        enemy.update(world.player.x, world.player.y, &mut world.ctx(true));

        // Death bonus then ramming penalty, both in the same update
        assert!(enemy.marked_for_deletion);
        assert_eq!(world.score, 3);
        assert_eq!(world.player.lives, 2);
    }

    #[test]
    fn test_reaching_floor_ends_game() {
        let mut world = World::new();
        let mut enemy = beetle();
        enemy.update(0.0, 721.0, &mut world.ctx(false));
        assert!(enemy.marked_for_deletion);
        assert!(world.game_over);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_removal_requires_lost_lives(
                hits in 0i32..3,
                ticks in 0usize..8
            ) {
                let mut world = World::new();
                let mut enemy = beetle();
                for _ in 0..hits {
                    enemy.hit(1);
                }
                for _ in 0..ticks {
                    enemy.update(100.0, 100.0, &mut world.ctx(true));
                }
                let dead = enemy.lives < 1;
                prop_assert_eq!(enemy.marked_for_deletion, dead && ticks >= 3);
            }
        }
    }
}
