// Library exports for testing
pub use config::{GameConfig, PlayerConfig, ProjectileConfig};
pub use entities::{
    Bounds, Enemy, EnemyKind, FrameContext, Player, Projectile, ProjectilePool, ProjectileState,
    Wave, check_collision,
};
pub use game::{Game, SpriteTicker};
pub use input::{InputEvent, InputManager, Key, KeySet};
pub use renderer::{DrawSurface, SpriteFrame, SpriteSheet, TextAlign, TextSize, TextStyle};

pub mod app;
pub mod config;
pub mod entities;
pub mod game;
pub mod input;
pub mod renderer;
