mod bounds;
mod enemy;
mod game_state;
mod player;
mod projectile;
mod wave;

// Re-export all public types
pub use bounds::{Bounds, check_collision};
pub use enemy::{Enemy, EnemyKind};
pub use game_state::FrameContext;
pub use player::Player;
pub use projectile::{Projectile, ProjectilePool, ProjectileState};
pub use wave::Wave;
