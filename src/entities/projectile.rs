use super::bounds::Bounds;
use crate::config::ProjectileConfig;
use crate::renderer::DrawSurface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileState {
    /// Parked in the pool, not drawn and not collidable
    Free,
    /// Travelling upward
    InFlight,
}

#[derive(Debug, Clone)]
pub struct Projectile {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    speed: f32,
    damage: i32,
    state: ProjectileState,
}

impl Projectile {
    pub fn new(config: &ProjectileConfig) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: config.width,
            height: config.height,
            speed: config.speed,
            damage: config.damage,
            state: ProjectileState::Free,
        }
    }

    /// Launch from a muzzle point: centred on `x`, top edge at `y`.
    fn start(&mut self, x: f32, y: f32) {
        self.x = x - self.width * 0.5;
        self.y = y;
        self.state = ProjectileState::InFlight;
    }

    /// Return to the pool, either after a hit or after leaving the screen.
    pub fn release(&mut self) {
        self.state = ProjectileState::Free;
    }

    pub fn update(&mut self) {
        if self.state == ProjectileState::Free {
            return;
        }
        self.y -= self.speed;
        if self.y < -self.height {
            self.release();
        }
    }

    pub fn draw(&self, surface: &mut dyn DrawSurface) {
        if self.is_in_flight() {
            surface.fill_rect(self.hitbox());
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.state == ProjectileState::InFlight
    }

    pub fn state(&self) -> ProjectileState {
        self.state
    }

    pub fn damage(&self) -> i32 {
        self.damage
    }

    pub fn hitbox(&self) -> Bounds {
        Bounds::new(self.x, self.y, self.width, self.height)
    }
}

/// Fixed set of projectiles allocated once and recycled for the whole game.
#[derive(Debug, Clone)]
pub struct ProjectilePool {
    projectiles: Vec<Projectile>,
}

impl ProjectilePool {
    pub fn new(capacity: usize, config: &ProjectileConfig) -> Self {
        Self {
            projectiles: (0..capacity).map(|_| Projectile::new(config)).collect(),
        }
    }

    /// Launch the first free projectile in index order.
    /// Returns `None` when every slot is already in flight.
    pub fn acquire(&mut self, x: f32, y: f32) -> Option<&Projectile> {
        let projectile = self
            .projectiles
            .iter_mut()
            .find(|projectile| !projectile.is_in_flight())?;
        projectile.start(x, y);
        Some(&*projectile)
    }

    pub fn update(&mut self) {
        for projectile in &mut self.projectiles {
            projectile.update();
        }
    }

    pub fn draw(&self, surface: &mut dyn DrawSurface) {
        for projectile in &self.projectiles {
            projectile.draw(surface);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.projectiles.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Projectile> {
        self.projectiles.iter_mut()
    }

    pub fn capacity(&self) -> usize {
        self.projectiles.len()
    }

    pub fn in_flight(&self) -> usize {
        self.projectiles.iter().filter(|p| p.is_in_flight()).count()
    }
}
