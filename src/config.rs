//! Game tuning values
//!
//! Every field has a default, so a config file only needs the values it
//! changes. Values are fixed for the lifetime of a [`crate::Game`].

use std::fs;
use std::path::Path;

use color_eyre::Result;
use color_eyre::eyre::{WrapErr, bail};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub width: f32,
    pub height: f32,
    /// Horizontal movement per frame
    pub speed: f32,
    pub lives: i32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            width: 100.0,
            height: 100.0,
            speed: 10.0,
            lives: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    pub width: f32,
    pub height: f32,
    /// Upward movement per frame
    pub speed: f32,
    pub damage: i32,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            width: 8.0,
            height: 20.0,
            speed: 20.0,
            damage: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Playfield size in game units
    pub width: f32,
    pub height: f32,
    /// Side of one formation cell
    pub enemy_size: f32,
    /// Capacity of the projectile pool
    pub projectile_count: usize,
    /// Milliseconds between sprite animation ticks
    pub sprite_interval_ms: f32,
    /// Per-frame descent of a wave still entering from above
    pub entry_step: f32,
    pub initial_rows: u32,
    pub initial_columns: u32,
    /// Columns stop growing once they span this share of the width
    pub column_cap_ratio: f64,
    /// Rows stop growing once they span this share of the height
    pub row_cap_ratio: f64,
    /// Fixed RNG seed; random when absent
    pub seed: Option<u64>,
    pub player: PlayerConfig,
    pub projectile: ProjectileConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 800.0,
            enemy_size: 80.0,
            projectile_count: 10,
            sprite_interval_ms: 120.0,
            entry_step: 5.0,
            initial_rows: 2,
            initial_columns: 2,
            column_cap_ratio: 0.8,
            row_cap_ratio: 0.6,
            seed: None,
            player: PlayerConfig::default(),
            projectile: ProjectileConfig::default(),
        }
    }
}

impl GameConfig {
    /// Load a config from a JSON file and validate it.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read config file {}", path.display()))?;
        let config = Self::from_json(&raw)
            .wrap_err_with(|| format!("invalid config file {}", path.display()))?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw).wrap_err("failed to parse config JSON")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("width", self.width),
            ("height", self.height),
            ("enemy_size", self.enemy_size),
            ("sprite_interval_ms", self.sprite_interval_ms),
            ("entry_step", self.entry_step),
            ("player.width", self.player.width),
            ("player.height", self.player.height),
            ("player.speed", self.player.speed),
            ("projectile.width", self.projectile.width),
            ("projectile.height", self.projectile.height),
            ("projectile.speed", self.projectile.speed),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                bail!("{name} must be a positive number, got {value}");
            }
        }

        if self.enemy_size > self.width || self.enemy_size > self.height {
            bail!(
                "enemy_size {} does not fit a {}x{} playfield",
                self.enemy_size,
                self.width,
                self.height
            );
        }
        if self.initial_rows == 0 || self.initial_columns == 0 {
            bail!("a wave needs at least one row and one column");
        }
        if self.initial_columns as f32 * self.enemy_size > self.width
            || self.initial_rows as f32 * self.enemy_size > self.height
        {
            bail!(
                "a {}x{} starting wave of {}-unit cells does not fit a {}x{} playfield",
                self.initial_rows,
                self.initial_columns,
                self.enemy_size,
                self.width,
                self.height
            );
        }
        for (name, ratio) in [
            ("column_cap_ratio", self.column_cap_ratio),
            ("row_cap_ratio", self.row_cap_ratio),
        ] {
            if !(ratio.is_finite() && ratio > 0.0 && ratio <= 1.0) {
                bail!("{name} must be in (0, 1], got {ratio}");
            }
        }
        if self.player.lives < 1 {
            bail!("player.lives must be at least 1, got {}", self.player.lives);
        }
        if self.projectile.damage < 1 {
            bail!(
                "projectile.damage must be at least 1, got {}",
                self.projectile.damage
            );
        }
        Ok(())
    }
}
