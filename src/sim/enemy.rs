//! Enemy AI and combat
//!
//! Four enemy kinds selected by a type tag, each with a hand-tuned stat
//! block. AI is deliberately simple: a permanent alert latch on
//! proximity, straight-line steering toward the player (no grid
//! pathfinding), and a ranged attack on a cooldown.

use serde::{Deserialize, Serialize};

use crate::map::TileMap;
use crate::sim::events::{Events, Sound};
use crate::sim::player::Player;
use crate::sim::projectile::Projectile;

/// Distance at which an enemy notices the player. Latched for good.
pub const ALERT_RADIUS: f32 = 8.0;
/// Alerted enemies close in only inside this band; nearer than the lower
/// bound they hold position and shoot.
pub const ENGAGE_MIN: f32 = 1.2;
pub const ENGAGE_MAX: f32 = 10.0;

/// Body radius used for steering and projectile hits.
pub const ENEMY_RADIUS: f32 = 0.3;

/// Ticks a corpse stays visible before it stops being simulated/drawn.
pub const DEATH_FADE_TICKS: u32 = 90;

/// Ticks of hurt-flash after taking damage.
pub const HURT_FLASH_TICKS: u32 = 8;

/// Speed of enemy shots, map units per second.
const SHOT_SPEED: f32 = 6.0;

/// Enemy type tag; selects the stat block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Baseline rifleman
    Grunt,
    /// Long-range, fragile
    Gunner,
    /// Slow, tough, hits hard
    Heavy,
    /// Fast flanker with a short reach
    Stalker,
}

/// Per-kind tuning.
#[derive(Debug, Clone, Copy)]
pub struct EnemyStats {
    pub max_health: i32,
    /// Map units per second
    pub speed: f32,
    pub attack_range: f32,
    pub attack_damage: i32,
    /// Ticks between attacks
    pub attack_cooldown: u32,
    /// Score awarded on the kill
    pub score: i32,
}

impl EnemyKind {
    pub fn stats(self) -> EnemyStats {
        match self {
            EnemyKind::Grunt => EnemyStats {
                max_health: 30,
                speed: 1.6,
                attack_range: 6.0,
                attack_damage: 8,
                attack_cooldown: 75,
                score: 100,
            },
            EnemyKind::Gunner => EnemyStats {
                max_health: 20,
                speed: 1.3,
                attack_range: 9.0,
                attack_damage: 6,
                attack_cooldown: 50,
                score: 150,
            },
            EnemyKind::Heavy => EnemyStats {
                max_health: 80,
                speed: 0.9,
                attack_range: 5.0,
                attack_damage: 18,
                attack_cooldown: 110,
                score: 300,
            },
            EnemyKind::Stalker => EnemyStats {
                max_health: 24,
                speed: 2.6,
                attack_range: 1.6,
                attack_damage: 12,
                attack_cooldown: 55,
                score: 200,
            },
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EnemyKind::Grunt => "Grunt",
            EnemyKind::Gunner => "Gunner",
            EnemyKind::Heavy => "Heavy",
            EnemyKind::Stalker => "Stalker",
        }
    }
}

/// A single enemy. Dead enemies are retained (not removed) for the
/// death-fade window so the renderer can draw the body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub x: f32,
    pub y: f32,
    pub health: i32,
    pub max_health: i32,
    /// Permanent once the player has been noticed
    pub alerted: bool,
    /// Ticks until the next attack is allowed
    pub cooldown: u32,
    /// Hurt-flash ticks remaining
    pub hurt_timer: u32,
    /// Death-fade ticks remaining; meaningful only when dead
    pub death_timer: u32,
}

impl Enemy {
    pub fn spawn(kind: EnemyKind, x: f32, y: f32) -> Self {
        let stats = kind.stats();
        Self {
            kind,
            x,
            y,
            health: stats.max_health,
            max_health: stats.max_health,
            alerted: false,
            cooldown: stats.attack_cooldown,
            hurt_timer: 0,
            death_timer: DEATH_FADE_TICKS,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    /// Still worth drawing? Live, or a corpse inside the fade window.
    pub fn is_visible(&self) -> bool {
        !self.is_dead() || self.death_timer > 0
    }

    pub fn distance_to(&self, x: f32, y: f32) -> f32 {
        ((self.x - x).powi(2) + (self.y - y).powi(2)).sqrt()
    }

    /// Axis-resolved steering step toward a target point.
    fn step_toward(&mut self, map: &TileMap, tx: f32, ty: f32, dist: f32, dt: f32) {
        let stats = self.kind.stats();
        let step = stats.speed * dt;
        let dx = (tx - self.x) / dist * step;
        let dy = (ty - self.y) / dist * step;

        let nx = self.x + dx;
        if !map.is_blocked(nx + ENEMY_RADIUS * dx.signum(), self.y) {
            self.x = nx;
        }
        let ny = self.y + dy;
        if !map.is_blocked(self.x, ny + ENEMY_RADIUS * dy.signum()) {
            self.y = ny;
        }
    }
}

/// Enemy AI/combat phase of the tick: alert checks, steering, attacks,
/// and death/hurt timer bookkeeping.
pub fn update_enemies(
    enemies: &mut [Enemy],
    player: &Player,
    map: &TileMap,
    projectiles: &mut Vec<Projectile>,
    events: &mut Events,
    dt: f32,
) {
    for enemy in enemies.iter_mut() {
        if enemy.is_dead() {
            enemy.death_timer = enemy.death_timer.saturating_sub(1);
            continue;
        }
        enemy.hurt_timer = enemy.hurt_timer.saturating_sub(1);
        enemy.cooldown = enemy.cooldown.saturating_sub(1);

        let dist = enemy.distance_to(player.x, player.y);
        if dist < ALERT_RADIUS {
            enemy.alerted = true;
        }
        if !enemy.alerted {
            continue;
        }

        if dist > ENGAGE_MIN && dist <= ENGAGE_MAX {
            enemy.step_toward(map, player.x, player.y, dist, dt);
        }

        let stats = enemy.kind.stats();
        if enemy.cooldown == 0 && dist <= stats.attack_range && !player.dead {
            let dx = (player.x - enemy.x) / dist;
            let dy = (player.y - enemy.y) / dist;
            projectiles.push(Projectile {
                x: enemy.x + dx * (ENEMY_RADIUS + 0.1),
                y: enemy.y + dy * (ENEMY_RADIUS + 0.1),
                vx: dx * SHOT_SPEED,
                vy: dy * SHOT_SPEED,
                damage: stats.attack_damage,
                from_player: false,
                rocket: false,
            });
            enemy.cooldown = stats.attack_cooldown;
            events.sounds.send(Sound::PistolFire);
        }
    }
}
