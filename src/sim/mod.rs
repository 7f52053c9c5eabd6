//! Entity Simulation
//!
//! Fixed-timestep simulation of everything that moves: the player,
//! enemies, projectiles, pickups, and pipe bombs. Systems are free
//! functions over plain data so the whole step stays deterministic and
//! unit-testable without a window.
//!
//! Per-tick update order (run by `engine::Session::tick`):
//! player integration -> enemy AI/combat -> projectile integration ->
//! door animation -> pickup collection -> pipe-bomb timers.

pub mod combat;
pub mod enemy;
pub mod events;
pub mod pickup;
pub mod player;
pub mod projectile;
pub mod weapons;

pub use combat::{absorb_with_armor, apply_player_damage, damage_enemy, explode, BLAST_RADIUS};
pub use enemy::{update_enemies, Enemy, EnemyKind};
pub use events::{Events, Sound};
pub use pickup::{update_pickups, Pickup, PickupKind};
pub use player::Player;
pub use projectile::{detonate_pipe_bombs, tick_pipe_bombs, update_projectiles, PipeBomb, Projectile};
pub use weapons::{FireKind, Weapon, WEAPON_SLOTS};

/// Fixed simulation timestep (seconds).
pub const TICK_DT: f32 = 1.0 / 60.0;
