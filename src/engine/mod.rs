//! Game session and state machine
//!
//! `Session` bundles everything mutable about a run - map, entities,
//! player, RNG, event queues - into one explicitly-owned value. The
//! host calls `tick` once per fixed timestep and the renderer borrows
//! the session read-only for the duration of a frame. No ambient state,
//! so tests can drive whole levels deterministically.

pub mod hud;
pub mod levels;

pub use hud::HudSnapshot;
pub use levels::{level, LEVEL_COUNT};

use crate::input::InputFrame;
use crate::map::textures::Lcg;
use crate::map::{TextureSet, TileMap, DOOR_TILE};
use crate::sim::events::{Events, Sound};
use crate::sim::{
    self, detonate_pipe_bombs, tick_pipe_bombs, update_enemies, update_pickups,
    update_projectiles, Enemy, FireKind, Pickup, PipeBomb, Player, Projectile, Weapon, TICK_DT,
};

/// Seed for the procedural texture tables.
const TEXTURE_SEED: u64 = 0x47524944;

/// How far the interact action reaches, map units.
const INTERACT_DIST: f32 = 1.2;

/// Ticks the firing animation (kickback + muzzle flash) runs.
pub const FIRE_ANIM_TICKS: u32 = 18;

/// Hitscan body radius: how far off the ray an enemy can be and still
/// be hit.
const HITSCAN_RADIUS: f32 = 0.35;

/// Rocket flight speed, map units per second.
const ROCKET_SPEED: f32 = 8.0;

/// Seconds a HUD message / quote stays up.
const MESSAGE_SECS: f32 = 2.5;
const QUOTE_SECS: f32 = 2.0;

/// Top-level engine states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    /// Full simulation running
    Playing,
    /// Frozen; resumes to Playing without loss
    Paused,
    /// Exit collected; waiting for the advance input
    LevelComplete,
    /// Player died; terminal until restart
    GameOver,
    /// Final level completed
    Victory,
}

/// One run of the game: the current level and everything alive in it.
pub struct Session {
    pub map: TileMap,
    pub textures: TextureSet,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub pickups: Vec<Pickup>,
    pub pipe_bombs: Vec<PipeBomb>,
    pub events: Events,
    pub state: GameState,
    pub level_index: usize,
    pub level_name: &'static str,
    pub total_enemies: i32,
    pub tick_count: u64,
    pub show_minimap: bool,

    // Transient HUD text with remaining display time
    message: Option<(String, f32)>,
    quote: Option<(String, f32)>,

    rng: Lcg,
}

impl Session {
    /// Fresh session: textures generated, level 1 loaded, Playing.
    pub fn new() -> Self {
        let def = levels::level(0);
        let (sx, sy, heading) = def.player_start;
        let mut session = Self {
            map: TileMap::new(),
            textures: TextureSet::generate(TEXTURE_SEED),
            player: Player::new(sx, sy, heading),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            pickups: Vec::new(),
            pipe_bombs: Vec::new(),
            events: Events::new(),
            state: GameState::Playing,
            level_index: 0,
            level_name: def.name,
            total_enemies: 0,
            tick_count: 0,
            show_minimap: false,
            message: None,
            quote: None,
            rng: Lcg::new(TEXTURE_SEED ^ 0x5EED),
        };
        session.load_level(0);
        session
    }

    /// Load a level, keeping the player's stats and inventory. The
    /// state machine calls this for level transitions; `restart` is the
    /// stat-resetting variant.
    pub fn load_level(&mut self, index: usize) {
        let def = levels::level(index);
        self.map = levels::build_map(&def);
        let (enemies, pickups) = levels::spawn_entities(&def);
        self.total_enemies = enemies.len() as i32;
        self.enemies = enemies;
        self.pickups = pickups;
        self.projectiles.clear();
        self.pipe_bombs.clear();
        self.events.clear_all();
        self.level_index = index;
        self.level_name = def.name;
        let (sx, sy, heading) = def.player_start;
        self.player.respawn_at(sx, sy, heading);
        self.message = None;
        self.quote = None;
        self.state = GameState::Playing;
        self.show_message(format!("Entering {}", def.name));
    }

    /// Explicit restart: all player stats back to initial values,
    /// level 1 reloaded.
    pub fn restart(&mut self) {
        let def = levels::level(0);
        let (sx, sy, heading) = def.player_start;
        self.player = Player::new(sx, sy, heading);
        self.load_level(0);
    }

    /// One engine tick. Only `Playing` runs the simulation; the other
    /// states process nothing but their transition input.
    pub fn tick(&mut self, input: &InputFrame) {
        match self.state {
            GameState::Playing => self.tick_playing(input),
            GameState::Paused => {
                if input.actions.pause || input.actions.confirm {
                    self.state = GameState::Playing;
                }
            }
            GameState::LevelComplete => {
                if input.actions.confirm {
                    if self.level_index + 1 >= LEVEL_COUNT {
                        self.state = GameState::Victory;
                    } else {
                        self.load_level(self.level_index + 1);
                    }
                }
            }
            GameState::GameOver | GameState::Victory => {
                if input.actions.confirm {
                    self.restart();
                }
            }
        }
    }

    /// The full per-tick simulation order: player integration, enemy
    /// AI, projectiles, doors, pickups, pipe bombs.
    fn tick_playing(&mut self, input: &InputFrame) {
        let dt = TICK_DT;

        if input.actions.pause {
            self.state = GameState::Paused;
            return;
        }
        if input.actions.toggle_minimap {
            self.show_minimap = !self.show_minimap;
        }

        // Player phase: integration plus the player's own actions
        self.player.integrate(&self.map, input, &mut self.events, dt);
        if let Some(slot) = input.actions.select_weapon {
            self.select_weapon(slot);
        }
        if input.actions.use_medkit {
            self.player.use_medkit(&mut self.events);
        }
        if input.actions.use_steroids {
            self.player.use_steroids(&mut self.events);
        }
        if input.actions.toggle_jetpack {
            self.player.toggle_jetpack(&mut self.events);
        }
        if input.actions.interact {
            self.interact();
        }
        if input.fire_held {
            self.fire_equipped(input.actions.fire_pressed);
        }

        update_enemies(
            &mut self.enemies,
            &self.player,
            &self.map,
            &mut self.projectiles,
            &mut self.events,
            dt,
        );

        update_projectiles(
            &mut self.projectiles,
            &self.map,
            &mut self.enemies,
            &mut self.player,
            &mut self.events,
            dt,
        );

        self.map.tick_doors(dt);

        let exit_reached = update_pickups(&mut self.pickups, &mut self.player, &mut self.events, dt);

        tick_pipe_bombs(&mut self.pipe_bombs);
        if input.actions.detonate && !self.pipe_bombs.is_empty() {
            detonate_pipe_bombs(
                &mut self.pipe_bombs,
                &mut self.enemies,
                &mut self.player,
                &mut self.events,
            );
        }

        self.drain_text_events();
        self.decay_text(dt);
        self.tick_count += 1;

        // Terminal transitions last, so the tick that kills or frees the
        // player still completes in full
        if exit_reached {
            self.state = GameState::LevelComplete;
        } else if self.player.dead {
            self.state = GameState::GameOver;
        }
    }

    /// Switch to a weapon slot. Locked or unknown slots are rejected
    /// with a message and no state change.
    fn select_weapon(&mut self, slot: usize) {
        let Some(weapon) = Weapon::from_slot(slot) else {
            return;
        };
        if !self.player.unlocked[slot] {
            self.show_message(format!("Don't have the {} yet", weapon.name()));
            return;
        }
        if self.player.weapon != weapon {
            self.player.weapon = weapon;
            self.player.cooldown = self.player.cooldown.max(6);
        }
    }

    /// Fire the equipped weapon if its cooldown has elapsed. Empty ammo
    /// is a rejected action: a message on the trigger edge, no state
    /// change.
    fn fire_equipped(&mut self, edge: bool) {
        if self.player.cooldown > 0 || self.player.dead {
            return;
        }
        let weapon = self.player.weapon;
        let stats = weapon.stats();
        let slot = weapon.slot();
        if self.player.ammo[slot] <= 0 {
            if edge {
                self.show_message(format!("{} is empty", weapon.name()));
                self.events.sounds.send(Sound::DryFire);
            }
            return;
        }

        self.player.ammo[slot] -= 1;
        self.player.cooldown = stats.cooldown;
        self.player.fire_anim = FIRE_ANIM_TICKS;
        self.events.sounds.send(match weapon {
            Weapon::Pistol => Sound::PistolFire,
            Weapon::Shotgun => Sound::ShotgunFire,
            Weapon::Chaingun => Sound::ChaingunFire,
            Weapon::Rpg => Sound::RocketLaunch,
            Weapon::PipeBomb => Sound::PipeBombThrow,
        });

        match stats.kind {
            FireKind::Hitscan => {
                for _ in 0..stats.pellets {
                    let jitter = (self.rng.next_f32() - 0.5) * 2.0 * stats.spread;
                    self.hitscan(self.player.heading + jitter, stats.damage);
                }
            }
            FireKind::Rocket => {
                let (sin, cos) = self.player.heading.sin_cos();
                self.projectiles.push(Projectile {
                    x: self.player.x + cos * 0.4,
                    y: self.player.y + sin * 0.4,
                    vx: cos * ROCKET_SPEED,
                    vy: sin * ROCKET_SPEED,
                    damage: stats.damage,
                    from_player: true,
                    rocket: true,
                });
            }
            FireKind::Thrown => {
                let (sin, cos) = self.player.heading.sin_cos();
                let (mut bx, mut by) = (self.player.x + cos * 0.8, self.player.y + sin * 0.8);
                if self.map.is_blocked(bx, by) {
                    bx = self.player.x;
                    by = self.player.y;
                }
                self.pipe_bombs.push(PipeBomb {
                    x: bx,
                    y: by,
                    damage: stats.damage,
                    armed_ticks: 0,
                });
            }
        }
    }

    /// Resolve one hitscan ray: nearest live enemy within the body
    /// radius of the ray, if it's closer than the first wall.
    fn hitscan(&mut self, angle: f32, damage: i32) {
        let (sin, cos) = angle.sin_cos();
        let wall = self.map.cast_ray(self.player.x, self.player.y, angle);

        let mut best: Option<(f32, usize)> = None;
        for (i, enemy) in self.enemies.iter().enumerate() {
            if enemy.is_dead() {
                continue;
            }
            let dx = enemy.x - self.player.x;
            let dy = enemy.y - self.player.y;
            let along = dx * cos + dy * sin;
            if along <= 0.0 || along >= wall.distance {
                continue;
            }
            let across = (dx * -sin + dy * cos).abs();
            if across > HITSCAN_RADIUS {
                continue;
            }
            if best.map(|(d, _)| along < d).unwrap_or(true) {
                best = Some((along, i));
            }
        }
        if let Some((_, i)) = best {
            sim::damage_enemy(&mut self.enemies[i], damage, &mut self.player, &mut self.events);
        }
    }

    /// Interact action: trigger the faced door within reach. Locked
    /// doors without the card are rejected with a message.
    fn interact(&mut self) {
        let (sin, cos) = self.player.heading.sin_cos();
        for step in [0.5, 1.0, INTERACT_DIST] {
            let tx = (self.player.x + cos * step).floor() as i32;
            let ty = (self.player.y + sin * step).floor() as i32;
            if self.map.tile(tx, ty) != DOOR_TILE {
                continue;
            }
            let keys = self.player.keys;
            let Some(door) = self.map.door_at_mut(tx as usize, ty as usize) else {
                continue;
            };
            if door.opening {
                return;
            }
            let required = door.required_key;
            if required == 0 || keys[(required as usize - 1).min(keys.len() - 1)] {
                door.opening = true;
                self.events.sounds.send(Sound::DoorOpen);
            } else {
                self.events.sounds.send(Sound::DoorLocked);
                self.show_message(format!(
                    "Locked - need the {} card",
                    sim::pickup::card_name(required)
                ));
            }
            return;
        }
    }

    fn show_message(&mut self, text: String) {
        self.message = Some((text, MESSAGE_SECS));
    }

    /// Move queued message/quote events into the transient HUD slots
    /// (last writer wins within a tick).
    fn drain_text_events(&mut self) {
        if let Some(text) = self.events.messages.drain().last() {
            self.message = Some((text, MESSAGE_SECS));
        }
        if let Some(text) = self.events.quotes.drain().last() {
            self.quote = Some((text.to_string(), QUOTE_SECS));
        }
    }

    fn decay_text(&mut self, dt: f32) {
        for slot in [&mut self.message, &mut self.quote] {
            if let Some((_, t)) = slot.as_mut() {
                *t -= dt;
            }
            if matches!(slot, Some((_, t)) if *t <= 0.0) {
                *slot = None;
            }
        }
    }

    /// HUD values for the host to draw this frame.
    pub fn hud_snapshot(&self) -> HudSnapshot {
        HudSnapshot {
            level_name: self.level_name,
            health: self.player.health,
            armor: self.player.armor,
            weapon_name: self.player.weapon.name(),
            ammo: self.player.ammo_equipped(),
            score: self.player.score,
            kills: self.player.kills,
            total_enemies: self.total_enemies,
            keys: self.player.keys,
            medkits: self.player.medkits,
            steroid_charges: self.player.steroid_charges,
            steroid_timer: self.player.steroid_timer,
            has_jetpack: self.player.has_jetpack,
            jetpack_on: self.player.jetpack_on,
            jetpack_fuel: self.player.jetpack_fuel,
            armed_pipe_bombs: self.pipe_bombs.len() as i32,
            message: self.message.as_ref().map(|(m, _)| m.clone()),
            quote: self.quote.as_ref().map(|(q, _)| q.clone()),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
