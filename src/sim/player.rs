//! Player state and integration
//!
//! One record for everything the player is: pose, vertical physics,
//! stats, ammo, key cards, and inventory. Movement resolves each axis
//! independently against the map so the player slides along walls
//! instead of sticking to them.

use serde::{Deserialize, Serialize};

use crate::input::InputFrame;
use crate::map::TileMap;
use crate::sim::events::{Events, Sound};
use crate::sim::weapons::{Weapon, WEAPON_SLOTS};

pub const MAX_HEALTH: i32 = 100;
pub const MAX_ARMOR: i32 = 100;

pub const WALK_SPEED: f32 = 3.0;
pub const SPRINT_MULT: f32 = 1.6;
pub const STEROID_MULT: f32 = 1.5;
/// Seconds of buff per steroid charge
pub const STEROID_DURATION: f32 = 8.0;

pub const JUMP_IMPULSE: f32 = 2.6;
pub const GRAVITY: f32 = 9.0;
/// Eye-height drop while crouching, map units
pub const CROUCH_OFFSET: f32 = 0.35;
/// Head-bob amplitude, map units
pub const BOB_AMPLITUDE: f32 = 0.04;
const BOB_RATE: f32 = 9.0;

pub const JETPACK_CLIMB: f32 = 1.2;
pub const JETPACK_FUEL_MAX: f32 = 100.0;
pub const JETPACK_BURN: f32 = 20.0;
/// Altitude ceiling while on the jetpack
const JETPACK_MAX_Z: f32 = 1.1;

pub const PLAYER_RADIUS: f32 = 0.2;

/// Pitch clamp in screen pixels of horizon shift.
const PITCH_LIMIT: f32 = 80.0;
/// Mouse-pixels of vertical travel to horizon pixels.
const PITCH_SCALE: f32 = 0.5;

/// Healing granted when a carried medkit is used.
pub const MEDKIT_HEAL: i32 = 40;

/// The player. Created at level (re)start, mutated by the simulation
/// every tick, never destroyed mid-run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    // Pose
    pub x: f32,
    pub y: f32,
    pub heading: f32,
    /// Horizon shift in screen pixels (positive = looking up)
    pub pitch: f32,
    /// Vertical offset above the floor (jump / jetpack), map units
    pub z: f32,
    pub vz: f32,
    pub crouching: bool,
    pub bob_phase: f32,

    // Stats
    pub health: i32,
    pub armor: i32,
    pub score: i32,
    pub kills: i32,
    /// Game-over latch: once dead, no further damage processing
    pub dead: bool,

    // Arsenal
    pub weapon: Weapon,
    pub ammo: [i32; WEAPON_SLOTS],
    pub unlocked: [bool; WEAPON_SLOTS],
    /// Ticks until the equipped weapon may fire again
    pub cooldown: u32,
    /// Ticks remaining of the firing animation window
    pub fire_anim: u32,

    // Inventory
    pub keys: [bool; 3],
    pub medkits: i32,
    pub steroid_charges: i32,
    pub steroid_timer: f32,
    pub has_jetpack: bool,
    pub jetpack_on: bool,
    pub jetpack_fuel: f32,
}

impl Player {
    /// Fresh player with starting stats, placed at a spawn pose.
    pub fn new(x: f32, y: f32, heading: f32) -> Self {
        let mut ammo = [0; WEAPON_SLOTS];
        ammo[Weapon::Pistol.slot()] = 48;
        ammo[Weapon::PipeBomb.slot()] = 2;
        let mut unlocked = [false; WEAPON_SLOTS];
        unlocked[Weapon::Pistol.slot()] = true;
        unlocked[Weapon::Chaingun.slot()] = true;
        unlocked[Weapon::PipeBomb.slot()] = true;

        Self {
            x,
            y,
            heading,
            pitch: 0.0,
            z: 0.0,
            vz: 0.0,
            crouching: false,
            bob_phase: 0.0,
            health: MAX_HEALTH,
            armor: 0,
            score: 0,
            kills: 0,
            dead: false,
            weapon: Weapon::Pistol,
            ammo,
            unlocked,
            cooldown: 0,
            fire_anim: 0,
            keys: [false; 3],
            medkits: 1,
            steroid_charges: 0,
            steroid_timer: 0.0,
            has_jetpack: false,
            jetpack_on: false,
            jetpack_fuel: 0.0,
        }
    }

    /// Move to a new spawn pose keeping all stats (level transition).
    pub fn respawn_at(&mut self, x: f32, y: f32, heading: f32) {
        self.x = x;
        self.y = y;
        self.heading = heading;
        self.pitch = 0.0;
        self.z = 0.0;
        self.vz = 0.0;
        self.jetpack_on = false;
        self.cooldown = 0;
        self.fire_anim = 0;
    }

    pub fn is_airborne(&self) -> bool {
        self.z > 0.0
    }

    /// Current speed multiplier from sprint and the steroid buff.
    pub fn speed_multiplier(&self, sprinting: bool) -> f32 {
        let mut mult = 1.0;
        if sprinting {
            mult *= SPRINT_MULT;
        }
        if self.steroid_timer > 0.0 {
            mult *= STEROID_MULT;
        }
        mult
    }

    /// Eye-height offset for the renderer: vertical position plus
    /// head-bob (grounded only) minus the crouch drop.
    pub fn eye_height(&self) -> f32 {
        let bob = if self.is_airborne() {
            0.0
        } else {
            self.bob_phase.sin() * BOB_AMPLITUDE
        };
        let crouch = if self.crouching { CROUCH_OFFSET } else { 0.0 };
        self.z + bob - crouch
    }

    pub fn ammo_equipped(&self) -> i32 {
        self.ammo[self.weapon.slot()]
    }

    /// One fixed-timestep integration of look, movement, and vertical
    /// physics. Weapons and interactions are handled by the session.
    pub fn integrate(&mut self, map: &TileMap, input: &InputFrame, events: &mut Events, dt: f32) {
        // Look
        self.heading += input.look_dx;
        self.pitch = (self.pitch - input.look_dy * PITCH_SCALE).clamp(-PITCH_LIMIT, PITCH_LIMIT);

        // Buff timers
        if self.steroid_timer > 0.0 {
            self.steroid_timer = (self.steroid_timer - dt).max(0.0);
        }

        // Horizontal movement, axis-resolved so one blocked axis never
        // cancels the other (slide-along-walls)
        let (fwd, strafe) = input.move_intent();
        let speed = WALK_SPEED * self.speed_multiplier(input.sprint);
        let (sin, cos) = self.heading.sin_cos();
        let vx = (cos * fwd - sin * strafe) * speed * dt;
        let vy = (sin * fwd + cos * strafe) * speed * dt;

        let moving = fwd != 0.0 || strafe != 0.0;
        self.try_move_axis(map, vx, 0.0);
        self.try_move_axis(map, 0.0, vy);

        // Vertical: jetpack overrides jump/gravity while it has fuel
        if self.jetpack_on && self.jetpack_fuel > 0.0 {
            self.vz = 0.0;
            self.z = (self.z + JETPACK_CLIMB * dt).min(JETPACK_MAX_Z);
            self.jetpack_fuel = (self.jetpack_fuel - JETPACK_BURN * dt).max(0.0);
            if self.jetpack_fuel <= 0.0 {
                self.jetpack_on = false;
                events.messages.send("Jetpack out of fuel".to_string());
            }
        } else {
            if input.jump && !self.is_airborne() {
                self.vz = JUMP_IMPULSE;
                events.sounds.send(Sound::Jump);
            }
            self.vz -= GRAVITY * dt;
            self.z += self.vz * dt;
            if self.z <= 0.0 {
                self.z = 0.0;
                self.vz = 0.0;
            }
        }

        self.crouching = input.crouch && !self.is_airborne();

        // Head-bob advances with ground movement, freezes airborne
        if moving && !self.is_airborne() {
            self.bob_phase += BOB_RATE * self.speed_multiplier(input.sprint) * dt;
        }

        self.cooldown = self.cooldown.saturating_sub(1);
        self.fire_anim = self.fire_anim.saturating_sub(1);
    }

    /// Accept a single-axis move only if the destination (plus a radius
    /// margin on the moved axis) is clear.
    fn try_move_axis(&mut self, map: &TileMap, dx: f32, dy: f32) {
        if dx != 0.0 {
            let nx = self.x + dx;
            let margin = nx + PLAYER_RADIUS * dx.signum();
            if !map.is_blocked(nx, self.y) && !map.is_blocked(margin, self.y) {
                self.x = nx;
            }
        }
        if dy != 0.0 {
            let ny = self.y + dy;
            let margin = ny + PLAYER_RADIUS * dy.signum();
            if !map.is_blocked(self.x, ny) && !map.is_blocked(self.x, margin) {
                self.y = ny;
            }
        }
    }

    /// Use a carried medkit. Rejected at full health or with none left.
    pub fn use_medkit(&mut self, events: &mut Events) {
        if self.medkits <= 0 {
            events.messages.send("No medkits".to_string());
            return;
        }
        if self.health >= MAX_HEALTH {
            events.messages.send("Already at full health".to_string());
            return;
        }
        self.medkits -= 1;
        self.health = (self.health + MEDKIT_HEAL).min(MAX_HEALTH);
        events.sounds.send(Sound::MedkitUse);
    }

    /// Burn a steroid charge for a temporary strength buff.
    pub fn use_steroids(&mut self, events: &mut Events) {
        if self.steroid_charges <= 0 {
            events.messages.send("No steroids".to_string());
            return;
        }
        self.steroid_charges -= 1;
        self.steroid_timer = STEROID_DURATION;
        events.sounds.send(Sound::SteroidsUse);
        events.messages.send("Steroids!".to_string());
    }

    /// Toggle the jetpack. Rejected without the pack or without fuel.
    pub fn toggle_jetpack(&mut self, events: &mut Events) {
        if !self.has_jetpack {
            events.messages.send("No jetpack".to_string());
            return;
        }
        if !self.jetpack_on && self.jetpack_fuel <= 0.0 {
            events.messages.send("Jetpack out of fuel".to_string());
            return;
        }
        self.jetpack_on = !self.jetpack_on;
        events.sounds.send(Sound::JetpackToggle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::textures::Lcg;
    use crate::sim::TICK_DT;

    fn open_map() -> TileMap {
        TileMap::new()
    }

    #[test]
    fn test_walk_forward() {
        let map = open_map();
        let mut player = Player::new(5.5, 5.5, 0.0);
        let mut events = Events::new();
        let input = InputFrame {
            forward: true,
            ..Default::default()
        };
        for _ in 0..60 {
            player.integrate(&map, &input, &mut events, TICK_DT);
        }
        // One second of walking east at base speed
        assert!((player.x - (5.5 + WALK_SPEED)).abs() < 0.05, "x = {}", player.x);
        assert!((player.y - 5.5).abs() < 1e-4);
    }

    #[test]
    fn test_slide_along_wall() {
        let mut map = open_map();
        for y in 1..crate::map::MAP_SIZE - 1 {
            map.set_tile(7, y, 1);
        }
        let mut player = Player::new(6.5, 5.5, 0.0);
        let mut events = Events::new();
        // Pushing diagonally into the wall: X is blocked, Y still moves
        let input = InputFrame {
            forward: true,
            strafe_right: true,
            ..Default::default()
        };
        let start_y = player.y;
        for _ in 0..30 {
            player.integrate(&map, &input, &mut events, TICK_DT);
        }
        assert!(player.x < 7.0 - PLAYER_RADIUS + 0.01);
        assert!(player.y > start_y, "slide did not advance along the clear axis");
    }

    #[test]
    fn test_never_ends_inside_wall_fuzz() {
        let mut map = open_map();
        // Scatter interior walls
        let mut rng = Lcg::new(99);
        for _ in 0..60 {
            let x = 1 + rng.next_range(crate::map::MAP_SIZE - 2);
            let y = 1 + rng.next_range(crate::map::MAP_SIZE - 2);
            map.set_tile(x, y, 1 + rng.next_range(7) as u8);
        }
        let mut player = Player::new(1.5, 1.5, 0.0);
        if map.is_blocked(player.x, player.y) {
            map.set_tile(1, 1, 0);
        }

        let mut events = Events::new();
        for _ in 0..2000 {
            let input = InputFrame {
                forward: rng.next_f32() > 0.4,
                back: rng.next_f32() > 0.7,
                strafe_left: rng.next_f32() > 0.6,
                strafe_right: rng.next_f32() > 0.6,
                sprint: rng.next_f32() > 0.5,
                jump: rng.next_f32() > 0.9,
                look_dx: (rng.next_f32() - 0.5) * 0.6,
                ..Default::default()
            };
            player.integrate(&map, &input, &mut events, TICK_DT);
            assert!(
                !map.is_blocked(player.x, player.y),
                "player inside wall at ({}, {})",
                player.x,
                player.y
            );
        }
    }

    #[test]
    fn test_jump_and_land() {
        let map = open_map();
        let mut player = Player::new(5.5, 5.5, 0.0);
        let mut events = Events::new();
        let jump = InputFrame {
            jump: true,
            ..Default::default()
        };
        player.integrate(&map, &jump, &mut events, TICK_DT);
        assert!(player.is_airborne());

        // Gravity brings the player back down and clamps at the floor
        let idle = InputFrame::default();
        for _ in 0..120 {
            player.integrate(&map, &idle, &mut events, TICK_DT);
        }
        assert_eq!(player.z, 0.0);
        assert_eq!(player.vz, 0.0);
    }

    #[test]
    fn test_jetpack_depletes_and_auto_disables() {
        let map = open_map();
        let mut player = Player::new(5.5, 5.5, 0.0);
        let mut events = Events::new();
        player.has_jetpack = true;
        player.jetpack_fuel = 10.0;
        player.toggle_jetpack(&mut events);
        assert!(player.jetpack_on);

        let idle = InputFrame::default();
        // 10 fuel at 20/s burns out in half a second
        for _ in 0..40 {
            player.integrate(&map, &idle, &mut events, TICK_DT);
        }
        assert_eq!(player.jetpack_fuel, 0.0);
        assert!(!player.jetpack_on);
        assert!(player.z > 0.0);
    }

    #[test]
    fn test_crouch_and_bob_eye_height() {
        let map = open_map();
        let mut player = Player::new(5.5, 5.5, 0.0);
        let mut events = Events::new();
        player.crouching = true;
        assert!(player.eye_height() < 0.0);

        // Airborne suppresses head-bob
        player.crouching = false;
        player.bob_phase = std::f32::consts::FRAC_PI_2;
        player.z = 0.5;
        assert_eq!(player.eye_height(), 0.5);
        let _ = (&map, &mut events);
    }

    #[test]
    fn test_medkit_rejected_at_cap() {
        let mut player = Player::new(0.0, 0.0, 0.0);
        let mut events = Events::new();
        player.medkits = 2;
        player.use_medkit(&mut events);
        assert_eq!(player.medkits, 2, "medkit consumed at full health");

        player.health = 50;
        player.use_medkit(&mut events);
        assert_eq!(player.medkits, 1);
        assert_eq!(player.health, 90);
    }

    #[test]
    fn test_steroids_speed_multiplier() {
        let mut player = Player::new(0.0, 0.0, 0.0);
        let mut events = Events::new();
        player.steroid_charges = 1;
        player.use_steroids(&mut events);
        assert_eq!(player.steroid_timer, STEROID_DURATION);
        assert!((player.speed_multiplier(false) - STEROID_MULT).abs() < 1e-6);
        assert!((player.speed_multiplier(true) - STEROID_MULT * SPRINT_MULT).abs() < 1e-6);
    }
}
