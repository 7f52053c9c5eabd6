//! Pickups
//!
//! Tagged pickup kinds with an exhaustive-match collection effect.
//! `collected` is a one-way latch; health and armor pickups refuse to be
//! consumed while the matching stat is at its cap, so walking over them
//! at full health leaves them for later.

use serde::{Deserialize, Serialize};

use crate::sim::events::{Events, Sound};
use crate::sim::player::{Player, JETPACK_FUEL_MAX, MAX_ARMOR, MAX_HEALTH};
use crate::sim::weapons::Weapon;

/// Distance at which the player scoops a pickup.
pub const PICKUP_RADIUS: f32 = 0.5;

/// Score bonus granted by every successful pickup, on top of its effect.
pub const PICKUP_SCORE: i32 = 10;

/// Bob animation speed, radians per second.
const BOB_SPEED: f32 = 3.0;

/// What a pickup does on contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    /// +15 health on the spot
    SmallHealth,
    /// Carried medkit, used on demand
    Medkit,
    /// +50 armor
    Armor,
    AmmoPistol,
    AmmoShotgun,
    AmmoChaingun,
    AmmoRockets,
    AmmoPipeBombs,
    WeaponShotgun,
    WeaponRpg,
    /// Key card 1..=3
    KeyCard(u8),
    /// Carried steroid charge
    Steroids,
    /// +50 fuel; also grants the jetpack itself
    JetpackFuel,
    /// Level exit: collecting it completes the level
    Exit,
}

/// A placed pickup. `collected` never goes back to false.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Pickup {
    pub kind: PickupKind,
    pub x: f32,
    pub y: f32,
    pub collected: bool,
    /// Phase of the idle bob animation
    pub bob_phase: f32,
}

impl Pickup {
    pub fn spawn(kind: PickupKind, x: f32, y: f32) -> Self {
        Self {
            kind,
            x,
            y,
            collected: false,
            // Stagger bobbing by position so rows of pickups don't move in
            // lockstep
            bob_phase: x * 0.7 + y * 1.3,
        }
    }
}

/// Pickup phase of the tick. Returns true if the exit was collected.
pub fn update_pickups(
    pickups: &mut [Pickup],
    player: &mut Player,
    events: &mut Events,
    dt: f32,
) -> bool {
    let mut exit_reached = false;
    for pickup in pickups.iter_mut() {
        pickup.bob_phase += BOB_SPEED * dt;
        if pickup.collected {
            continue;
        }
        let dist = ((player.x - pickup.x).powi(2) + (player.y - pickup.y).powi(2)).sqrt();
        if dist >= PICKUP_RADIUS {
            continue;
        }
        if !apply_pickup(pickup.kind, player, events) {
            continue; // capped stat: leave it on the floor
        }
        pickup.collected = true;
        player.score += PICKUP_SCORE;
        events.sounds.send(Sound::PickupTaken);
        if pickup.kind == PickupKind::Exit {
            exit_reached = true;
        }
    }
    exit_reached
}

/// Apply a pickup's effect. Returns false when the pickup is rejected
/// (health/armor already at cap) and must not be consumed.
fn apply_pickup(kind: PickupKind, player: &mut Player, events: &mut Events) -> bool {
    match kind {
        PickupKind::SmallHealth => {
            if player.health >= MAX_HEALTH {
                return false;
            }
            player.health = (player.health + 15).min(MAX_HEALTH);
            events.messages.send("Picked up a stimpack".to_string());
        }
        PickupKind::Medkit => {
            player.medkits += 1;
            events.messages.send("Picked up a medkit".to_string());
        }
        PickupKind::Armor => {
            if player.armor >= MAX_ARMOR {
                return false;
            }
            player.armor = (player.armor + 50).min(MAX_ARMOR);
            events.messages.send("Picked up armor".to_string());
        }
        PickupKind::AmmoPistol => {
            player.ammo[Weapon::Pistol.slot()] += 24;
            events.messages.send("Pistol ammo".to_string());
        }
        PickupKind::AmmoShotgun => {
            player.ammo[Weapon::Shotgun.slot()] += 10;
            events.messages.send("Shotgun shells".to_string());
        }
        PickupKind::AmmoChaingun => {
            player.ammo[Weapon::Chaingun.slot()] += 60;
            events.messages.send("Chaingun belt".to_string());
        }
        PickupKind::AmmoRockets => {
            player.ammo[Weapon::Rpg.slot()] += 4;
            events.messages.send("Rockets".to_string());
        }
        PickupKind::AmmoPipeBombs => {
            player.ammo[Weapon::PipeBomb.slot()] += 3;
            events.messages.send("Pipe bombs".to_string());
        }
        PickupKind::WeaponShotgun => {
            player.unlocked[Weapon::Shotgun.slot()] = true;
            player.ammo[Weapon::Shotgun.slot()] += 10;
            events.messages.send("Got the shotgun!".to_string());
        }
        PickupKind::WeaponRpg => {
            player.unlocked[Weapon::Rpg.slot()] = true;
            player.ammo[Weapon::Rpg.slot()] += 4;
            events.messages.send("Got the RPG!".to_string());
        }
        PickupKind::KeyCard(card) => {
            let idx = (card as usize).saturating_sub(1).min(player.keys.len() - 1);
            player.keys[idx] = true;
            events
                .messages
                .send(format!("Picked up the {} card", card_name(card)));
        }
        PickupKind::Steroids => {
            player.steroid_charges += 1;
            events.messages.send("Picked up steroids".to_string());
        }
        PickupKind::JetpackFuel => {
            player.has_jetpack = true;
            player.jetpack_fuel = (player.jetpack_fuel + 50.0).min(JETPACK_FUEL_MAX);
            events.messages.send("Jetpack fuel".to_string());
        }
        PickupKind::Exit => {
            events.messages.send("Level complete!".to_string());
        }
    }
    true
}

pub fn card_name(card: u8) -> &'static str {
    match card {
        1 => "blue",
        2 => "red",
        _ => "yellow",
    }
}
