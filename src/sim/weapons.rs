//! Weapon definitions
//!
//! Five fixed slots with hand-tuned stat blocks. Behavior (hitscan
//! resolution, rocket spawning, pipe-bomb arming) lives in the session's
//! fire path; this module is the data.

use serde::{Deserialize, Serialize};

/// Number of weapon slots (and ammo counters).
pub const WEAPON_SLOTS: usize = 5;

/// The equippable weapons, one per slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Weapon {
    Pistol,
    Shotgun,
    Chaingun,
    Rpg,
    PipeBomb,
}

/// How a trigger pull resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireKind {
    /// Instant ray test against enemies and walls
    Hitscan,
    /// Spawns an area-damage projectile
    Rocket,
    /// Drops an armed charge, detonated on demand
    Thrown,
}

/// Per-weapon tuning.
#[derive(Debug, Clone, Copy)]
pub struct WeaponStats {
    /// Damage per pellet / warhead
    pub damage: i32,
    /// Ticks between shots
    pub cooldown: u32,
    /// Pellets per trigger pull (shotgun spread)
    pub pellets: u32,
    /// Max angular deviation per pellet, radians
    pub spread: f32,
    pub kind: FireKind,
}

impl Weapon {
    pub const ALL: [Weapon; WEAPON_SLOTS] = [
        Weapon::Pistol,
        Weapon::Shotgun,
        Weapon::Chaingun,
        Weapon::Rpg,
        Weapon::PipeBomb,
    ];

    /// Slot index for ammo/unlock tables.
    pub fn slot(self) -> usize {
        match self {
            Weapon::Pistol => 0,
            Weapon::Shotgun => 1,
            Weapon::Chaingun => 2,
            Weapon::Rpg => 3,
            Weapon::PipeBomb => 4,
        }
    }

    pub fn from_slot(slot: usize) -> Option<Weapon> {
        Weapon::ALL.get(slot).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Weapon::Pistol => "PISTOL",
            Weapon::Shotgun => "SHOTGUN",
            Weapon::Chaingun => "CHAINGUN",
            Weapon::Rpg => "RPG",
            Weapon::PipeBomb => "PIPE BOMB",
        }
    }

    pub fn stats(self) -> WeaponStats {
        match self {
            Weapon::Pistol => WeaponStats {
                damage: 12,
                cooldown: 18,
                pellets: 1,
                spread: 0.0,
                kind: FireKind::Hitscan,
            },
            Weapon::Shotgun => WeaponStats {
                damage: 7,
                cooldown: 45,
                pellets: 7,
                spread: 0.09,
                kind: FireKind::Hitscan,
            },
            Weapon::Chaingun => WeaponStats {
                damage: 9,
                cooldown: 6,
                pellets: 1,
                spread: 0.03,
                kind: FireKind::Hitscan,
            },
            Weapon::Rpg => WeaponStats {
                damage: 90,
                cooldown: 60,
                pellets: 1,
                spread: 0.0,
                kind: FireKind::Rocket,
            },
            Weapon::PipeBomb => WeaponStats {
                damage: 110,
                cooldown: 30,
                pellets: 1,
                spread: 0.0,
                kind: FireKind::Thrown,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_roundtrip() {
        for weapon in Weapon::ALL {
            assert_eq!(Weapon::from_slot(weapon.slot()), Some(weapon));
        }
        assert_eq!(Weapon::from_slot(WEAPON_SLOTS), None);
    }

    #[test]
    fn test_fire_kinds() {
        assert_eq!(Weapon::Pistol.stats().kind, FireKind::Hitscan);
        assert_eq!(Weapon::Rpg.stats().kind, FireKind::Rocket);
        assert_eq!(Weapon::PipeBomb.stats().kind, FireKind::Thrown);
        assert!(Weapon::Shotgun.stats().pellets > 1);
    }
}
