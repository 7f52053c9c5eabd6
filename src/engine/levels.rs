//! Built-in level definitions
//!
//! Levels are fixed procedural descriptions, not external data: wall
//! segments, door placements, enemy spawns, and pickup spawns. A spawn
//! outside grid bounds is a bug in the level table, caught by the debug
//! assertions in `build_map`, never a runtime-recoverable case.

use serde::{Deserialize, Serialize};

use crate::map::{TileMap, MAP_SIZE};
use crate::sim::{Enemy, EnemyKind, Pickup, PickupKind};

/// Number of built-in levels; completing the last one wins the run.
pub const LEVEL_COUNT: usize = 3;

/// An inclusive straight run of wall tiles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WallSeg {
    pub x0: usize,
    pub y0: usize,
    pub x1: usize,
    pub y1: usize,
    /// Wall tile code 1..=7 (texture id = code - 1)
    pub material: u8,
}

/// A door tile and the key card it demands (0 = none).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DoorDef {
    pub x: usize,
    pub y: usize,
    pub required_key: u8,
}

/// One level, fully described.
#[derive(Debug, Clone)]
pub struct LevelDef {
    pub name: &'static str,
    /// (x, y, heading)
    pub player_start: (f32, f32, f32),
    pub walls: Vec<WallSeg>,
    pub doors: Vec<DoorDef>,
    pub enemies: Vec<(EnemyKind, f32, f32)>,
    pub pickups: Vec<(PickupKind, f32, f32)>,
}

fn seg(x0: usize, y0: usize, x1: usize, y1: usize, material: u8) -> WallSeg {
    WallSeg { x0, y0, x1, y1, material }
}

/// Level description by index. Precondition: `index < LEVEL_COUNT`.
pub fn level(index: usize) -> LevelDef {
    debug_assert!(index < LEVEL_COUNT, "no such level: {}", index);
    match index {
        0 => holding_cells(),
        1 => service_tunnels(),
        _ => reactor_core(),
    }
}

/// Level 1: two cell blocks split by a wall, a locked annex holding the
/// exit at tile (21, 21) behind the blue door.
fn holding_cells() -> LevelDef {
    LevelDef {
        name: "Holding Cells",
        player_start: (2.5, 2.5, 0.0),
        walls: vec![
            // Cell block divider with a gap at y = 9..=11
            seg(8, 1, 8, 8, 1),
            seg(8, 12, 8, 18, 1),
            // Lower corridor wall
            seg(1, 14, 7, 14, 2),
            // Annex around the exit
            seg(16, 16, 16, 22, 3),
            seg(16, 16, 22, 16, 3),
            // Storage nook
            seg(12, 4, 15, 4, 6),
            seg(15, 4, 15, 7, 6),
        ],
        doors: vec![
            // Free door between the cell blocks
            DoorDef { x: 8, y: 10, required_key: 0 },
            // Blue door into the exit annex
            DoorDef { x: 19, y: 16, required_key: 1 },
        ],
        enemies: vec![
            (EnemyKind::Grunt, 11.5, 2.5),
            (EnemyKind::Grunt, 5.5, 17.5),
            (EnemyKind::Gunner, 14.5, 10.5),
            (EnemyKind::Heavy, 19.5, 19.5),
        ],
        pickups: vec![
            (PickupKind::SmallHealth, 3.5, 12.5),
            (PickupKind::Armor, 13.5, 5.5),
            (PickupKind::WeaponShotgun, 12.5, 17.5),
            (PickupKind::AmmoPistol, 6.5, 6.5),
            (PickupKind::Medkit, 2.5, 21.5),
            (PickupKind::KeyCard(1), 14.5, 2.5),
            (PickupKind::Exit, 21.5, 21.5),
        ],
    }
}

/// Level 2: long corridors, first rockets, first stalkers.
fn service_tunnels() -> LevelDef {
    LevelDef {
        name: "Service Tunnels",
        player_start: (2.5, 21.5, -std::f32::consts::FRAC_PI_2),
        walls: vec![
            seg(1, 18, 16, 18, 2),
            seg(6, 1, 6, 10, 5),
            seg(6, 10, 14, 10, 5),
            seg(14, 10, 14, 14, 5),
            seg(18, 4, 18, 14, 4),
            seg(10, 14, 10, 17, 3),
            seg(20, 18, 22, 18, 4),
        ],
        doors: vec![
            DoorDef { x: 8, y: 18, required_key: 0 },
            DoorDef { x: 18, y: 8, required_key: 2 },
            DoorDef { x: 14, y: 12, required_key: 0 },
        ],
        enemies: vec![
            (EnemyKind::Grunt, 4.5, 14.5),
            (EnemyKind::Grunt, 12.5, 15.5),
            (EnemyKind::Gunner, 16.5, 6.5),
            (EnemyKind::Stalker, 9.5, 5.5),
            (EnemyKind::Stalker, 20.5, 12.5),
            (EnemyKind::Heavy, 21.5, 4.5),
        ],
        pickups: vec![
            (PickupKind::AmmoShotgun, 3.5, 16.5),
            (PickupKind::SmallHealth, 12.5, 19.5),
            (PickupKind::SmallHealth, 16.5, 12.5),
            (PickupKind::WeaponRpg, 21.5, 20.5),
            (PickupKind::AmmoRockets, 20.5, 21.5),
            (PickupKind::KeyCard(2), 2.5, 2.5),
            (PickupKind::JetpackFuel, 12.5, 2.5),
            (PickupKind::Armor, 16.5, 2.5),
            (PickupKind::Exit, 21.5, 2.5),
        ],
    }
}

/// Level 3: the gauntlet. Heavies everywhere, steroids if you can grab
/// them, exit behind the yellow door.
fn reactor_core() -> LevelDef {
    LevelDef {
        name: "Reactor Core",
        player_start: (12.5, 21.5, -std::f32::consts::FRAC_PI_2),
        walls: vec![
            // Core chamber
            seg(9, 8, 9, 14, 3),
            seg(15, 8, 15, 14, 3),
            seg(9, 8, 15, 8, 3),
            seg(9, 14, 11, 14, 3),
            seg(13, 14, 15, 14, 3),
            // Flanking halls
            seg(4, 4, 4, 18, 6),
            seg(20, 4, 20, 18, 6),
            seg(4, 4, 9, 4, 7),
            seg(15, 4, 20, 4, 7),
        ],
        doors: vec![
            DoorDef { x: 12, y: 14, required_key: 0 },
            DoorDef { x: 12, y: 8, required_key: 3 },
        ],
        enemies: vec![
            (EnemyKind::Heavy, 12.5, 11.5),
            (EnemyKind::Heavy, 6.5, 6.5),
            (EnemyKind::Heavy, 18.5, 6.5),
            (EnemyKind::Gunner, 2.5, 12.5),
            (EnemyKind::Gunner, 21.5, 12.5),
            (EnemyKind::Stalker, 6.5, 19.5),
            (EnemyKind::Stalker, 17.5, 19.5),
            (EnemyKind::Grunt, 12.5, 17.5),
        ],
        pickups: vec![
            (PickupKind::Steroids, 2.5, 21.5),
            (PickupKind::Medkit, 21.5, 21.5),
            (PickupKind::Armor, 2.5, 2.5),
            (PickupKind::AmmoChaingun, 12.5, 19.5),
            (PickupKind::AmmoRockets, 6.5, 2.5),
            (PickupKind::AmmoPipeBombs, 17.5, 2.5),
            (PickupKind::KeyCard(3), 21.5, 2.5),
            (PickupKind::SmallHealth, 10.5, 11.5),
            (PickupKind::Exit, 12.5, 5.5),
        ],
    }
}

/// Materialize a level's geometry into a tile map.
pub fn build_map(def: &LevelDef) -> TileMap {
    let mut map = TileMap::new();
    for seg in &def.walls {
        debug_assert!(seg.x0 < MAP_SIZE && seg.x1 < MAP_SIZE);
        debug_assert!(seg.y0 < MAP_SIZE && seg.y1 < MAP_SIZE);
        place_segment(&mut map, seg);
    }
    for door in &def.doors {
        debug_assert!(door.x < MAP_SIZE && door.y < MAP_SIZE);
        map.add_door(door.x, door.y, door.required_key);
    }
    map
}

/// Walk a straight (axis-aligned or 45-degree) segment, inclusive of
/// both endpoints.
fn place_segment(map: &mut TileMap, seg: &WallSeg) {
    let (dx, dy) = (
        (seg.x1 as i32 - seg.x0 as i32).signum(),
        (seg.y1 as i32 - seg.y0 as i32).signum(),
    );
    let steps = (seg.x1 as i32 - seg.x0 as i32)
        .abs()
        .max((seg.y1 as i32 - seg.y0 as i32).abs());
    let (mut x, mut y) = (seg.x0 as i32, seg.y0 as i32);
    for _ in 0..=steps {
        map.set_tile(x as usize, y as usize, seg.material);
        x += dx;
        y += dy;
    }
}

/// Spawn the entity collections a level starts with.
pub fn spawn_entities(def: &LevelDef) -> (Vec<Enemy>, Vec<Pickup>) {
    let enemies = def
        .enemies
        .iter()
        .map(|&(kind, x, y)| Enemy::spawn(kind, x, y))
        .collect();
    let pickups = def
        .pickups
        .iter()
        .map(|&(kind, x, y)| Pickup::spawn(kind, x, y))
        .collect();
    (enemies, pickups)
}
