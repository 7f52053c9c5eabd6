//! World Model
//!
//! The tile grid, the door registry, and the DDA ray caster. This module
//! owns level geometry only - entities live in `sim`, and the renderer
//! queries geometry through `is_blocked` and `cast_ray` without ever
//! mutating it.
//!
//! Tile codes: `0` = open floor, `1..=7` = wall (texture id = code - 1),
//! `8` = door. The border ring of every map is sealed with walls, so rays
//! and movement can never escape the grid.

pub mod textures;

pub use textures::{Color, Texture, TextureSet, TEX_SIZE};

use serde::{Deserialize, Serialize};

/// Side length of the (square) tile grid.
pub const MAP_SIZE: usize = 24;

/// Tile code marking a door.
pub const DOOR_TILE: u8 = 8;

/// Open-fraction above which a door no longer blocks movement.
pub const DOOR_PASSABLE: f32 = 0.85;

/// Open-fraction above which a door no longer occludes rays.
pub const DOOR_RAY_OPEN: f32 = 0.9;

/// Door opening speed in open-fraction per second.
pub const DOOR_OPEN_RATE: f32 = 2.5;

/// Texture id used for door faces (wall codes 1..=7 map to ids 0..=6).
pub const DOOR_TEXTURE: u8 = 7;

/// A door occupying a single tile.
///
/// Doors animate open monotonically once triggered and never close again,
/// so `open` is non-decreasing for the lifetime of the level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Door {
    /// Grid coordinate of the door tile
    pub x: usize,
    pub y: usize,
    /// Required key card (0 = none, 1..=3 = card index)
    pub required_key: u8,
    /// Open fraction in [0, 1]
    pub open: f32,
    /// Latched once the door has been triggered
    pub opening: bool,
}

impl Door {
    pub fn new(x: usize, y: usize, required_key: u8) -> Self {
        Self {
            x,
            y,
            required_key,
            open: 0.0,
            opening: false,
        }
    }

    /// Does this door still block movement?
    pub fn blocks_movement(&self) -> bool {
        self.open <= DOOR_PASSABLE
    }

    /// Does this door still block rays?
    pub fn blocks_rays(&self) -> bool {
        self.open < DOOR_RAY_OPEN
    }

    /// Advance the opening animation. Open fraction is monotonic and
    /// clamps at fully open.
    pub fn tick(&mut self, dt: f32) {
        if self.opening && self.open < 1.0 {
            self.open = (self.open + DOOR_OPEN_RATE * dt).min(1.0);
        }
    }
}

/// Which grid axis the DDA stepped across last before hitting a wall.
/// Selects texture shading and the mirror-flip of the sampled column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    X,
    Y,
}

/// Result of a ray cast against the tile grid.
#[derive(Debug, Clone, Copy)]
pub struct RayHit {
    /// Texture id of the wall that was hit
    pub material: u8,
    /// Perpendicular distance to the hit (projected onto the camera
    /// forward axis when cast with a plane-offset direction), which
    /// avoids fisheye distortion in the projection
    pub distance: f32,
    /// Fractional hit position along the wall face, in [0, 1)
    pub wall_x: f32,
    /// Axis stepped last before the hit
    pub side: Side,
}

/// The level geometry: tile codes plus the doors keyed to door tiles.
pub struct TileMap {
    tiles: [[u8; MAP_SIZE]; MAP_SIZE],
    pub doors: Vec<Door>,
}

impl TileMap {
    /// Create an all-floor map with a sealed border ring.
    pub fn new() -> Self {
        let mut tiles = [[0u8; MAP_SIZE]; MAP_SIZE];
        for i in 0..MAP_SIZE {
            tiles[0][i] = 1;
            tiles[MAP_SIZE - 1][i] = 1;
            tiles[i][0] = 1;
            tiles[i][MAP_SIZE - 1] = 1;
        }
        Self {
            tiles,
            doors: Vec::new(),
        }
    }

    /// Tile code at a grid coordinate. Out-of-bounds reads as a wall,
    /// so callers never have to special-case the map edge.
    pub fn tile(&self, x: i32, y: i32) -> u8 {
        if x < 0 || y < 0 || x >= MAP_SIZE as i32 || y >= MAP_SIZE as i32 {
            return 1;
        }
        self.tiles[y as usize][x as usize]
    }

    /// Write a tile code. The border ring stays sealed no matter what the
    /// level description asks for.
    pub fn set_tile(&mut self, x: usize, y: usize, code: u8) {
        if x == 0 || y == 0 || x == MAP_SIZE - 1 || y == MAP_SIZE - 1 {
            return;
        }
        if x < MAP_SIZE && y < MAP_SIZE {
            self.tiles[y][x] = code;
        }
    }

    /// Place a door: marks the tile and registers the door record.
    pub fn add_door(&mut self, x: usize, y: usize, required_key: u8) {
        self.set_tile(x, y, DOOR_TILE);
        self.doors.push(Door::new(x, y, required_key));
    }

    pub fn door_at(&self, x: usize, y: usize) -> Option<&Door> {
        self.doors.iter().find(|d| d.x == x && d.y == y)
    }

    pub fn door_at_mut(&mut self, x: usize, y: usize) -> Option<&mut Door> {
        self.doors.iter_mut().find(|d| d.x == x && d.y == y)
    }

    /// Is the tile containing (x, y) solid for movement purposes?
    ///
    /// Walls and out-of-bounds are always blocked; door tiles block until
    /// their open fraction has passed the movement threshold.
    pub fn is_blocked(&self, x: f32, y: f32) -> bool {
        let tx = x.floor() as i32;
        let ty = y.floor() as i32;
        match self.tile(tx, ty) {
            0 => false,
            DOOR_TILE => self
                .door_at(tx as usize, ty as usize)
                .map(|d| d.blocks_movement())
                .unwrap_or(true),
            _ => true,
        }
    }

    /// Advance all door animations by one timestep.
    pub fn tick_doors(&mut self, dt: f32) {
        for door in &mut self.doors {
            door.tick(dt);
        }
    }

    /// Cast a ray from (ox, oy) along `angle`.
    ///
    /// Convenience wrapper over [`cast_ray_dir`] with a unit direction;
    /// the returned distance is then the Euclidean distance along the ray.
    pub fn cast_ray(&self, ox: f32, oy: f32, angle: f32) -> RayHit {
        self.cast_ray_dir(ox, oy, angle.cos(), angle.sin())
    }

    /// Cast a ray with an explicit direction vector using DDA traversal.
    ///
    /// The ray steps one tile boundary at a time along whichever axis has
    /// accumulated less distance. When the direction is a camera ray
    /// (forward + plane offset, unnormalized) the returned distance is the
    /// perpendicular distance to the camera plane, which is what the wall
    /// pass needs to avoid fisheye.
    ///
    /// Door tiles with an open fraction at or past [`DOOR_RAY_OPEN`] are
    /// transparent to the ray.
    pub fn cast_ray_dir(&self, ox: f32, oy: f32, dx: f32, dy: f32) -> RayHit {
        let mut map_x = ox.floor() as i32;
        let mut map_y = oy.floor() as i32;

        // Distance the ray travels crossing one full tile on each axis
        let delta_x = if dx.abs() < 1e-8 { f32::MAX } else { (1.0 / dx).abs() };
        let delta_y = if dy.abs() < 1e-8 { f32::MAX } else { (1.0 / dy).abs() };

        let (step_x, mut side_x) = if dx < 0.0 {
            (-1, (ox - map_x as f32) * delta_x)
        } else {
            (1, (map_x as f32 + 1.0 - ox) * delta_x)
        };
        let (step_y, mut side_y) = if dy < 0.0 {
            (-1, (oy - map_y as f32) * delta_y)
        } else {
            (1, (map_y as f32 + 1.0 - oy) * delta_y)
        };

        let mut side = Side::X;

        // The sealed border guarantees a hit; the step cap is only a
        // guard against a degenerate zero direction.
        for _ in 0..(MAP_SIZE * 4) {
            if side_x < side_y {
                side_x += delta_x;
                map_x += step_x;
                side = Side::X;
            } else {
                side_y += delta_y;
                map_y += step_y;
                side = Side::Y;
            }

            let code = self.tile(map_x, map_y);
            if code == 0 {
                continue;
            }
            if code == DOOR_TILE {
                let transparent = self
                    .door_at(map_x as usize, map_y as usize)
                    .map(|d| !d.blocks_rays())
                    .unwrap_or(false);
                if transparent {
                    continue;
                }
            }

            let distance = match side {
                Side::X => (side_x - delta_x).max(1e-4),
                Side::Y => (side_y - delta_y).max(1e-4),
            };

            // Fractional position along the wall face, flipped by the
            // caller per side/direction for texture sampling
            let wall_x = match side {
                Side::X => oy + distance * dy,
                Side::Y => ox + distance * dx,
            };
            let wall_x = wall_x - wall_x.floor();

            let material = if code == DOOR_TILE {
                DOOR_TEXTURE
            } else {
                code - 1
            };
            return RayHit {
                material,
                distance,
                wall_x,
                side,
            };
        }

        RayHit {
            material: 0,
            distance: f32::MAX,
            wall_x: 0.0,
            side: Side::X,
        }
    }
}

impl Default for TileMap {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_border_sealed() {
        let map = TileMap::new();
        for i in 0..MAP_SIZE as i32 {
            assert_ne!(map.tile(i, 0), 0);
            assert_ne!(map.tile(i, MAP_SIZE as i32 - 1), 0);
            assert_ne!(map.tile(0, i), 0);
            assert_ne!(map.tile(MAP_SIZE as i32 - 1, i), 0);
        }

        // set_tile must refuse to open the ring
        let mut map = TileMap::new();
        map.set_tile(0, 5, 0);
        assert_ne!(map.tile(0, 5), 0);
    }

    #[test]
    fn test_out_of_bounds_blocked() {
        let map = TileMap::new();
        assert!(map.is_blocked(-1.0, 5.0));
        assert!(map.is_blocked(5.0, 1000.0));
    }

    #[test]
    fn test_cast_ray_unit_distance() {
        let mut map = TileMap::new();
        map.set_tile(6, 5, 3); // wall with texture id 2 one tile east

        // Cast from the center of the open tile (5, 5) straight east
        let hit = map.cast_ray(5.5, 5.5, 0.0);
        assert_eq!(hit.material, 2);
        assert_eq!(hit.side, Side::X);
        assert!(hit.distance > 0.0 && hit.distance <= 1.0, "distance {}", hit.distance);
    }

    #[test]
    fn test_ray_passes_open_door() {
        let mut map = TileMap::new();
        map.add_door(6, 5, 0);
        map.set_tile(8, 5, 2);

        // Closed door occludes
        let hit = map.cast_ray(5.5, 5.5, 0.0);
        assert_eq!(hit.material, DOOR_TEXTURE);

        // Nearly-open door is transparent, ray continues to the wall behind
        map.door_at_mut(6, 5).unwrap().open = DOOR_RAY_OPEN;
        let hit = map.cast_ray(5.5, 5.5, 0.0);
        assert_eq!(hit.material, 1);
        assert!(hit.distance > 2.0);
    }

    #[test]
    fn test_door_blocks_until_threshold() {
        let mut map = TileMap::new();
        map.add_door(6, 5, 0);
        assert!(map.is_blocked(6.5, 5.5));

        map.door_at_mut(6, 5).unwrap().open = DOOR_PASSABLE + 0.01;
        assert!(!map.is_blocked(6.5, 5.5));
    }

    #[test]
    fn test_door_opens_monotonically() {
        let mut door = Door::new(3, 3, 0);
        let dt = 1.0 / 60.0;

        // Untriggered doors stay shut
        door.tick(dt);
        assert_eq!(door.open, 0.0);

        door.opening = true;
        let expected_ticks = (1.0 / (DOOR_OPEN_RATE * dt)).ceil() as u32;
        let mut prev = 0.0;
        let mut ticks = 0;
        while door.open < 1.0 {
            door.tick(dt);
            assert!(door.open >= prev);
            prev = door.open;
            ticks += 1;
            assert!(ticks <= expected_ticks, "door took too long to open");
        }
        assert_eq!(ticks, expected_ticks);
        assert_eq!(door.open, 1.0);

        // Never closes
        door.tick(dt);
        assert_eq!(door.open, 1.0);
    }

    #[test]
    fn test_perpendicular_distance_plane_ray() {
        let mut map = TileMap::new();
        map.set_tile(8, 5, 1);
        for y in 1..MAP_SIZE - 1 {
            map.set_tile(8, y, 1);
        }

        // A camera ray offset along the plane still reports the
        // perpendicular distance to the wall, not the longer Euclidean one
        let hit = map.cast_ray_dir(5.5, 5.5, 1.0, 0.5);
        assert!((hit.distance - 2.5).abs() < 1e-3, "distance {}", hit.distance);
    }
}
