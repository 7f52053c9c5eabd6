//! Projectiles and pipe bombs
//!
//! Projectiles integrate every tick and die on the first wall or body
//! they touch; rockets trade the direct hit for an area blast. Pipe
//! bombs sit armed where they land until the player detonates the whole
//! batch at once.

use serde::{Deserialize, Serialize};

use crate::map::TileMap;
use crate::sim::combat::{apply_player_damage, damage_enemy, explode};
use crate::sim::enemy::{Enemy, ENEMY_RADIUS};
use crate::sim::events::Events;
use crate::sim::player::Player;

/// Hit radius against the player body.
const PLAYER_HIT_RADIUS: f32 = 0.3;

/// An in-flight shot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Projectile {
    pub x: f32,
    pub y: f32,
    /// Velocity, map units per second
    pub vx: f32,
    pub vy: f32,
    pub damage: i32,
    /// Player-fired shots hit enemies; enemy shots hit the player
    pub from_player: bool,
    /// Rockets explode on impact instead of applying point damage
    pub rocket: bool,
}

/// An armed pipe bomb waiting for the detonate action.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PipeBomb {
    pub x: f32,
    pub y: f32,
    pub damage: i32,
    /// Ticks since it was thrown (drives the blink animation)
    pub armed_ticks: u32,
}

/// Projectile phase of the tick: integrate, collide with walls, then
/// with whichever side the shot doesn't belong to.
pub fn update_projectiles(
    projectiles: &mut Vec<Projectile>,
    map: &TileMap,
    enemies: &mut [Enemy],
    player: &mut Player,
    events: &mut Events,
    dt: f32,
) {
    let mut i = 0;
    while i < projectiles.len() {
        let mut p = projectiles[i];
        p.x += p.vx * dt;
        p.y += p.vy * dt;

        let mut remove = false;

        if map.is_blocked(p.x, p.y) {
            if p.rocket {
                explode(p.x, p.y, p.damage, enemies, player, events);
            }
            remove = true;
        } else if p.from_player {
            for enemy in enemies.iter_mut() {
                if enemy.is_dead() {
                    continue;
                }
                if enemy.distance_to(p.x, p.y) < ENEMY_RADIUS + 0.1 {
                    remove = true;
                    break;
                }
            }
            if remove {
                if p.rocket {
                    explode(p.x, p.y, p.damage, enemies, player, events);
                } else if let Some(enemy) = enemies
                    .iter_mut()
                    .filter(|e| !e.is_dead())
                    .find(|e| e.distance_to(p.x, p.y) < ENEMY_RADIUS + 0.1)
                {
                    damage_enemy(enemy, p.damage, player, events);
                }
            }
        } else {
            let dist = ((player.x - p.x).powi(2) + (player.y - p.y).powi(2)).sqrt();
            if dist < PLAYER_HIT_RADIUS {
                apply_player_damage(player, p.damage, events);
                remove = true;
            }
        }

        if remove {
            projectiles.swap_remove(i);
        } else {
            projectiles[i] = p;
            i += 1;
        }
    }
}

/// Advance pipe-bomb arm timers (blink animation only; bombs are inert
/// until detonated).
pub fn tick_pipe_bombs(bombs: &mut [PipeBomb]) {
    for bomb in bombs.iter_mut() {
        bomb.armed_ticks = bomb.armed_ticks.saturating_add(1);
    }
}

/// Detonate every armed pipe bomb at once.
pub fn detonate_pipe_bombs(
    bombs: &mut Vec<PipeBomb>,
    enemies: &mut [Enemy],
    player: &mut Player,
    events: &mut Events,
) {
    for bomb in bombs.drain(..) {
        explode(bomb.x, bomb.y, bomb.damage, enemies, player, events);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::enemy::EnemyKind;
    use crate::sim::TICK_DT;

    #[test]
    fn test_projectile_dies_on_wall() {
        let map = TileMap::new();
        let mut player = Player::new(5.5, 5.5, 0.0);
        let mut enemies = Vec::new();
        let mut events = Events::new();
        // Flying east into the border wall
        let mut shots = vec![Projectile {
            x: 21.0,
            y: 5.5,
            vx: 12.0,
            vy: 0.0,
            damage: 10,
            from_player: true,
            rocket: false,
        }];

        for _ in 0..60 {
            update_projectiles(&mut shots, &map, &mut enemies, &mut player, &mut events, TICK_DT);
        }
        assert!(shots.is_empty(), "projectile survived the wall");
    }

    #[test]
    fn test_player_shot_hits_enemy() {
        let map = TileMap::new();
        let mut player = Player::new(5.5, 5.5, 0.0);
        let mut enemies = vec![Enemy::spawn(EnemyKind::Grunt, 8.5, 5.5)];
        let mut events = Events::new();
        let mut shots = vec![Projectile {
            x: 6.0,
            y: 5.5,
            vx: 10.0,
            vy: 0.0,
            damage: 12,
            from_player: true,
            rocket: false,
        }];

        for _ in 0..60 {
            update_projectiles(&mut shots, &map, &mut enemies, &mut player, &mut events, TICK_DT);
        }
        assert!(shots.is_empty());
        assert_eq!(enemies[0].health, enemies[0].max_health - 12);
        assert_eq!(player.health, 100, "friendly fire on the player");
    }

    #[test]
    fn test_enemy_shot_hits_player() {
        let map = TileMap::new();
        let mut player = Player::new(8.5, 5.5, 0.0);
        let mut enemies = vec![Enemy::spawn(EnemyKind::Grunt, 5.5, 5.5)];
        let mut events = Events::new();
        let mut shots = vec![Projectile {
            x: 6.0,
            y: 5.5,
            vx: 10.0,
            vy: 0.0,
            damage: 8,
            from_player: false,
            rocket: false,
        }];

        for _ in 0..60 {
            update_projectiles(&mut shots, &map, &mut enemies, &mut player, &mut events, TICK_DT);
        }
        assert!(shots.is_empty());
        assert_eq!(player.health, 92);
        assert_eq!(enemies[0].health, enemies[0].max_health, "enemy shot its own side");
    }

    #[test]
    fn test_rocket_explodes_on_impact() {
        let map = TileMap::new();
        let mut player = Player::new(2.5, 2.5, 0.0);
        // Two enemies close together: the rocket hits one, the blast
        // catches both
        let mut enemies = vec![
            Enemy::spawn(EnemyKind::Grunt, 10.5, 5.5),
            Enemy::spawn(EnemyKind::Grunt, 11.5, 5.5),
        ];
        let mut events = Events::new();
        let mut shots = vec![Projectile {
            x: 6.0,
            y: 5.5,
            vx: 10.0,
            vy: 0.0,
            damage: 90,
            from_player: true,
            rocket: true,
        }];

        for _ in 0..120 {
            update_projectiles(&mut shots, &map, &mut enemies, &mut player, &mut events, TICK_DT);
        }
        assert!(shots.is_empty());
        assert!(enemies[0].is_dead());
        assert!(enemies[1].health < enemies[1].max_health, "blast missed the neighbor");
    }

    #[test]
    fn test_detonate_clears_all_bombs() {
        let mut player = Player::new(20.5, 20.5, 0.0);
        let mut enemies = vec![Enemy::spawn(EnemyKind::Grunt, 5.5, 5.5)];
        let mut events = Events::new();
        let mut bombs = vec![
            PipeBomb { x: 5.5, y: 5.5, damage: 110, armed_ticks: 30 },
            PipeBomb { x: 6.5, y: 5.5, damage: 110, armed_ticks: 12 },
        ];

        detonate_pipe_bombs(&mut bombs, &mut enemies, &mut player, &mut events);
        assert!(bombs.is_empty());
        assert!(enemies[0].is_dead());
        assert_eq!(player.health, 100, "player hurt from across the map");
    }
}
