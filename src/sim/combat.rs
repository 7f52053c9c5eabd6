//! Damage application
//!
//! All damage funnels through here: armor absorption for the player,
//! kill accounting for enemies, and linear-falloff area damage for
//! explosions. Damage is integer arithmetic so the absorption rules are
//! exact.

use crate::sim::enemy::{Enemy, HURT_FLASH_TICKS};
use crate::sim::events::{Events, Sound, QUOTES};
use crate::sim::player::Player;

/// Blast radius shared by rockets and pipe bombs, map units.
pub const BLAST_RADIUS: f32 = 3.0;

/// Armor absorption rule: armor soaks up to two-thirds of the incoming
/// damage (bounded by what's left), but only half of the absorbed amount
/// actually comes off the health loss. Returns (absorbed, health_loss).
pub fn absorb_with_armor(damage: i32, armor: i32) -> (i32, i32) {
    let absorbed = armor.min(2 * damage / 3);
    (absorbed, damage - absorbed / 2)
}

/// Damage the player through armor. A no-op once dead (the game-over
/// latch); reaching zero health sets the latch.
pub fn apply_player_damage(player: &mut Player, damage: i32, events: &mut Events) {
    if player.dead || damage <= 0 {
        return;
    }
    let (absorbed, health_loss) = absorb_with_armor(damage, player.armor);
    player.armor -= absorbed;
    player.health -= health_loss;
    if player.health <= 0 {
        player.health = 0;
        player.dead = true;
        events.sounds.send(Sound::PlayerDie);
    } else {
        events.sounds.send(Sound::PlayerHurt);
    }
}

/// Damage an enemy. Awards score, the kill counter, and a quote exactly
/// once, on the tick the enemy dies.
pub fn damage_enemy(enemy: &mut Enemy, damage: i32, player: &mut Player, events: &mut Events) {
    if enemy.is_dead() || damage <= 0 {
        return;
    }
    enemy.health -= damage;
    enemy.hurt_timer = HURT_FLASH_TICKS;
    if enemy.is_dead() {
        enemy.health = 0;
        player.score += enemy.kind.stats().score;
        player.kills += 1;
        events.sounds.send(Sound::EnemyDie);
        events.quotes.send(QUOTES[(player.kills as usize - 1) % QUOTES.len()]);
    } else {
        events.sounds.send(Sound::EnemyHurt);
    }
}

/// Linear-falloff explosion damage for a listed damage `damage` at
/// distance `dist`: full at the center, zero at the radius and beyond.
pub fn explosion_damage(damage: i32, dist: f32) -> i32 {
    if dist >= BLAST_RADIUS {
        return 0;
    }
    (damage as f32 * (1.0 - dist / BLAST_RADIUS)) as i32
}

/// Area damage around (x, y): every enemy and the player take the
/// falloff-scaled hit.
pub fn explode(
    x: f32,
    y: f32,
    damage: i32,
    enemies: &mut [Enemy],
    player: &mut Player,
    events: &mut Events,
) {
    events.sounds.send(Sound::Explosion);
    for enemy in enemies.iter_mut() {
        let dealt = explosion_damage(damage, enemy.distance_to(x, y));
        damage_enemy(enemy, dealt, player, events);
    }
    let dist = ((player.x - x).powi(2) + (player.y - y).powi(2)).sqrt();
    apply_player_damage(player, explosion_damage(damage, dist), events);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::enemy::EnemyKind;

    #[test]
    fn test_armor_absorption_formula() {
        // The documented case: d=30, a=50 -> absorbed 20, health loss 20
        let (absorbed, loss) = absorb_with_armor(30, 50);
        assert_eq!(absorbed, 20);
        assert_eq!(loss, 20);

        // Armor-bounded: d=30, a=5 -> absorbed 5, health loss 28
        let (absorbed, loss) = absorb_with_armor(30, 5);
        assert_eq!(absorbed, 5);
        assert_eq!(loss, 28);

        // No armor absorbs nothing
        assert_eq!(absorb_with_armor(30, 0), (0, 30));
    }

    #[test]
    fn test_player_damage_through_armor() {
        let mut player = Player::new(0.0, 0.0, 0.0);
        player.armor = 50;
        let mut events = Events::new();

        apply_player_damage(&mut player, 30, &mut events);
        assert_eq!(player.armor, 30);
        assert_eq!(player.health, 80);
        assert!(!player.dead);
    }

    #[test]
    fn test_game_over_latch() {
        let mut player = Player::new(0.0, 0.0, 0.0);
        player.health = 10;
        let mut events = Events::new();

        apply_player_damage(&mut player, 500, &mut events);
        assert!(player.dead);
        assert_eq!(player.health, 0);

        // Latched: further damage is ignored entirely
        let armor_before = player.armor;
        apply_player_damage(&mut player, 500, &mut events);
        assert_eq!(player.health, 0);
        assert_eq!(player.armor, armor_before);
    }

    #[test]
    fn test_kill_scores_exactly_once() {
        let mut player = Player::new(0.0, 0.0, 0.0);
        let mut enemy = Enemy::spawn(EnemyKind::Grunt, 1.0, 0.0);
        let mut events = Events::new();

        damage_enemy(&mut enemy, 1000, &mut player, &mut events);
        assert!(enemy.is_dead());
        assert_eq!(player.kills, 1);
        assert_eq!(player.score, EnemyKind::Grunt.stats().score);
        assert_eq!(events.quotes.len(), 1);

        // Shooting the corpse changes nothing
        damage_enemy(&mut enemy, 1000, &mut player, &mut events);
        assert_eq!(player.kills, 1);
        assert_eq!(player.score, EnemyKind::Grunt.stats().score);
        assert_eq!(events.quotes.len(), 1);
    }

    #[test]
    fn test_explosion_falloff() {
        let listed = 100;
        assert_eq!(explosion_damage(listed, 0.0), listed);
        assert_eq!(explosion_damage(listed, BLAST_RADIUS), 0);
        assert_eq!(explosion_damage(listed, BLAST_RADIUS * 2.0), 0);
        assert_eq!(explosion_damage(listed, BLAST_RADIUS / 2.0), listed / 2);
    }

    #[test]
    fn test_explode_hits_everyone_in_radius() {
        let mut player = Player::new(2.0, 0.0, 0.0);
        let mut enemies = vec![
            Enemy::spawn(EnemyKind::Heavy, 0.0, 0.0),
            Enemy::spawn(EnemyKind::Grunt, 100.0, 0.0),
        ];
        let mut events = Events::new();

        explode(0.0, 0.0, 90, &mut enemies, &mut player, &mut events);
        assert!(enemies[0].health < enemies[0].max_health, "center enemy unhurt");
        assert_eq!(enemies[1].health, enemies[1].max_health, "far enemy hurt");
        assert!(player.health < 100, "player outside blast untouched");
    }
}
