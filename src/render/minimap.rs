//! Top-down minimap
//!
//! A square tile overview rendered into its own small buffer: tinted
//! tiles, a player marker with a heading tick, and dots for live
//! enemies. Pickups and projectiles are deliberately not shown.

use crate::engine::Session;
use crate::map::{Color, DOOR_TILE, MAP_SIZE};

use super::{Framebuffer, MINIMAP_SIZE};

const FLOOR_TINT: Color = Color::new(26, 28, 32);
const DOOR_TINT: Color = Color::new(90, 140, 190);
const PLAYER_TINT: Color = Color::new(80, 230, 110);
const ENEMY_TINT: Color = Color::new(230, 70, 60);

/// Wall tint by tile code, matching the texture palette loosely enough
/// to orient by.
fn wall_tint(code: u8) -> Color {
    match code {
        1 => Color::new(142, 58, 44),
        2 => Color::new(110, 110, 118),
        3 => Color::new(96, 104, 112),
        4 => Color::new(52, 96, 72),
        5 => Color::new(48, 118, 48),
        6 => Color::new(120, 72, 40),
        _ => Color::new(180, 180, 176),
    }
}

/// Render the minimap for the current session. The buffer should be
/// [`MINIMAP_SIZE`] square; any size works, the scale just adapts.
pub fn draw_minimap(fb: &mut Framebuffer, session: &Session) {
    let scale = fb.width.min(fb.height) as f32 / MAP_SIZE as f32;
    fb.clear(Color::BLACK);

    for ty in 0..MAP_SIZE {
        for tx in 0..MAP_SIZE {
            let code = session.map.tile(tx as i32, ty as i32);
            let tint = match code {
                0 => FLOOR_TINT,
                DOOR_TILE => {
                    // Opened doors read as floor
                    let open = session
                        .map
                        .door_at(tx, ty)
                        .map(|d| !d.blocks_movement())
                        .unwrap_or(false);
                    if open {
                        FLOOR_TINT
                    } else {
                        DOOR_TINT
                    }
                }
                code => wall_tint(code),
            };
            fb.fill_rect(
                (tx as f32 * scale) as i32,
                (ty as f32 * scale) as i32,
                scale.ceil() as i32,
                scale.ceil() as i32,
                tint,
            );
        }
    }

    for enemy in &session.enemies {
        if enemy.is_dead() {
            continue;
        }
        let ex = (enemy.x * scale) as i32;
        let ey = (enemy.y * scale) as i32;
        fb.fill_rect(ex - 1, ey - 1, 2, 2, ENEMY_TINT);
    }

    // Player marker with a one-pixel heading tick
    let px = (session.player.x * scale) as i32;
    let py = (session.player.y * scale) as i32;
    fb.fill_rect(px - 1, py - 1, 3, 3, PLAYER_TINT);
    let (hy, hx) = session.player.heading.sin_cos();
    fb.set_pixel(
        px + (hx * 3.0) as i32,
        py + (hy * 3.0) as i32,
        Color::new(240, 255, 240),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Session;

    #[test]
    fn test_minimap_tints_walls_and_floor() {
        let session = Session::new();
        let mut fb = Framebuffer::new(MINIMAP_SIZE, MINIMAP_SIZE);
        draw_minimap(&mut fb, &session);

        let scale = MINIMAP_SIZE / MAP_SIZE;
        // Border tile (0, 0) is a wall; (4, 2) is open floor away from
        // the player marker
        let wall_px = fb.pixel(scale / 2, scale / 2);
        let floor_px = fb.pixel(4 * scale + 1, 2 * scale + 1);
        assert_ne!(wall_px, floor_px);
        assert_eq!(&floor_px[..3], &FLOOR_TINT.to_bgra()[..3]);
    }

    #[test]
    fn test_minimap_marks_player() {
        let session = Session::new();
        let mut fb = Framebuffer::new(MINIMAP_SIZE, MINIMAP_SIZE);
        draw_minimap(&mut fb, &session);

        let scale = MINIMAP_SIZE as f32 / MAP_SIZE as f32;
        let px = (session.player.x * scale) as usize;
        let py = (session.player.y * scale) as usize;
        assert_eq!(&fb.pixel(px, py)[..3], &PLAYER_TINT.to_bgra()[..3]);
    }

    #[test]
    fn test_minimap_hides_dead_enemies() {
        let mut session = Session::new();
        for enemy in &mut session.enemies {
            enemy.health = 0;
        }
        let mut fb = Framebuffer::new(MINIMAP_SIZE, MINIMAP_SIZE);
        draw_minimap(&mut fb, &session);

        let enemy_bgra = ENEMY_TINT.to_bgra();
        let found = fb
            .pixels
            .chunks_exact(4)
            .any(|px| px[..3] == enemy_bgra[..3]);
        assert!(!found, "dead enemy still marked");
    }
}
