//! GRIDFIRE: a tile-map raycasting FPS
//!
//! The whole game renders on the CPU into a 320x200 BGRA buffer that is
//! swizzled and uploaded as one texture per frame. The host side here
//! only does windowing, input polling, the fixed-timestep loop, and HUD
//! text; everything with gameplay meaning lives in `engine` and `sim`.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod engine;
mod input;
mod map;
mod render;
mod sim;

use macroquad::prelude::*;

use engine::{GameState, Session};
use input::InputSampler;
use render::{draw_frame, draw_minimap, Framebuffer, HEIGHT, MINIMAP_SIZE, WIDTH};
use sim::TICK_DT;

/// Catch-up cap: past this many ticks per frame the simulation slows
/// down instead of spiraling.
const MAX_TICKS_PER_FRAME: u32 = 4;

fn window_conf() -> Conf {
    Conf {
        window_title: format!("GRIDFIRE v{}", VERSION),
        window_width: (WIDTH * 3) as i32,
        window_height: (HEIGHT * 3) as i32,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

/// Swizzle a BGRA framebuffer into an RGBA image and upload it.
fn upload(fb: &Framebuffer, image: &mut Image, texture: &Texture2D) {
    for (src, dst) in fb
        .pixels
        .chunks_exact(4)
        .zip(image.bytes.chunks_exact_mut(4))
    {
        dst[0] = src[2];
        dst[1] = src[1];
        dst[2] = src[0];
        dst[3] = src[3];
    }
    texture.update(image);
}

#[macroquad::main(window_conf)]
async fn main() {
    // Initialize crash logging FIRST (before any other code)
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    let mut session = Session::new();
    let mut sampler = InputSampler::new();

    let mut view_fb = Framebuffer::new(WIDTH, HEIGHT);
    let mut view_image = Image::gen_image_color(WIDTH as u16, HEIGHT as u16, BLACK);
    let view_texture = Texture2D::from_image(&view_image);
    view_texture.set_filter(FilterMode::Nearest);

    let mut map_fb = Framebuffer::new(MINIMAP_SIZE, MINIMAP_SIZE);
    let mut map_image = Image::gen_image_color(MINIMAP_SIZE as u16, MINIMAP_SIZE as u16, BLACK);
    let map_texture = Texture2D::from_image(&map_image);
    map_texture.set_filter(FilterMode::Nearest);

    let mut accumulator = 0.0f32;
    let mut grabbed = false;

    loop {
        // Pointer grab follows the state machine so menus get the cursor
        let want_grab = session.state == GameState::Playing;
        if want_grab != grabbed {
            set_cursor_grab(want_grab);
            show_mouse(!want_grab);
            sampler.set_mouse_look(want_grab);
            grabbed = want_grab;
        }

        // Fixed-timestep simulation with catch-up. The sampler polls
        // every display frame and accumulates edges and mouse travel;
        // the first consumed tick drains them, catch-up ticks see held
        // state only.
        accumulator += get_frame_time().min(0.25);
        sampler.poll();
        let mut ticks = 0;
        while accumulator >= TICK_DT && ticks < MAX_TICKS_PER_FRAME {
            session.tick(&sampler.take_frame());
            accumulator -= TICK_DT;
            ticks += 1;
        }
        if ticks == MAX_TICKS_PER_FRAME {
            accumulator = 0.0;
        }

        // Sound hook: requests are drained every frame; no sound bank is
        // shipped, so playback is a no-op.
        for _ in session.events.sounds.drain() {}

        draw_frame(&mut view_fb, &session);
        upload(&view_fb, &mut view_image, &view_texture);

        clear_background(BLACK);
        let scale = (screen_width() / WIDTH as f32)
            .min(screen_height() / HEIGHT as f32)
            .floor()
            .max(1.0);
        let dw = WIDTH as f32 * scale;
        let dh = HEIGHT as f32 * scale;
        let ox = (screen_width() - dw) * 0.5;
        let oy = (screen_height() - dh) * 0.5;
        draw_texture_ex(
            &view_texture,
            ox,
            oy,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(dw, dh)),
                ..Default::default()
            },
        );

        if session.show_minimap {
            draw_minimap(&mut map_fb, &session);
            upload(&map_fb, &mut map_image, &map_texture);
            let msize = MINIMAP_SIZE as f32 * (scale * 0.5).max(1.0);
            draw_texture_ex(
                &map_texture,
                ox + dw - msize - 8.0,
                oy + 8.0,
                WHITE,
                DrawTextureParams {
                    dest_size: Some(vec2(msize, msize)),
                    ..Default::default()
                },
            );
        }

        draw_hud(&session, ox, oy, dw, dh);
        next_frame().await;
    }
}

/// HUD text and state overlays, drawn in window space over the view.
fn draw_hud(session: &Session, ox: f32, oy: f32, dw: f32, dh: f32) {
    let hud = session.hud_snapshot();
    let line = 22.0;
    let bottom = oy + dh - 12.0;

    draw_text(
        &format!("HP {:3}  AP {:3}", hud.health, hud.armor),
        ox + 12.0,
        bottom,
        line,
        if hud.health <= 25 { RED } else { GREEN },
    );
    draw_text(
        &format!("{} {:3}", hud.weapon_name, hud.ammo),
        ox + 190.0,
        bottom,
        line,
        LIGHTGRAY,
    );
    draw_text(
        &format!(
            "SCORE {}  KILLS {}/{}",
            hud.score, hud.kills, hud.total_enemies
        ),
        ox + 12.0,
        oy + 24.0,
        line,
        LIGHTGRAY,
    );
    draw_text(&hud.level_name.to_string(), ox + 12.0, oy + 46.0, line, GRAY);

    // Key cards, medkits, jetpack fuel
    let mut status = String::new();
    for (i, name) in ["B", "R", "Y"].iter().enumerate() {
        if hud.keys[i] {
            status.push_str(name);
        }
    }
    if hud.medkits > 0 {
        status.push_str(&format!("  MED x{}", hud.medkits));
    }
    if hud.steroid_charges > 0 || hud.steroid_timer > 0.0 {
        status.push_str(&format!("  STR x{}", hud.steroid_charges));
    }
    if hud.has_jetpack {
        status.push_str(&format!("  FUEL {:.0}", hud.jetpack_fuel));
    }
    if hud.armed_pipe_bombs > 0 {
        status.push_str(&format!("  BOMBS {}", hud.armed_pipe_bombs));
    }
    if !status.is_empty() {
        draw_text(&status, ox + 12.0, bottom - line, line, SKYBLUE);
    }

    if let Some(message) = &hud.message {
        let width = measure_text(message, None, line as u16, 1.0).width;
        draw_text(message, ox + (dw - width) * 0.5, oy + dh * 0.3, line, YELLOW);
    }
    if let Some(quote) = &hud.quote {
        let width = measure_text(quote, None, line as u16, 1.0).width;
        draw_text(quote, ox + (dw - width) * 0.5, oy + dh * 0.38, line, ORANGE);
    }

    let overlay = match session.state {
        GameState::Playing => None,
        GameState::Paused => Some(("PAUSED", "Esc to resume")),
        GameState::LevelComplete => Some(("LEVEL COMPLETE", "Enter for the next level")),
        GameState::GameOver => Some(("YOU DIED", "Enter to restart")),
        GameState::Victory => Some(("VICTORY", "Enter to play again")),
    };
    if let Some((title, hint)) = overlay {
        let tw = measure_text(title, None, 48, 1.0).width;
        draw_text(title, ox + (dw - tw) * 0.5, oy + dh * 0.45, 48.0, WHITE);
        let hw = measure_text(hint, None, line as u16, 1.0).width;
        draw_text(hint, ox + (dw - hw) * 0.5, oy + dh * 0.45 + 30.0, line, GRAY);
    }
}
