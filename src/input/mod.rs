//! Input sampling
//!
//! Host input is captured asynchronously by the window system but the
//! simulation only ever sees two plain structures consumed at the start
//! of a tick: continuous movement-intent flags and edge-triggered
//! actions. The sampler polls the devices every display frame and
//! accumulates edges and mouse travel until a tick drains them, so a
//! frame that runs no simulation tick (fast displays, timer jitter)
//! drops nothing: rapid key events between ticks coalesce into a single
//! edge, which keeps the simulation step pure and deterministic for
//! testing.

use macroquad::prelude::*;

/// Edge-triggered actions, applied at most once per qualifying tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct Actions {
    pub interact: bool,
    pub fire_pressed: bool,
    pub detonate: bool,
    pub use_medkit: bool,
    pub toggle_jetpack: bool,
    pub use_steroids: bool,
    /// Weapon slot selected this tick (0-based), if any
    pub select_weapon: Option<usize>,
    pub toggle_minimap: bool,
    pub pause: bool,
    /// Restart / advance confirmation on the overlay states
    pub confirm: bool,
}

impl Actions {
    /// Fold another sample's edges in. Booleans OR together; the weapon
    /// selection keeps the most recent press.
    pub fn merge(&mut self, other: &Actions) {
        self.interact |= other.interact;
        self.fire_pressed |= other.fire_pressed;
        self.detonate |= other.detonate;
        self.use_medkit |= other.use_medkit;
        self.toggle_jetpack |= other.toggle_jetpack;
        self.use_steroids |= other.use_steroids;
        if other.select_weapon.is_some() {
            self.select_weapon = other.select_weapon;
        }
        self.toggle_minimap |= other.toggle_minimap;
        self.pause |= other.pause;
        self.confirm |= other.confirm;
    }
}

/// Everything the simulation consumes for one tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputFrame {
    // Continuous movement intent
    pub forward: bool,
    pub back: bool,
    pub strafe_left: bool,
    pub strafe_right: bool,
    pub sprint: bool,
    pub crouch: bool,
    pub jump: bool,
    /// Held trigger, gated by per-weapon cooldowns
    pub fire_held: bool,

    /// Look delta: heading in radians, pitch in screen pixels
    pub look_dx: f32,
    pub look_dy: f32,

    pub actions: Actions,
}

/// Polls keyboard and mouse, holding edge actions and mouse travel in a
/// pending accumulator until a simulation tick consumes them.
pub struct InputSampler {
    last_mouse: (f32, f32),
    mouse_look: bool,
    pending_actions: Actions,
    pending_look_dx: f32,
    pending_look_dy: f32,
}

/// Keyboard turn speed, radians per tick while an arrow key is held.
const KEY_TURN: f32 = 0.055;
/// Keyboard pitch speed, screen pixels per tick.
const KEY_PITCH: f32 = 4.0;
/// Mouse sensitivity: pixels of travel to radians.
const MOUSE_SENS: f32 = 0.0035;

impl InputSampler {
    pub fn new() -> Self {
        Self {
            last_mouse: mouse_position(),
            mouse_look: false,
            pending_actions: Actions::default(),
            pending_look_dx: 0.0,
            pending_look_dy: 0.0,
        }
    }

    /// Enable or disable mouse-look (the host toggles this with pointer
    /// grab so menu interaction doesn't spin the camera).
    pub fn set_mouse_look(&mut self, enabled: bool) {
        if enabled && !self.mouse_look {
            self.last_mouse = mouse_position();
        }
        self.mouse_look = enabled;
    }

    /// Poll the devices. Call exactly once per display frame; edges and
    /// mouse travel accumulate across frames until a tick drains them.
    pub fn poll(&mut self) {
        let (mx, my) = mouse_position();
        let (dx, dy) = (mx - self.last_mouse.0, my - self.last_mouse.1);
        self.last_mouse = (mx, my);
        if self.mouse_look {
            self.pending_look_dx += dx * MOUSE_SENS;
            self.pending_look_dy += dy;
        }

        self.pending_actions.merge(&Actions {
            interact: is_key_pressed(KeyCode::E),
            fire_pressed: is_mouse_button_pressed(MouseButton::Left)
                || is_key_pressed(KeyCode::F),
            detonate: is_key_pressed(KeyCode::G),
            use_medkit: is_key_pressed(KeyCode::H),
            toggle_jetpack: is_key_pressed(KeyCode::J),
            use_steroids: is_key_pressed(KeyCode::K),
            select_weapon: select_weapon_key(),
            toggle_minimap: is_key_pressed(KeyCode::Tab),
            pause: is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::P),
            confirm: is_key_pressed(KeyCode::Enter),
        });
    }

    /// Consume the pending input for one simulation tick. Held flags
    /// and keyboard look reflect the devices right now (per tick);
    /// accumulated edges and mouse travel fire once and reset.
    pub fn take_frame(&mut self) -> InputFrame {
        let (mut look_dx, mut look_dy, actions) = self.drain_pending();
        if is_key_down(KeyCode::Left) {
            look_dx -= KEY_TURN;
        }
        if is_key_down(KeyCode::Right) {
            look_dx += KEY_TURN;
        }
        if is_key_down(KeyCode::Up) {
            look_dy -= KEY_PITCH;
        }
        if is_key_down(KeyCode::Down) {
            look_dy += KEY_PITCH;
        }

        InputFrame {
            forward: is_key_down(KeyCode::W),
            back: is_key_down(KeyCode::S),
            strafe_left: is_key_down(KeyCode::A),
            strafe_right: is_key_down(KeyCode::D),
            sprint: is_key_down(KeyCode::LeftShift),
            crouch: is_key_down(KeyCode::LeftControl),
            jump: is_key_down(KeyCode::Space),
            fire_held: is_mouse_button_down(MouseButton::Left) || is_key_down(KeyCode::F),
            look_dx,
            look_dy,
            actions,
        }
    }

    /// Detach the accumulated edge/look state, leaving the accumulator
    /// empty for the frames after this tick.
    fn drain_pending(&mut self) -> (f32, f32, Actions) {
        (
            std::mem::take(&mut self.pending_look_dx),
            std::mem::take(&mut self.pending_look_dy),
            std::mem::take(&mut self.pending_actions),
        )
    }
}

fn select_weapon_key() -> Option<usize> {
    const SLOTS: [KeyCode; 5] = [
        KeyCode::Key1,
        KeyCode::Key2,
        KeyCode::Key3,
        KeyCode::Key4,
        KeyCode::Key5,
    ];
    SLOTS.iter().position(|&k| is_key_pressed(k))
}

impl Default for InputSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl InputFrame {
    /// Normalized movement intent in the player's local frame:
    /// +x forward, +y strafe right. Diagonal motion is not faster.
    pub fn move_intent(&self) -> (f32, f32) {
        let mut fx: f32 = 0.0;
        let mut sy: f32 = 0.0;
        if self.forward {
            fx += 1.0;
        }
        if self.back {
            fx -= 1.0;
        }
        if self.strafe_right {
            sy += 1.0;
        }
        if self.strafe_left {
            sy -= 1.0;
        }
        let len = (fx * fx + sy * sy).sqrt();
        if len > 1.0 {
            (fx / len, sy / len)
        } else {
            (fx, sy)
        }
    }
}
