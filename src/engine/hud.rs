//! HUD data snapshot
//!
//! Everything the host needs to draw around the 3D view, captured once
//! per frame. The engine never draws HUD chrome itself; it hands the
//! values over and the host styles them.

use serde::Serialize;

/// Per-frame HUD values for the host to display.
#[derive(Debug, Clone, Serialize)]
pub struct HudSnapshot {
    pub level_name: &'static str,
    pub health: i32,
    pub armor: i32,
    pub weapon_name: &'static str,
    /// Ammo for the equipped weapon
    pub ammo: i32,
    pub score: i32,
    pub kills: i32,
    pub total_enemies: i32,
    /// Key cards held (blue, red, yellow)
    pub keys: [bool; 3],
    pub medkits: i32,
    pub steroid_charges: i32,
    /// Seconds of steroid buff remaining
    pub steroid_timer: f32,
    pub has_jetpack: bool,
    pub jetpack_on: bool,
    pub jetpack_fuel: f32,
    /// Armed pipe bombs waiting on the detonator
    pub armed_pipe_bombs: i32,
    /// Transient message text, if any ("Locked - need the blue card")
    pub message: Option<String>,
    /// Transient kill-quote text, if any
    pub quote: Option<String>,
}
