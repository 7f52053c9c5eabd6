//! Event queues
//!
//! Side effects the engine requests but does not manage flow through
//! queues instead of direct calls: sound triggers are fire-and-forget
//! externals the host drains, HUD messages and kill quotes are drained
//! by the session into transient HUD text.

/// A queue for events of a single type.
/// Events are collected during the tick and drained at specific points.
#[derive(Debug)]
pub struct EventQueue<T> {
    events: Vec<T>,
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Send an event (add to queue)
    pub fn send(&mut self, event: T) {
        self.events.push(event);
    }

    /// Drain all events (returns iterator and clears queue)
    pub fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.events.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Sound triggers. The engine only requests playback; whatever the host
/// does with these is outside the engine's contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sound {
    PistolFire,
    ShotgunFire,
    ChaingunFire,
    RocketLaunch,
    PipeBombThrow,
    Explosion,
    DryFire,
    DoorOpen,
    DoorLocked,
    PickupTaken,
    PlayerHurt,
    PlayerDie,
    EnemyHurt,
    EnemyDie,
    Jump,
    MedkitUse,
    JetpackToggle,
    SteroidsUse,
}

/// Container for all simulation event queues.
pub struct Events {
    /// Fire-and-forget sound requests for the host
    pub sounds: EventQueue<Sound>,
    /// Transient HUD messages ("Locked - need the red card", ...)
    pub messages: EventQueue<String>,
    /// One-liner quotes triggered by kills
    pub quotes: EventQueue<&'static str>,
}

impl Events {
    pub fn new() -> Self {
        Self {
            sounds: EventQueue::new(),
            messages: EventQueue::new(),
            quotes: EventQueue::new(),
        }
    }

    /// Clear every queue. Called when a level (re)loads so stale events
    /// never leak across runs.
    pub fn clear_all(&mut self) {
        self.sounds.clear();
        self.messages.clear();
        self.quotes.clear();
    }
}

impl Default for Events {
    fn default() -> Self {
        Self::new()
    }
}

/// Kill one-liners, cycled deterministically by kill count.
pub const QUOTES: &[&str] = &[
    "Stay down.",
    "Next!",
    "That all you got?",
    "Chewed up and spat out.",
    "Nothing personal.",
    "Down for the count.",
];
