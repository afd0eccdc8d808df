//! Difficulty ramp: fall speed and spawn interval as pure functions of elapsed ticks.

/// Ticks per difficulty step (~10 s at 150 ms/tick).
pub const RAMP_TICKS: u64 = 67;

pub const BASE_SPEED: f64 = 0.3;
pub const SPEED_STEP: f64 = 0.05;
pub const MAX_SPEED: f64 = 1.5;

pub const BASE_SPAWN_INTERVAL: u32 = 20;
pub const SPAWN_INTERVAL_STEP: u32 = 2;
pub const MIN_SPAWN_INTERVAL: u32 = 7;

/// Rows per tick a word falls after `ticks` ticks.
pub fn speed_for_tick(ticks: u64) -> f64 {
    let steps = (ticks / RAMP_TICKS) as f64;
    (BASE_SPEED + SPEED_STEP * steps).min(MAX_SPEED)
}

/// Ticks between spawns after `ticks` ticks.
pub fn spawn_interval(ticks: u64) -> u32 {
    let steps = ticks / RAMP_TICKS;
    let reduction = steps.saturating_mul(u64::from(SPAWN_INTERVAL_STEP));
    u64::from(BASE_SPAWN_INTERVAL)
        .saturating_sub(reduction)
        .max(u64::from(MIN_SPAWN_INTERVAL)) as u32
}
