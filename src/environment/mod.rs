// Environment - Seam to the external simulator
//
// The physics, rendering and robot models live outside this crate. A playback
// session only needs to reset the simulator, push one action per tick and
// optionally grab a rendered frame.

use serde::Serialize;
use std::collections::BTreeMap;

/// Result of stepping the simulator once
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StepOutcome {
    pub observation: Vec<f64>,
    pub reward: f64,
    pub terminated: bool,
    pub truncated: bool,
    pub info: BTreeMap<String, f64>,
}

impl StepOutcome {
    /// True when the episode ended and no further steps are meaningful
    pub fn is_done(&self) -> bool {
        self.terminated || self.truncated
    }
}

/// A raw RGB frame as produced by the simulator's renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    /// Row-major RGB8 pixels
    pub pixels: Vec<u8>,
}

impl Frame {
    /// Create a frame, `None` if the pixel buffer does not match the size
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        let expected = width as usize * height as usize * 3;
        (pixels.len() == expected).then_some(Self {
            width,
            height,
            pixels,
        })
    }
}

/// External simulation environment
///
/// Implementations must be movable to the playback thread.
pub trait Environment: Send {
    /// Short name for logs and status
    fn name(&self) -> &str;

    /// False when no simulator is attached; playback still runs but frames
    /// are never produced
    fn is_available(&self) -> bool;

    /// Reset the simulation, returning the initial observation
    fn reset(&mut self) -> Vec<f64>;

    /// Apply one action vector and advance the simulation by one step
    fn step(&mut self, action: &[f64]) -> StepOutcome;

    /// Render the current state, `None` if rendering is unavailable
    fn render(&mut self) -> Option<Frame>;

    /// Release simulator resources
    fn close(&mut self) {}
}

/// Stand-in used when no simulator is attached
#[derive(Debug, Default, Clone)]
pub struct NullEnvironment {
    steps: u64,
}

impl NullEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of steps accepted so far
    pub fn steps(&self) -> u64 {
        self.steps
    }
}

impl Environment for NullEnvironment {
    fn name(&self) -> &str {
        "null"
    }

    fn is_available(&self) -> bool {
        false
    }

    fn reset(&mut self) -> Vec<f64> {
        self.steps = 0;
        Vec::new()
    }

    fn step(&mut self, _action: &[f64]) -> StepOutcome {
        self.steps += 1;
        StepOutcome::default()
    }

    fn render(&mut self) -> Option<Frame> {
        None
    }
}
