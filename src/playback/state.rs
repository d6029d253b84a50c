// Shared playback state
// Written only by the active playback thread (plus tempo by the session
// manager), read by status queries. Atomics for scalars, mutexes for the arm
// snapshot and the latest rendered frame.

use crate::environment::Frame;
use crate::kinematics::arm::ArmSnapshot;
use crate::sequencer::timeline::Tempo;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug)]
pub struct SharedPlaybackState {
    playing: AtomicBool,
    tempo_bpm: AtomicU32,
    chord_index: AtomicUsize,
    pattern_index: AtomicUsize,
    steps_played: AtomicU64,
    arm: Mutex<ArmSnapshot>,
    latest_frame: Mutex<Option<Frame>>,
}

impl SharedPlaybackState {
    /// Create new shared state
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::Acquire)
    }

    pub fn set_playing(&self, playing: bool) {
        self.playing.store(playing, Ordering::Release);
    }

    /// Current tempo
    pub fn tempo(&self) -> Tempo {
        Tempo::try_new(self.tempo_bpm.load(Ordering::Relaxed)).unwrap_or_default()
    }

    pub fn set_tempo(&self, tempo: Tempo) {
        self.tempo_bpm.store(tempo.bpm(), Ordering::Relaxed);
    }

    pub fn chord_index(&self) -> usize {
        self.chord_index.load(Ordering::Relaxed)
    }

    pub fn pattern_index(&self) -> usize {
        self.pattern_index.load(Ordering::Relaxed)
    }

    /// Publish both sequencer cursors
    pub fn set_cursors(&self, chord_index: usize, pattern_index: usize) {
        self.chord_index.store(chord_index, Ordering::Relaxed);
        self.pattern_index.store(pattern_index, Ordering::Relaxed);
    }

    /// Pattern steps completed in the current session
    pub fn steps_played(&self) -> u64 {
        self.steps_played.load(Ordering::Relaxed)
    }

    pub fn record_step(&self) {
        self.steps_played.fetch_add(1, Ordering::Relaxed);
    }

    /// Clear per-session counters before a new session starts
    pub fn begin_session(&self, tempo: Tempo) {
        self.set_tempo(tempo);
        self.set_cursors(0, 0);
        self.steps_played.store(0, Ordering::Relaxed);
    }

    pub fn arm(&self) -> ArmSnapshot {
        self.arm.lock().map(|a| a.clone()).unwrap_or_default()
    }

    pub fn set_arm(&self, snapshot: ArmSnapshot) {
        if let Ok(mut arm) = self.arm.lock() {
            *arm = snapshot;
        }
    }

    pub fn latest_frame(&self) -> Option<Frame> {
        self.latest_frame.lock().ok().and_then(|f| f.clone())
    }

    pub fn store_frame(&self, frame: Frame) {
        if let Ok(mut latest) = self.latest_frame.lock() {
            *latest = Some(frame);
        }
    }
}

impl Default for SharedPlaybackState {
    fn default() -> Self {
        Self {
            playing: AtomicBool::new(false),
            tempo_bpm: AtomicU32::new(Tempo::default().bpm()),
            chord_index: AtomicUsize::new(0),
            pattern_index: AtomicUsize::new(0),
            steps_played: AtomicU64::new(0),
            arm: Mutex::new(ArmSnapshot::default()),
            latest_frame: Mutex::new(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinematics::arm::Point2;

    #[test]
    fn test_shared_state_defaults() {
        let state = SharedPlaybackState::new();
        assert!(!state.is_playing());
        assert_eq!(state.tempo().bpm(), 120);
        assert_eq!(state.steps_played(), 0);
        assert!(state.latest_frame().is_none());
    }

    #[test]
    fn test_begin_session_resets_counters() {
        let state = SharedPlaybackState::new();
        state.set_cursors(2, 3);
        state.record_step();

        state.begin_session(Tempo::new(90));
        assert_eq!(state.chord_index(), 0);
        assert_eq!(state.pattern_index(), 0);
        assert_eq!(state.steps_played(), 0);
        assert_eq!(state.tempo().bpm(), 90);
    }

    #[test]
    fn test_arm_and_frame() {
        let state = SharedPlaybackState::new();
        state.set_arm(ArmSnapshot {
            joint_angles: vec![0.1, 0.2],
            end_effector: Some(Point2::new(0.2, 0.1)),
        });
        assert_eq!(state.arm().joint_angles, vec![0.1, 0.2]);

        state.store_frame(Frame::new(1, 1, vec![1, 2, 3]).unwrap());
        assert_eq!(state.latest_frame().unwrap().pixels, vec![1, 2, 3]);
    }
}
