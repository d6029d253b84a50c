// Playback driver - Background loop turning strum events into environment steps
// One driver per session. It owns the rig and the environment while running
// and hands them back through the join handle.

use crate::environment::Environment;
use crate::playback::cancel::CancellationToken;
use crate::playback::rig::StrumRig;
use crate::playback::state::SharedPlaybackState;
use crate::sequencer::pattern::{StrumDirection, StrumStep};
use crate::sequencer::progression::ChordProgression;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Name of the playback thread
pub const PLAYBACK_THREAD_NAME: &str = "easyjam-playback";

/// The rig and environment a driver plays on
pub struct Stage {
    pub rig: Box<dyn StrumRig>,
    pub env: Box<dyn Environment>,
}

/// Why the loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Cancelled,
    /// The requested number of pattern passes was played
    Finished,
}

/// Stage handed back by a driver thread
pub struct Performance {
    pub stage: Stage,
    pub reason: StopReason,
    pub steps_played: u64,
}

pub struct PlaybackDriver {
    stage: Stage,
    progression: ChordProgression,
    shared: Arc<SharedPlaybackState>,
    cancel: CancellationToken,
    tick_interval: Duration,
    /// Stop after this many pattern steps, `None` plays until cancelled
    step_limit: Option<u64>,
}

impl PlaybackDriver {
    pub fn new(
        stage: Stage,
        progression: ChordProgression,
        shared: Arc<SharedPlaybackState>,
        cancel: CancellationToken,
        tick_interval: Duration,
    ) -> Self {
        Self {
            stage,
            progression,
            shared,
            cancel,
            tick_interval,
            step_limit: None,
        }
    }

    /// Stop on its own after `passes` full passes of the pattern
    pub fn with_passes(mut self, passes: Option<u32>) -> Self {
        self.step_limit =
            passes.map(|p| u64::from(p) * self.progression.pattern().len() as u64);
        self
    }

    /// Run the loop on a dedicated thread
    pub fn spawn(self) -> std::io::Result<JoinHandle<Performance>> {
        thread::Builder::new()
            .name(PLAYBACK_THREAD_NAME.to_string())
            .spawn(move || self.run())
    }

    /// Run the loop on the current thread until cancelled or finished
    pub fn run(mut self) -> Performance {
        self.shared.set_playing(true);
        self.stage.rig.prepare(self.stage.env.as_mut());
        self.shared.set_arm(self.stage.rig.snapshot());

        log::info!(
            "Playback started: {} chords, pattern '{}' at {}",
            self.progression.chords().len(),
            self.progression.pattern().name,
            self.progression.pattern().tempo
        );

        let mut steps_played = 0u64;
        let reason = loop {
            if self.cancel.is_cancelled() {
                break StopReason::Cancelled;
            }
            if self.step_limit.is_some_and(|limit| steps_played >= limit) {
                break StopReason::Finished;
            }

            self.sync_tempo();
            let step = self.progression.next_strum();
            let completed = match step.direction() {
                Some(direction) => self.play_strum(step, direction),
                None => self.hold(step),
            };
            if !completed {
                break StopReason::Cancelled;
            }

            steps_played += 1;
            self.shared.record_step();

            if self.progression.is_at_pattern_start() {
                self.progression.advance_chord();
                log::debug!("Next chord: {}", self.progression.current_chord());
            }
            self.shared.set_cursors(
                self.progression.chord_index(),
                self.progression.pattern_index(),
            );
        };

        self.shared.set_playing(false);
        log::info!(
            "Playback stopped ({:?}) after {} steps",
            reason,
            steps_played
        );

        Performance {
            stage: self.stage,
            reason,
            steps_played,
        }
    }

    /// Pick up tempo changes made while playing
    fn sync_tempo(&mut self) {
        let tempo = self.shared.tempo();
        if tempo != self.progression.pattern().tempo {
            self.progression.set_tempo(tempo);
        }
    }

    /// Follow one strum trajectory, one waypoint per tick
    ///
    /// Returns false if cancelled part way.
    fn play_strum(&mut self, step: StrumStep, direction: StrumDirection) -> bool {
        log::debug!(
            "Strum {} on {}",
            step,
            self.progression.current_chord()
        );

        let trajectory = self.stage.rig.plan(direction);
        let mut deadline = Instant::now();

        for waypoint in trajectory.waypoints() {
            if self.cancel.is_cancelled() {
                return false;
            }

            let action = self.stage.rig.track(waypoint);
            let outcome = self.stage.env.step(&action);
            if let Some(frame) = self.stage.env.render() {
                self.shared.store_frame(frame);
            }
            self.shared.set_arm(self.stage.rig.snapshot());

            // Deadline pacing; do not burst to catch up after a slow step
            deadline += self.tick_interval;
            let now = Instant::now();
            if deadline < now {
                deadline = now;
            }
            if !self.cancel.sleep_until(deadline) {
                return false;
            }

            if outcome.is_done() {
                log::info!("Environment episode ended, resetting and cutting strum short");
                self.stage.rig.prepare(self.stage.env.as_mut());
                self.shared.set_arm(self.stage.rig.snapshot());
                return !self.cancel.is_cancelled();
            }
        }

        true
    }

    /// Hold position for one beat at the live tempo
    fn hold(&mut self, step: StrumStep) -> bool {
        if step == StrumStep::Mute {
            log::debug!("Mute: holding one beat");
        } else {
            log::debug!("Rest: holding one beat");
        }
        self.cancel.sleep(self.shared.tempo().beat_duration())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::environment::NullEnvironment;
    use crate::playback::rig::rig_for;
    use crate::sequencer::timeline::Tempo;

    fn stage() -> Stage {
        Stage {
            rig: rig_for(&AppConfig::default()),
            env: Box::new(NullEnvironment::new()),
        }
    }

    fn progression(pattern: &str) -> ChordProgression {
        ChordProgression::from_names(&["G", "C"], pattern).into_value()
    }

    #[test]
    fn test_driver_finishes_after_passes() {
        let shared = SharedPlaybackState::new();
        shared.begin_session(Tempo::new(240));

        let driver = PlaybackDriver::new(
            stage(),
            progression("basic_down"),
            shared.clone(),
            CancellationToken::new(),
            Duration::from_millis(1),
        )
        .with_passes(Some(1));

        let performance = driver.run();
        assert_eq!(performance.reason, StopReason::Finished);
        assert_eq!(performance.steps_played, 4);
        assert_eq!(shared.steps_played(), 4);
        assert!(!shared.is_playing());

        // One full pass: chord advanced once, pattern cursor back at 0
        assert_eq!(shared.chord_index(), 1);
        assert_eq!(shared.pattern_index(), 0);
        assert!(shared.arm().end_effector.is_some());
    }

    #[test]
    fn test_driver_cancelled_before_start() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let driver = PlaybackDriver::new(
            stage(),
            progression("basic_down"),
            SharedPlaybackState::new(),
            cancel,
            Duration::from_millis(1),
        );
        let performance = driver.run();
        assert_eq!(performance.reason, StopReason::Cancelled);
        assert_eq!(performance.steps_played, 0);
    }

    #[test]
    fn test_spawned_driver_stops_on_cancel() {
        let shared = SharedPlaybackState::new();
        let cancel = CancellationToken::new();

        let handle = PlaybackDriver::new(
            stage(),
            progression("slow_ballad"),
            shared.clone(),
            cancel.clone(),
            Duration::from_millis(20),
        )
        .spawn()
        .unwrap();

        thread::sleep(Duration::from_millis(50));
        let start = Instant::now();
        cancel.cancel();
        let performance = handle.join().unwrap();

        assert_eq!(performance.reason, StopReason::Cancelled);
        assert!(start.elapsed() < Duration::from_secs(1));
        assert!(!shared.is_playing());
    }
}
