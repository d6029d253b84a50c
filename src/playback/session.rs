// Session manager - Single entry point for start/stop/status/tempo
//
// Session replacement is serialized by one mutex: cancel the running driver,
// join it, take back its rig and environment, then spawn the next driver.
// At most one driver thread exists at any time.

use crate::command::types::{
    FrameInfo, PlayRequest, PlayResponse, RobotStateResponse, SimulationResponse, StopResponse,
    TempoResponse,
};
use crate::config::AppConfig;
use crate::diagnostics::{Diagnostic, Resolution};
use crate::environment::{Environment, Frame, NullEnvironment};
use crate::messaging::{Notification, NotificationProducer};
use crate::playback::cancel::CancellationToken;
use crate::playback::driver::{Performance, PlaybackDriver, Stage};
use crate::playback::rig::rig_for;
use crate::playback::state::SharedPlaybackState;
use crate::sequencer::pattern::resolve_pattern;
use crate::sequencer::progression::ChordProgression;
use crate::sequencer::timeline::Tempo;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::JoinHandle;
use uuid::Uuid;

/// Session error types
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Failed to spawn playback thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;

/// A running driver thread
struct ActiveDriver {
    cancel: CancellationToken,
    handle: JoinHandle<Performance>,
}

/// What the most recent session played
#[derive(Debug, Clone)]
struct SessionRecord {
    id: Uuid,
    started_at: DateTime<Utc>,
    chords: Vec<String>,
}

/// Everything guarded by the session mutex
struct SessionSlot {
    /// Idle stage, `None` while a driver owns it
    stage: Option<Stage>,
    driver: Option<ActiveDriver>,
    record: Option<SessionRecord>,
    environment_name: String,
    environment_available: bool,
}

pub struct SessionManager {
    config: AppConfig,
    shared: Arc<SharedPlaybackState>,
    slot: Mutex<SessionSlot>,
    notifications: Mutex<Option<NotificationProducer>>,
}

impl SessionManager {
    /// Create a manager playing on `environment` with the configured rig
    pub fn new(config: AppConfig, environment: Box<dyn Environment>) -> Self {
        let stage = Stage {
            rig: rig_for(&config),
            env: environment,
        };

        let shared = SharedPlaybackState::new();
        shared.set_arm(stage.rig.snapshot());

        let slot = SessionSlot {
            environment_name: stage.env.name().to_string(),
            environment_available: stage.env.is_available(),
            stage: Some(stage),
            driver: None,
            record: None,
        };

        log::info!(
            "Session manager ready: {:?} rig, environment '{}' ({})",
            config.mode,
            slot.environment_name,
            if slot.environment_available {
                "available"
            } else {
                "unavailable"
            }
        );

        Self {
            config,
            shared,
            slot: Mutex::new(slot),
            notifications: Mutex::new(None),
        }
    }

    /// Forward diagnostics to a notification channel as well as the log
    pub fn with_notifications(self, tx: NotificationProducer) -> Self {
        if let Ok(mut slot) = self.notifications.lock() {
            *slot = Some(tx);
        }
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Read-only playback state
    pub fn shared_state(&self) -> Arc<SharedPlaybackState> {
        self.shared.clone()
    }

    /// Start playing, replacing any running session
    pub fn start(&self, request: PlayRequest) -> SessionResult<Resolution<PlayResponse>> {
        let mut slot = self.lock_slot();
        let mut diagnostics = Vec::new();

        self.retire(&mut slot, &mut diagnostics);
        let stage = match slot.stage.take() {
            Some(stage) => stage,
            None => self.replacement_stage(&mut slot),
        };

        if !stage.env.is_available() {
            diagnostics.push(Diagnostic::EnvironmentUnavailable);
        }

        let chord_names = request
            .chords
            .unwrap_or_else(|| self.config.defaults.chords.clone());
        let pattern_key = request
            .pattern
            .unwrap_or_else(|| self.config.defaults.pattern.clone());

        let progression = ChordProgression::from_names(chord_names.as_slice(), &pattern_key);
        diagnostics.extend(progression.diagnostics);
        let progression = progression.value;

        let chords: Vec<String> = progression
            .chords()
            .iter()
            .map(|c| c.name.to_string())
            .collect();
        let tempo = progression.pattern().tempo;
        let pattern = resolve_pattern(&pattern_key).value.key.to_string();

        self.shared.begin_session(tempo);
        self.shared.set_playing(true);

        let cancel = CancellationToken::new();
        let handle = PlaybackDriver::new(
            stage,
            progression,
            self.shared.clone(),
            cancel.clone(),
            self.config.playback.tick_interval(),
        )
        .with_passes(request.passes)
        .spawn();

        let handle = match handle {
            Ok(handle) => handle,
            Err(e) => {
                // The stage went down with the closure
                log::error!("Failed to spawn playback thread: {}", e);
                self.shared.set_playing(false);
                slot.record = None;
                let stage = self.replacement_stage(&mut slot);
                slot.stage = Some(stage);
                return Err(e.into());
            }
        };

        let record = SessionRecord {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            chords: chords.clone(),
        };
        log::info!(
            "Session {} started: [{}] with '{}'",
            record.id,
            chords.join(", "),
            pattern
        );

        let response = PlayResponse {
            session_id: record.id,
            started_at: record.started_at,
            chords,
            pattern,
            tempo: tempo.bpm(),
            passes: request.passes,
        };

        slot.driver = Some(ActiveDriver { cancel, handle });
        slot.record = Some(record);
        drop(slot);

        let resolution = Resolution {
            value: response,
            diagnostics,
        };
        self.report("play", &resolution);
        Ok(resolution)
    }

    /// Stop the running session, if any
    ///
    /// Idempotent: stopping with nothing running reports `was_playing: false`.
    pub fn stop(&self) -> Resolution<StopResponse> {
        let mut slot = self.lock_slot();
        let mut diagnostics = Vec::new();

        let was_playing = self.shared.is_playing();
        let steps_played = self
            .retire(&mut slot, &mut diagnostics)
            .unwrap_or_else(|| self.shared.steps_played());
        drop(slot);

        let resolution = Resolution {
            value: StopResponse {
                was_playing,
                steps_played,
            },
            diagnostics,
        };
        self.report("stop", &resolution);
        resolution
    }

    /// Snapshot of the arm and sequencer state
    pub fn status(&self) -> RobotStateResponse {
        let slot = self.lock_slot();
        let arm = self.shared.arm();
        let chord_index = self.shared.chord_index();

        RobotStateResponse {
            joint_angles: arm.joint_angles,
            end_effector: arm.end_effector,
            current_chord: slot
                .record
                .as_ref()
                .and_then(|r| r.chords.get(chord_index).cloned()),
            is_playing: self.shared.is_playing(),
            simulation_available: slot.environment_available,
            chord_index,
            pattern_index: self.shared.pattern_index(),
            tempo: self.shared.tempo().bpm(),
            session_id: slot.record.as_ref().map(|r| r.id),
        }
    }

    /// Change the tempo of the current session
    ///
    /// Takes effect at the next pattern step. 0 BPM is rejected and the
    /// current tempo kept.
    pub fn set_tempo(&self, bpm: u32) -> Resolution<TempoResponse> {
        let current = self.shared.tempo();

        let resolution = match Tempo::try_new(bpm) {
            Some(tempo) => {
                self.shared.set_tempo(tempo);
                log::info!("Tempo set to {}", tempo);
                Resolution::ok(TempoResponse { tempo: tempo.bpm() })
            }
            None => Resolution::degraded(
                TempoResponse {
                    tempo: current.bpm(),
                },
                Diagnostic::InvalidTempo {
                    requested: bpm,
                    kept: current.bpm(),
                },
            ),
        };

        self.report("tempo", &resolution);
        resolution
    }

    /// Latest frame rendered by the environment
    pub fn latest_frame(&self) -> Option<Frame> {
        self.shared.latest_frame()
    }

    /// Availability of the simulator
    pub fn simulation(&self) -> SimulationResponse {
        let slot = self.lock_slot();
        SimulationResponse {
            available: slot.environment_available,
            environment: slot.environment_name.clone(),
            mode: self.config.mode,
            frame: self.shared.latest_frame().map(|f| FrameInfo {
                width: f.width,
                height: f.height,
            }),
        }
    }

    /// Stop playback and release the environment
    pub fn shutdown(&self) {
        self.stop();
        let mut slot = self.lock_slot();
        if let Some(stage) = slot.stage.as_mut() {
            stage.env.close();
            log::info!("Environment '{}' closed", stage.env.name());
        }
    }

    fn lock_slot(&self) -> MutexGuard<'_, SessionSlot> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Cancel and join the running driver, putting its stage back in the slot
    ///
    /// Returns the number of steps the driver played, `None` if nothing was
    /// running or the driver panicked.
    fn retire(&self, slot: &mut SessionSlot, diagnostics: &mut Vec<Diagnostic>) -> Option<u64> {
        let driver = slot.driver.take()?;
        driver.cancel.cancel();

        match driver.handle.join() {
            Ok(performance) => {
                slot.stage = Some(performance.stage);
                Some(performance.steps_played)
            }
            Err(_) => {
                log::error!("Playback thread panicked");
                self.shared.set_playing(false);
                diagnostics.push(Diagnostic::DriverPanicked);
                let stage = self.replacement_stage(slot);
                slot.stage = Some(stage);
                None
            }
        }
    }

    /// Fresh rig on a null environment, after the previous stage was lost
    fn replacement_stage(&self, slot: &mut SessionSlot) -> Stage {
        let stage = Stage {
            rig: rig_for(&self.config),
            env: Box::new(NullEnvironment::new()),
        };
        slot.environment_name = stage.env.name().to_string();
        slot.environment_available = stage.env.is_available();
        stage
    }

    fn report<T>(&self, context: &str, resolution: &Resolution<T>) {
        resolution.log_diagnostics(context);
        if resolution.diagnostics.is_empty() {
            return;
        }

        if let Ok(mut guard) = self.notifications.lock() {
            if let Some(tx) = guard.as_mut() {
                for diagnostic in &resolution.diagnostics {
                    let _ = ringbuf::traits::Producer::try_push(tx, Notification::from(diagnostic));
                }
            }
        }
    }
}

impl Drop for SessionManager {
    fn drop(&mut self) {
        let slot = self.slot.get_mut().unwrap_or_else(|e| e.into_inner());
        if let Some(driver) = slot.driver.take() {
            driver.cancel.cancel();
            let _ = driver.handle.join();
        }
    }
}
