// Shared helpers for integration tests

#![allow(dead_code)]

use easyjam::environment::{Environment, Frame, StepOutcome};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

/// Everything a recording environment has seen
#[derive(Debug, Default)]
pub struct EnvLog {
    pub resets: usize,
    pub actions: Vec<Vec<f64>>,
    pub closed: bool,
}

/// Simulator stand-in that records actions and renders tiny frames
pub struct RecordingEnvironment {
    log: Arc<Mutex<EnvLog>>,
    /// Report a terminated episode every N steps
    terminate_every: Option<usize>,
}

impl RecordingEnvironment {
    pub fn new() -> (Self, Arc<Mutex<EnvLog>>) {
        let log = Arc::new(Mutex::new(EnvLog::default()));
        (
            Self {
                log: log.clone(),
                terminate_every: None,
            },
            log,
        )
    }

    pub fn terminating_every(steps: usize) -> (Self, Arc<Mutex<EnvLog>>) {
        let (mut env, log) = Self::new();
        env.terminate_every = Some(steps);
        (env, log)
    }
}

impl Environment for RecordingEnvironment {
    fn name(&self) -> &str {
        "recording"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn reset(&mut self) -> Vec<f64> {
        self.log.lock().unwrap().resets += 1;
        vec![0.0; 4]
    }

    fn step(&mut self, action: &[f64]) -> StepOutcome {
        let mut log = self.log.lock().unwrap();
        log.actions.push(action.to_vec());
        let steps = log.actions.len();

        StepOutcome {
            observation: action.to_vec(),
            reward: 0.0,
            terminated: self.terminate_every.is_some_and(|n| steps % n == 0),
            ..Default::default()
        }
    }

    fn render(&mut self) -> Option<Frame> {
        let steps = self.log.lock().unwrap().actions.len();
        Frame::new(2, 1, vec![steps as u8; 6])
    }

    fn close(&mut self) {
        self.log.lock().unwrap().closed = true;
    }
}

/// Poll `condition` until it holds or `timeout` elapses
pub fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    condition()
}
