use std::sync::{Arc, Mutex as StdMutex};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sgp4::Elements;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use utoipa::ToSchema;

use super::error::TrackerError;
use super::parsing::parse_tle_lines;
use crate::horizon::{
    current_pass_window, find_next_pass, LookAngleOracle, LookAngleSample, NextPassCache, Pass,
    NEXT_PASS_SEARCH_LIMIT_SECONDS,
};
use crate::predict::sun::{sun_position, SunPosition};
use crate::predict::{Observer, SatelliteOracle};

const SAMPLE_INTERVAL: std::time::Duration = std::time::Duration::from_secs(1);

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RunCommand {
    /// Two- or three-line element set, newline separated.
    pub tle: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub enum TrackerMode {
    Idle,
    Running {
        start: DateTime<Utc>,
        satellite: Option<String>,
    },
}

/// Snapshot of the live tracking state, refreshed once per second while a
/// satellite is being followed.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TrackerStatus {
    pub mode: TrackerMode,
    pub last_sample: Option<LookAngleSample>,
    /// Window of the pass in progress; absent while the object is down.
    pub current_pass: Option<Pass>,
    /// Upcoming pass readout; absent while the object is visible.
    pub next_pass: Option<Pass>,
    pub sun: Option<SunPosition>,
}

impl TrackerStatus {
    fn idle() -> Self {
        Self {
            mode: TrackerMode::Idle,
            last_sample: None,
            current_pass: None,
            next_pass: None,
            sun: None,
        }
    }
}

#[derive(Debug)]
struct Shared {
    status: TrackerStatus,
}

struct WorkerHandle {
    stop_tx: oneshot::Sender<()>,
    join: JoinHandle<()>,
}

pub struct Tracker {
    observer: Observer,
    shared: Arc<StdMutex<Shared>>,
    worker: Option<WorkerHandle>,
}

impl Tracker {
    pub fn new(observer: Observer) -> Self {
        Self {
            observer,
            shared: Arc::new(StdMutex::new(Shared {
                status: TrackerStatus::idle(),
            })),
            worker: None,
        }
    }

    pub fn status(&self) -> TrackerStatus {
        self.shared.lock().unwrap().status.clone()
    }

    pub async fn stop(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = worker.stop_tx.send(());
            let _ = worker.join.await;
        }
        self.shared.lock().unwrap().status = TrackerStatus::idle();
    }

    pub fn run(&mut self, command: &RunCommand) -> Result<(), TrackerError> {
        if self.worker.is_some() {
            return Err(TrackerError::AlreadyRunning);
        }

        let (name, line1, line2) = parse_tle_lines(&command.tle)?;
        let elements = Elements::from_tle(name.clone(), line1.as_bytes(), line2.as_bytes())?;
        let satellite = elements.object_name.clone().or(name);
        let oracle = SatelliteOracle::new(self.observer, elements)?;

        {
            let mut locked = self.shared.lock().unwrap();
            locked.status = TrackerStatus::idle();
            locked.status.mode = TrackerMode::Running {
                start: Utc::now(),
                satellite,
            };
        }

        let shared = self.shared.clone();
        let (stop_tx, stop_rx) = oneshot::channel();
        let join = tokio::spawn(run_tracker_loop(shared, oracle, stop_rx));
        self.worker = Some(WorkerHandle { stop_tx, join });

        Ok(())
    }
}

async fn run_tracker_loop(
    shared: Arc<StdMutex<Shared>>,
    oracle: SatelliteOracle,
    mut stop_rx: oneshot::Receiver<()>,
) {
    let observer = oracle.observer();
    let mut current_pass: Option<Pass> = None;
    let mut next_cache: Option<NextPassCache> = None;

    loop {
        let now = Utc::now();
        let sample = oracle.evaluate(now);
        let sun = sample.and_then(|s| sun_position(&observer, s.time));

        match &sample {
            Some(s) if s.is_above_horizon() => {
                let stale = match &current_pass {
                    None => true,
                    Some(pass) => {
                        pass.track.is_empty() || pass.los.is_some_and(|los| s.time > los.time)
                    }
                };
                if stale {
                    current_pass = Some(current_pass_window(&oracle, s));
                }
                // The next-pass readout applies only while the object is down.
                next_cache = None;
            }
            _ => {
                current_pass = None;
                let reference = sample.map_or(now, |s| s.time);
                let cache_usable = next_cache.as_ref().is_some_and(|c| c.is_current(now));
                if !cache_usable {
                    next_cache = find_next_pass(
                        &oracle,
                        reference,
                        Duration::seconds(NEXT_PASS_SEARCH_LIMIT_SECONDS),
                    )
                    .map(NextPassCache::new);
                }
            }
        }

        {
            let mut locked = shared.lock().unwrap();
            locked.status.last_sample = sample;
            locked.status.current_pass = current_pass.clone();
            locked.status.next_pass = next_cache.as_ref().map(|c| c.pass().clone());
            locked.status.sun = sun;
        }

        let stopped = tokio::select! {
            _ = tokio::time::sleep(SAMPLE_INTERVAL) => false,
            _ = &mut stop_rx => true,
        };
        if stopped {
            break;
        }
    }

    shared.lock().unwrap().status = TrackerStatus::idle();
}
