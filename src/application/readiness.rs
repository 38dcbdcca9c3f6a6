//! Readiness coordination: gates submission until the predictor is usable.
//!
//! Two policies exist, one per deployment target: the on-device policy
//! (model loaded) and the remote policy (service healthy). Both are
//! expressed through one contract, `ReadinessGate`, so form-layer callers
//! depend on a single "may I submit" question plus a transition
//! subscription, independent of any rendering loop.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};

use crate::application::runner::{ModelPhase, ModelRunner};
use crate::ports::{InferenceEngine, RemoteApi};

/// Unified gate state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// Initial state at process start; no verdict yet
    Checking,
    /// Submission permitted
    Open,
    /// Submission blocked (load failed / service offline)
    Closed,
}

/// The single "is the predictor usable" contract.
pub trait ReadinessGate: Send + Sync {
    /// Current state.
    fn state(&self) -> GateState;

    /// Subscribe to state transitions.
    fn subscribe(&self) -> Receiver<GateState>;

    /// Whether submission is currently permitted.
    fn can_submit(&self) -> bool {
        self.state() == GateState::Open
    }
}

fn notify(watchers: &Mutex<Vec<Sender<GateState>>>, state: GateState) {
    watchers
        .lock()
        .expect("Lock failed")
        .retain(|tx| tx.send(state).is_ok());
}

/// On-device readiness: open once the model runner reaches `Ready`.
pub struct DeviceGate<E: InferenceEngine> {
    runner: Arc<ModelRunner<E>>,
    watchers: Mutex<Vec<Sender<GateState>>>,
}

impl<E: InferenceEngine> DeviceGate<E> {
    #[must_use]
    pub fn new(runner: Arc<ModelRunner<E>>) -> Self {
        Self {
            runner,
            watchers: Mutex::new(Vec::new()),
        }
    }

    /// Drive the model load and report the resulting state.
    ///
    /// Safe to call repeatedly: the runner coalesces loads, and a failed
    /// load keeps the gate closed for this process.
    pub fn check(&self) -> GateState {
        let outcome = self.runner.load();
        let state = match outcome {
            Ok(()) => GateState::Open,
            Err(_) => GateState::Closed,
        };
        notify(&self.watchers, state);
        state
    }
}

impl<E: InferenceEngine> ReadinessGate for DeviceGate<E> {
    fn state(&self) -> GateState {
        match self.runner.phase() {
            ModelPhase::Unloaded | ModelPhase::Loading => GateState::Checking,
            ModelPhase::Ready => GateState::Open,
            ModelPhase::Failed => GateState::Closed,
        }
    }

    fn subscribe(&self) -> Receiver<GateState> {
        let (tx, rx) = mpsc::channel();
        self.watchers.lock().expect("Lock failed").push(tx);
        rx
    }
}

/// Remote service phase for the web policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemotePhase {
    Checking,
    Online,
    Offline,
}

/// Remote readiness: open while the prediction service answers its health
/// probe. Probing happens on demand; this gate never polls on its own.
pub struct RemoteGate<R: RemoteApi> {
    api: R,
    phase: Mutex<RemotePhase>,
    watchers: Mutex<Vec<Sender<GateState>>>,
}

impl<R: RemoteApi> RemoteGate<R> {
    #[must_use]
    pub fn new(api: R) -> Self {
        Self {
            api,
            phase: Mutex::new(RemotePhase::Checking),
            watchers: Mutex::new(Vec::new()),
        }
    }

    /// Current remote phase.
    #[must_use]
    pub fn remote_phase(&self) -> RemotePhase {
        *self.phase.lock().expect("Lock failed")
    }

    /// Probe the service health endpoint and update the gate.
    pub fn probe(&self) -> GateState {
        let next = match self.api.health() {
            Ok(()) => RemotePhase::Online,
            Err(e) => {
                tracing::warn!("Health probe failed: {e}");
                RemotePhase::Offline
            }
        };

        *self.phase.lock().expect("Lock failed") = next;

        let state = match next {
            RemotePhase::Online => GateState::Open,
            RemotePhase::Offline => GateState::Closed,
            RemotePhase::Checking => GateState::Checking,
        };
        notify(&self.watchers, state);
        state
    }
}

impl<R: RemoteApi> ReadinessGate for RemoteGate<R> {
    fn state(&self) -> GateState {
        match self.remote_phase() {
            RemotePhase::Checking => GateState::Checking,
            RemotePhase::Online => GateState::Open,
            RemotePhase::Offline => GateState::Closed,
        }
    }

    fn subscribe(&self) -> Receiver<GateState> {
        let (tx, rx) = mpsc::channel();
        self.watchers.lock().expect("Lock failed").push(tx);
        rx
    }
}
