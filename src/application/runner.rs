//! Model runner: Owns the classifier lifecycle and serializes inference.
//!
//! One runner instance is constructed at application start and shared by
//! reference with every consumer; there is no hidden global. The runner
//! guarantees:
//!
//! - one load per process (single-flight: concurrent `load` calls attach to
//!   the in-flight load instead of starting a second one)
//! - a terminal `Failed` phase once a load has failed
//! - a single in-flight inference at a time (the engine is not assumed
//!   thread-safe for concurrent forward passes)
//! - inference wall time measured around the engine invocation only

use std::sync::mpsc::{Receiver, Sender};
use std::sync::{mpsc, Condvar, Mutex, OnceLock};
use std::time::Instant;

use crate::domain::{HealthFeatures, RawOutput};
use crate::ports::{InferenceEngine, InferenceError, LoadError};

/// Lifecycle phase of the shared model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelPhase {
    Unloaded,
    Loading,
    Ready,
    /// Terminal for this runner; recovery requires a fresh runner.
    Failed,
}

struct LoadState {
    phase: ModelPhase,
    failure: Option<LoadError>,
}

/// Owns the inference engine and its loaded model.
pub struct ModelRunner<E: InferenceEngine> {
    engine: E,
    state: Mutex<LoadState>,
    load_done: Condvar,
    model: OnceLock<E::Model>,
    // Held across the forward pass; a second concurrent predict waits here.
    inference_slot: Mutex<()>,
    watchers: Mutex<Vec<Sender<ModelPhase>>>,
}

impl<E: InferenceEngine> ModelRunner<E> {
    /// Create a runner; the model is not loaded until `load` is called.
    #[must_use]
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            state: Mutex::new(LoadState {
                phase: ModelPhase::Unloaded,
                failure: None,
            }),
            load_done: Condvar::new(),
            model: OnceLock::new(),
            inference_slot: Mutex::new(()),
            watchers: Mutex::new(Vec::new()),
        }
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> ModelPhase {
        self.state.lock().expect("Lock failed").phase
    }

    /// Subscribe to phase transitions.
    ///
    /// The receiver observes every transition from the moment of
    /// subscription; disconnected receivers are pruned on the next
    /// notification.
    #[must_use]
    pub fn subscribe(&self) -> Receiver<ModelPhase> {
        let (tx, rx) = mpsc::channel();
        self.watchers.lock().expect("Lock failed").push(tx);
        rx
    }

    fn notify(&self, phase: ModelPhase) {
        self.watchers
            .lock()
            .expect("Lock failed")
            .retain(|tx| tx.send(phase).is_ok());
    }

    /// Load the model.
    ///
    /// Idempotent and safe to call from multiple call sites: returns
    /// immediately once `Ready`, attaches to an in-flight load while
    /// `Loading`, and replays the original error once `Failed` — a failed
    /// load is never retried within this runner's lifetime.
    ///
    /// # Errors
    /// Returns the `LoadError` that moved the runner to `Failed`.
    pub fn load(&self) -> Result<(), LoadError> {
        let mut state = self.state.lock().expect("Lock failed");
        loop {
            match state.phase {
                ModelPhase::Ready => return Ok(()),
                ModelPhase::Failed => {
                    return Err(state
                        .failure
                        .clone()
                        .unwrap_or_else(|| LoadError::Artifact("Unknown load failure".into())));
                }
                ModelPhase::Loading => {
                    state = self.load_done.wait(state).expect("Lock failed");
                }
                ModelPhase::Unloaded => break,
            }
        }

        state.phase = ModelPhase::Loading;
        drop(state);
        self.notify(ModelPhase::Loading);

        tracing::info!("Loading classifier model...");
        let outcome = self.engine.load();

        let mut state = self.state.lock().expect("Lock failed");
        let result = match outcome {
            Ok(model) => {
                // A runner only ever reaches here once.
                let _ = self.model.set(model);
                state.phase = ModelPhase::Ready;
                tracing::info!("Model ready");
                Ok(())
            }
            Err(e) => {
                state.phase = ModelPhase::Failed;
                state.failure = Some(e.clone());
                tracing::error!("Model load failed: {e}");
                Err(e)
            }
        };
        let phase = state.phase;
        drop(state);

        self.load_done.notify_all();
        self.notify(phase);
        result
    }

    /// Run one inference.
    ///
    /// Serialized: overlapping calls wait for the slot rather than racing
    /// on the engine. The reported elapsed time covers the forward pass
    /// only, so latency is comparable across devices.
    ///
    /// # Errors
    /// `ModelNotReady` if called before a successful load (a coordinator
    /// bug, logged as a defect); `InferenceFailure` if the engine cannot
    /// execute on the input.
    pub fn predict(&self, features: &HealthFeatures) -> Result<RawOutput, InferenceError> {
        let phase = self.phase();
        let Some(model) = self.model.get() else {
            tracing::error!(
                "predict() invoked while phase is {phase:?}; the readiness gate must prevent this"
            );
            return Err(InferenceError::ModelNotReady);
        };

        let _slot = self.inference_slot.lock().expect("Lock failed");

        let started = Instant::now();
        let class_probabilities = self.engine.invoke(model, features)?;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        tracing::debug!("Inference finished in {elapsed_ms}ms");

        Ok(RawOutput {
            class_probabilities,
            elapsed_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    struct StubEngine {
        loads: AtomicUsize,
        fail_load: bool,
        load_delay: Duration,
        positive: f64,
        invoking: AtomicBool,
    }

    impl StubEngine {
        fn new(positive: f64) -> Self {
            Self {
                loads: AtomicUsize::new(0),
                fail_load: false,
                load_delay: Duration::ZERO,
                positive,
                invoking: AtomicBool::new(false),
            }
        }

        fn failing() -> Self {
            Self {
                fail_load: true,
                ..Self::new(0.5)
            }
        }
    }

    impl InferenceEngine for StubEngine {
        type Model = ();

        fn load(&self) -> Result<Self::Model, LoadError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(self.load_delay);
            if self.fail_load {
                Err(LoadError::Artifact("Stub failure".into()))
            } else {
                Ok(())
            }
        }

        fn invoke(
            &self,
            _model: &Self::Model,
            _features: &HealthFeatures,
        ) -> Result<[f64; 2], InferenceError> {
            let was_running = self.invoking.swap(true, Ordering::SeqCst);
            assert!(!was_running, "Forward passes must never overlap");
            std::thread::sleep(Duration::from_millis(5));
            self.invoking.store(false, Ordering::SeqCst);
            Ok([1.0 - self.positive, self.positive])
        }
    }

    #[test]
    fn test_load_is_idempotent() {
        let runner = ModelRunner::new(StubEngine::new(0.5));

        assert_eq!(runner.phase(), ModelPhase::Unloaded);
        runner.load().expect("First load should succeed");
        runner.load().expect("Second load should succeed");
        runner.load().expect("Third load should succeed");

        assert_eq!(runner.phase(), ModelPhase::Ready);
        assert_eq!(runner.engine.loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_concurrent_loads_single_flight() {
        let mut engine = StubEngine::new(0.5);
        engine.load_delay = Duration::from_millis(50);
        let runner = Arc::new(ModelRunner::new(engine));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let runner = Arc::clone(&runner);
                std::thread::spawn(move || runner.load())
            })
            .collect();

        for handle in handles {
            handle.join().expect("Thread should finish").expect("Load should succeed");
        }

        assert_eq!(runner.engine.loads.load(Ordering::SeqCst), 1);
        assert_eq!(runner.phase(), ModelPhase::Ready);
    }

    #[test]
    fn test_failed_load_is_terminal() {
        let runner = ModelRunner::new(StubEngine::failing());

        assert!(runner.load().is_err());
        assert_eq!(runner.phase(), ModelPhase::Failed);

        // The original failure is replayed without touching the engine again.
        assert!(runner.load().is_err());
        assert_eq!(runner.engine.loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_predict_before_load() {
        let runner = ModelRunner::new(StubEngine::new(0.5));
        let features = HealthFeatures::default();

        assert!(matches!(
            runner.predict(&features),
            Err(InferenceError::ModelNotReady)
        ));
    }

    #[test]
    fn test_predict_returns_ordered_pair() {
        let runner = ModelRunner::new(StubEngine::new(0.8));
        runner.load().expect("Should load");

        let raw = runner
            .predict(&HealthFeatures::default())
            .expect("Should predict");
        assert!((raw.class_probabilities[0] - 0.2).abs() < 1e-9);
        assert!((raw.class_probabilities[1] - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_overlapping_predicts_serialize() {
        let runner = Arc::new(ModelRunner::new(StubEngine::new(0.5)));
        runner.load().expect("Should load");

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let runner = Arc::clone(&runner);
                std::thread::spawn(move || runner.predict(&HealthFeatures::default()))
            })
            .collect();

        for handle in handles {
            handle
                .join()
                .expect("Thread should finish")
                .expect("Predict should succeed");
        }
    }

    #[test]
    fn test_subscribers_observe_transitions() {
        let runner = ModelRunner::new(StubEngine::new(0.5));
        let rx = runner.subscribe();

        runner.load().expect("Should load");

        assert_eq!(rx.recv().expect("Should receive"), ModelPhase::Loading);
        assert_eq!(rx.recv().expect("Should receive"), ModelPhase::Ready);
    }
}
