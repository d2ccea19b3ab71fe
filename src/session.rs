use crate::model::ResolverState;
use crate::resolver::Resolver;
use log::debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::sleep;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(350);

/// Debounced search over a stream of input changes.
///
/// Each [`submit`](SearchSession::submit) supersedes the previous one. A
/// submission only resolves once the input has been stable for the debounce
/// window, and only commits its state while it is still the latest.
pub struct SearchSession {
    inner: Arc<Inner>,
}

/// A committed state and the submission that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub generation: u64,
    /// Input as submitted
    pub query: String,
    pub state: ResolverState,
}

struct Inner {
    resolver: Resolver,
    debounce: Duration,
    generation: AtomicU64,
    state: watch::Sender<Snapshot>,
}

impl Inner {
    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Replace the state unless a newer submission exists
    fn commit(&self, generation: u64, query: &str, state: ResolverState) -> bool {
        self.state.send_if_modified(|current| {
            if !self.is_current(generation) {
                return false;
            }
            *current = Snapshot {
                generation,
                query: query.to_string(),
                state,
            };
            true
        })
    }
}

impl SearchSession {
    pub fn new(resolver: Resolver, debounce: Duration) -> Self {
        let (state, _) = watch::channel(Snapshot {
            generation: 0,
            query: String::new(),
            state: ResolverState::idle(),
        });
        SearchSession {
            inner: Arc::new(Inner {
                resolver,
                debounce,
                generation: AtomicU64::new(0),
                state,
            }),
        }
    }

    /// Record a new input value. Must be called inside a tokio runtime.
    pub fn submit(&self, input: impl Into<String>) -> u64 {
        let input = input.into();
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let inner = self.inner.clone();

        tokio::spawn(async move {
            sleep(inner.debounce).await;
            if !inner.is_current(generation) {
                debug!("Dropping superseded input {:?}", input);
                return;
            }

            if input.trim().is_empty() {
                inner.commit(generation, &input, ResolverState::idle());
                return;
            }

            inner.commit(generation, &input, ResolverState::loading());
            let state = inner.resolver.resolve(&input).await;
            if !inner.commit(generation, &input, state) {
                debug!("Discarding stale result for {:?}", input);
            }
        });

        generation
    }

    /// Latest committed state
    pub fn state(&self) -> ResolverState {
        self.inner.state.borrow().state.clone()
    }

    /// Generation of the most recent submission
    pub fn generation(&self) -> u64 {
        self.inner.generation.load(Ordering::SeqCst)
    }

    /// A receiver that observes every committed snapshot
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.inner.state.subscribe()
    }

    /// Wait for the latest submission (or a newer one) to finish resolving
    pub async fn settled(&self) -> ResolverState {
        let target = self.generation();
        let mut receiver = self.subscribe();
        let result = receiver
            .wait_for(|snapshot| snapshot.generation >= target && !snapshot.state.loading)
            .await;
        match result {
            Ok(snapshot) => snapshot.state.clone(),
            // The sender lives in `inner`, which we hold
            Err(_) => self.state(),
        }
    }
}
