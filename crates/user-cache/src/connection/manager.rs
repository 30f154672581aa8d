//! Connection lifecycle for a single logical cache connection.
//!
//! The first operation connects lazily. Concurrent callers arriving while a
//! connect is in flight await the same shared attempt. A transport error
//! moves the manager to `Reconnecting` and hands recovery to a background
//! task that follows the [`ReconnectPolicy`]; callers fail fast meanwhile.
//! Once the policy gives up, the next operation makes one fresh coalesced
//! connect attempt, so the cache comes back after the server recovers.

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{error, info, warn};

use super::policy::ReconnectPolicy;
use crate::error::{CacheError, CacheResult};

/// Opens new connections for a [`ConnectionManager`]
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    /// Cheaply cloneable handle to an open connection
    type Conn: Clone + Send + Sync + 'static;

    async fn connect(&self) -> CacheResult<Self::Conn>;
}

/// A connection handed out by the manager, tagged with the generation it
/// belongs to so failures can be reported against the right connection
#[derive(Debug, Clone)]
pub struct Lease<C> {
    pub conn: C,
    pub generation: u64,
}

/// Externally visible connection phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionPhase {
    Disconnected,
    Connecting,
    Connected,
    Reconnecting,
    Exhausted,
}

/// Snapshot of the connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStatus {
    pub phase: ConnectionPhase,
    pub reconnect_attempts: u32,
}

type ConnectAttempt<C> = Shared<BoxFuture<'static, Result<Lease<C>, String>>>;

enum State<C: Clone> {
    Disconnected,
    Connecting {
        id: u64,
        attempt: ConnectAttempt<C>,
        after_exhaustion: bool,
    },
    Connected { conn: C, generation: u64 },
    Reconnecting { epoch: u64 },
    Exhausted,
}

struct Inner<K: Connector> {
    connector: K,
    policy: ReconnectPolicy,
    state: Mutex<State<K::Conn>>,
    ids: AtomicU64,
    attempts: AtomicU32,
}

impl<K: Connector> Inner<K> {
    fn next_id(&self) -> u64 {
        self.ids.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn is_reconnecting(&self, epoch: u64) -> bool {
        matches!(&*self.state.lock(), State::Reconnecting { epoch: current } if *current == epoch)
    }
}

/// Owns the connection state machine for one connector
pub struct ConnectionManager<K: Connector> {
    inner: Arc<Inner<K>>,
}

impl<K: Connector> Clone for ConnectionManager<K> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K: Connector> ConnectionManager<K> {
    /// Create a manager; no connection is opened until first use
    pub fn new(connector: K, policy: ReconnectPolicy) -> Self {
        Self {
            inner: Arc::new(Inner {
                connector,
                policy,
                state: Mutex::new(State::Disconnected),
                ids: AtomicU64::new(0),
                attempts: AtomicU32::new(0),
            }),
        }
    }

    /// The reconnection policy in effect
    pub fn policy(&self) -> ReconnectPolicy {
        self.inner.policy
    }

    /// Get the current connection, connecting first if necessary.
    ///
    /// From `Exhausted` this starts a fresh attempt; if it fails too, every
    /// waiter gets [`CacheError::ReconnectExhausted`] and the manager stays
    /// exhausted until the next operation tries again.
    pub async fn acquire(&self) -> CacheResult<Lease<K::Conn>> {
        let (attempt, after_exhaustion) = {
            let mut state = self.inner.state.lock();
            let in_flight = match &*state {
                State::Connected { conn, generation } => {
                    return Ok(Lease {
                        conn: conn.clone(),
                        generation: *generation,
                    });
                }
                State::Connecting {
                    attempt,
                    after_exhaustion,
                    ..
                } => Some((attempt.clone(), *after_exhaustion)),
                State::Reconnecting { .. } => {
                    return Err(CacheError::Connection(
                        "reconnection in progress".to_string(),
                    ));
                }
                State::Exhausted => {
                    self.inner.attempts.store(0, Ordering::Relaxed);
                    None
                }
                State::Disconnected => None,
            };

            in_flight.unwrap_or_else(|| {
                let after_exhaustion = matches!(&*state, State::Exhausted);
                let id = self.inner.next_id();
                let attempt = connect_once(Arc::clone(&self.inner), id, after_exhaustion);
                *state = State::Connecting {
                    id,
                    attempt: attempt.clone(),
                    after_exhaustion,
                };
                (attempt, after_exhaustion)
            })
        };

        attempt.await.map_err(|e| {
            if after_exhaustion {
                CacheError::ReconnectExhausted {
                    attempts: self.inner.policy.max_attempts,
                }
            } else {
                CacheError::Connection(e)
            }
        })
    }

    /// Report a transport failure observed on a leased connection.
    ///
    /// Ignored unless `generation` is still the live connection, so a late
    /// error from an old connection never tears down its replacement.
    pub fn report_failure(&self, generation: u64) {
        let epoch = {
            let mut state = self.inner.state.lock();
            if !matches!(&*state, State::Connected { generation: current, .. } if *current == generation)
            {
                return;
            }
            let epoch = self.inner.next_id();
            *state = State::Reconnecting { epoch };
            epoch
        };

        warn!(generation, "Cache connection lost, reconnecting in background");
        tokio::spawn(reconnect_loop(Arc::clone(&self.inner), epoch));
    }

    /// Move to `Disconnected`, returning the connection that was live, if any
    pub fn disconnect(&self) -> Option<K::Conn> {
        let previous = std::mem::replace(&mut *self.inner.state.lock(), State::Disconnected);
        self.inner.attempts.store(0, Ordering::Relaxed);
        match previous {
            State::Connected { conn, .. } => Some(conn),
            _ => None,
        }
    }

    pub fn status(&self) -> ConnectionStatus {
        let phase = match &*self.inner.state.lock() {
            State::Disconnected => ConnectionPhase::Disconnected,
            State::Connecting { .. } => ConnectionPhase::Connecting,
            State::Connected { .. } => ConnectionPhase::Connected,
            State::Reconnecting { .. } => ConnectionPhase::Reconnecting,
            State::Exhausted => ConnectionPhase::Exhausted,
        };
        ConnectionStatus {
            phase,
            reconnect_attempts: self.inner.attempts.load(Ordering::Relaxed),
        }
    }
}

/// One shared connect attempt. The attempt installs its own result so that
/// the transition happens exactly once however many callers await it.
fn connect_once<K: Connector>(
    inner: Arc<Inner<K>>,
    id: u64,
    after_exhaustion: bool,
) -> ConnectAttempt<K::Conn> {
    async move {
        let result = inner.connector.connect().await;

        let mut state = inner.state.lock();
        let current = matches!(&*state, State::Connecting { id: current, .. } if *current == id);
        match result {
            Ok(conn) if current => {
                *state = State::Connected {
                    conn: conn.clone(),
                    generation: id,
                };
                inner.attempts.store(0, Ordering::Relaxed);
                info!(generation = id, "Cache connection established");
                Ok(Lease {
                    conn,
                    generation: id,
                })
            }
            Ok(_) => Err("connection attempt superseded".to_string()),
            Err(e) => {
                if current {
                    *state = if after_exhaustion {
                        inner.attempts.store(inner.policy.max_attempts, Ordering::Relaxed);
                        State::Exhausted
                    } else {
                        State::Disconnected
                    };
                }
                error!(error = %e, "Cache connection failed");
                Err(e.to_string())
            }
        }
    }
    .boxed()
    .shared()
}

async fn reconnect_loop<K: Connector>(inner: Arc<Inner<K>>, epoch: u64) {
    let policy = inner.policy;
    let mut attempt = 1;

    while policy.allows(attempt) {
        inner.attempts.store(attempt, Ordering::Relaxed);
        tokio::time::sleep(policy.delay_for(attempt)).await;

        if !inner.is_reconnecting(epoch) {
            return;
        }

        match inner.connector.connect().await {
            Ok(conn) => {
                let mut state = inner.state.lock();
                if matches!(&*state, State::Reconnecting { epoch: current } if *current == epoch) {
                    let generation = inner.next_id();
                    *state = State::Connected { conn, generation };
                    inner.attempts.store(0, Ordering::Relaxed);
                    info!(attempt, generation, "Cache connection re-established");
                }
                return;
            }
            Err(e) => warn!(attempt, error = %e, "Cache reconnect attempt failed"),
        }

        attempt += 1;
    }

    let mut state = inner.state.lock();
    if matches!(&*state, State::Reconnecting { epoch: current } if *current == epoch) {
        *state = State::Exhausted;
        error!(
            attempts = policy.max_attempts,
            "Cache reconnection exhausted, the next operation will try once more"
        );
    }
}
