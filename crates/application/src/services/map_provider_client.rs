//! Map provider facade
//!
//! Lazily loads the mapping SDK on first use and exposes geocoding, distance
//! and directions on top of it. Initialization is shared: callers arriving
//! while a load (or its backoff) is in flight wait for the same outcome
//! instead of starting another load.

use std::fmt;
use std::sync::{Arc, Weak};
use std::sync::atomic::{AtomicU32, Ordering};

use domain::{Location, RouteRequest, RouteResult};
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use parking_lot::Mutex;
use tracing::{debug, error, info, instrument, warn};

use super::retry_policy::RetryPolicy;
use crate::ports::{MapSdkHandles, MapSdkLoader, MapsError};

type InitializationFuture = Shared<BoxFuture<'static, Result<MapSdkHandles, MapsError>>>;

/// Observable lifecycle of the map provider session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitializationState {
    Uninitialized,
    Initializing,
    Ready,
    /// Retries were exhausted; the next `initialize()` starts over
    Failed,
}

enum SessionState {
    Uninitialized,
    Initializing(InitializationFuture),
    Ready(MapSdkHandles),
    Failed(MapsError),
}

struct Inner {
    loader: Arc<dyn MapSdkLoader>,
    policy: RetryPolicy,
    state: Mutex<SessionState>,
    retry_count: AtomicU32,
}

/// Load the SDK, retrying with exponential backoff
///
/// Holds the client only weakly between steps: the in-flight future is stored
/// in the client's own state.
async fn run_initialization(
    client: Weak<Inner>,
    loader: Arc<dyn MapSdkLoader>,
    policy: RetryPolicy,
) -> Result<MapSdkHandles, MapsError> {
    loop {
        let outcome = loader.load().await;
        let Some(inner) = client.upgrade() else {
            debug!("Map provider client dropped during initialization");
            return Err(MapsError::InitializationFailed(
                "map provider client dropped".to_string(),
            ));
        };

        match outcome {
            Ok(handles) => {
                inner.retry_count.store(0, Ordering::SeqCst);
                *inner.state.lock() = SessionState::Ready(handles.clone());
                info!("Map provider initialized");
                return Ok(handles);
            },
            Err(e) => {
                let retries = inner.retry_count.load(Ordering::SeqCst);
                if retries < policy.max_retries {
                    let attempt = retries + 1;
                    inner.retry_count.store(attempt, Ordering::SeqCst);
                    drop(inner);

                    let delay = policy.delay_for_retry(attempt);
                    warn!(
                        attempt,
                        max_retries = policy.max_retries,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %e,
                        "Retrying map provider initialization"
                    );
                    tokio::time::sleep(delay).await;
                    continue;
                }

                if policy.reset_on_exhaustion {
                    inner.retry_count.store(0, Ordering::SeqCst);
                }

                let failure = MapsError::InitializationFailed(e.to_string());
                error!(retries, error = %e, "Map provider initialization failed");
                *inner.state.lock() = SessionState::Failed(failure.clone());
                return Err(failure);
            },
        }
    }
}

/// Lazily initialized facade over a mapping provider SDK
///
/// Cheap to clone; clones share one session.
#[derive(Clone)]
pub struct MapProviderClient {
    inner: Arc<Inner>,
}

impl fmt::Debug for MapProviderClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapProviderClient")
            .field("state", &self.state())
            .field("retry_count", &self.retry_count())
            .field("policy", &self.inner.policy)
            .finish_non_exhaustive()
    }
}

impl MapProviderClient {
    pub fn new(loader: Arc<dyn MapSdkLoader>, policy: RetryPolicy) -> Self {
        Self {
            inner: Arc::new(Inner {
                loader,
                policy,
                state: Mutex::new(SessionState::Uninitialized),
                retry_count: AtomicU32::new(0),
            }),
        }
    }

    /// Current lifecycle state
    #[must_use]
    pub fn state(&self) -> InitializationState {
        match &*self.inner.state.lock() {
            SessionState::Uninitialized => InitializationState::Uninitialized,
            SessionState::Initializing(_) => InitializationState::Initializing,
            SessionState::Ready(_) => InitializationState::Ready,
            SessionState::Failed(_) => InitializationState::Failed,
        }
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.state() == InitializationState::Ready
    }

    /// Retries consumed since the last successful initialization
    #[must_use]
    pub fn retry_count(&self) -> u32 {
        self.inner.retry_count.load(Ordering::SeqCst)
    }

    /// Load the SDK, or join the load already in flight
    #[instrument(skip(self))]
    pub async fn initialize(&self) -> Result<(), MapsError> {
        self.session().await.map(|_| ())
    }

    /// Handles of the ready session, loading it first if needed
    async fn session(&self) -> Result<MapSdkHandles, MapsError> {
        let attempt = {
            let mut state = self.inner.state.lock();
            match &*state {
                SessionState::Ready(handles) => return Ok(handles.clone()),
                SessionState::Initializing(attempt) => {
                    debug!("Joining in-flight map provider initialization");
                    attempt.clone()
                },
                SessionState::Uninitialized | SessionState::Failed(_) => {
                    let attempt = run_initialization(
                        Arc::downgrade(&self.inner),
                        Arc::clone(&self.inner.loader),
                        self.inner.policy.clone(),
                    )
                    .boxed()
                    .shared();
                    *state = SessionState::Initializing(attempt.clone());
                    attempt
                },
            }
        };

        attempt.await
    }

    /// Initialize unless the session is already ready
    pub async fn ensure_initialized(&self) -> Result<(), MapsError> {
        if self.is_ready() {
            return Ok(());
        }
        self.initialize().await
    }

    /// Resolve an address to the coordinates of its best match
    #[instrument(skip(self))]
    pub async fn geocode_address(&self, address: &str) -> Result<Location, MapsError> {
        let geocoder = self
            .session()
            .await?
            .geocoder
            .ok_or(MapsError::NotInitialized)?;

        let result = geocoder
            .geocode(address)
            .await
            .and_then(|results| {
                results
                    .into_iter()
                    .next()
                    .ok_or_else(|| MapsError::LocationNotFound(address.to_string()))
            });

        match result {
            Ok(first) => {
                debug!(%address, location = %first.location, "Geocoded address");
                Ok(first.location)
            },
            Err(e) => {
                error!(%address, error = %e, "Geocoding error");
                Err(e)
            },
        }
    }

    /// Distance in meters using the provider's spherical geometry
    #[must_use]
    pub fn calculate_distance(&self, origin: &Location, destination: &Location) -> f64 {
        self.inner
            .loader
            .compute_distance_between(origin, destination)
    }

    /// Driving directions between two locations
    #[instrument(skip_all, fields(origin = %origin, destination = %destination))]
    pub async fn get_directions(
        &self,
        origin: &Location,
        destination: &Location,
    ) -> Result<RouteResult, MapsError> {
        let directions = self
            .session()
            .await?
            .directions
            .ok_or(MapsError::NotInitialized)?;

        let request = RouteRequest::driving(*origin, *destination);
        let response = directions.route(&request).await?;

        match response.result {
            Some(result) if response.status.is_ok() => {
                debug!(routes = result.routes.len(), "Directions received");
                Ok(result)
            },
            _ => {
                warn!(status = %response.status, "Directions request failed");
                Err(MapsError::DirectionsFailed(response.status))
            },
        }
    }
}
