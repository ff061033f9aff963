//! Continuous position tracking
//!
//! Subscribes to platform position updates and forwards each one, in order,
//! to a single registered observer. Callers that want travelled distance feed
//! the locations into a [`domain::Journey`] or use [`JourneyTracker::calculate_distance`].

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use domain::{Location, haversine_distance};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::ports::{GeolocationError, GeolocationPort, PositionOptions, PositionWatch};

type LocationObserver = Box<dyn FnMut(Location) + Send>;

struct Session {
    id: u64,
    observer: LocationObserver,
    last_location: Option<Location>,
}

#[derive(Default)]
struct TrackerState {
    session: Mutex<Option<Session>>,
    next_session_id: AtomicU64,
}

impl TrackerState {
    /// Store and forward a location; false once the session has ended
    fn deliver(&self, session_id: u64, location: Location) -> bool {
        let mut guard = self.session.lock();
        match guard.as_mut() {
            Some(session) if session.id == session_id => {
                session.last_location = Some(location);
                (session.observer)(location);
                true
            },
            _ => false,
        }
    }

    /// Drop the session if it is still the one that just lost its watch
    fn end(&self, session_id: u64) {
        let mut guard = self.session.lock();
        if guard.as_ref().is_some_and(|session| session.id == session_id) {
            *guard = None;
            warn!(session_id, "Position watch ended by the platform, tracking stopped");
        }
    }
}

/// Tracks a moving position and notifies an observer on every update
///
/// Idle until [`start_tracking`](Self::start_tracking), tracking until
/// [`stop_tracking`](Self::stop_tracking). Errors reported by the platform
/// subscription are logged and otherwise ignored: the observer never sees
/// them and tracking keeps running.
pub struct JourneyTracker {
    geolocation: Arc<dyn GeolocationPort>,
    options: PositionOptions,
    state: Arc<TrackerState>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl fmt::Debug for JourneyTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JourneyTracker")
            .field("tracking", &self.is_tracking())
            .field("last_location", &self.last_location())
            .finish_non_exhaustive()
    }
}

impl JourneyTracker {
    pub fn new(geolocation: Arc<dyn GeolocationPort>) -> Self {
        Self {
            geolocation,
            options: PositionOptions::default(),
            state: Arc::new(TrackerState::default()),
            task: Mutex::new(None),
        }
    }

    /// Start tracking and register `observer` for position updates
    ///
    /// The observer runs synchronously for each update, in platform order.
    /// It must not call back into this tracker. A running session is stopped
    /// and replaced.
    #[instrument(skip(self, observer))]
    pub async fn start_tracking<F>(&self, observer: F) -> Result<(), GeolocationError>
    where
        F: FnMut(Location) + Send + 'static,
    {
        if !self.geolocation.is_supported() {
            return Err(GeolocationError::UnsupportedPlatform);
        }

        self.stop_tracking();

        let watch = self.geolocation.watch_position(&self.options).await?;
        let session_id = self.state.next_session_id.fetch_add(1, Ordering::Relaxed);

        *self.state.session.lock() = Some(Session {
            id: session_id,
            observer: Box::new(observer),
            last_location: None,
        });

        let handle = tokio::spawn(forward_updates(Arc::clone(&self.state), session_id, watch));
        if let Some(previous) = self.task.lock().replace(handle) {
            previous.abort();
        }

        info!(session_id, "Location tracking started");
        Ok(())
    }

    /// Stop tracking
    ///
    /// Cancels the platform subscription and forgets the observer and the
    /// last known location. No observer call happens after this returns.
    /// Calling it while idle does nothing.
    pub fn stop_tracking(&self) {
        let session = self.state.session.lock().take();
        let task = self.task.lock().take();

        if let Some(task) = task {
            task.abort();
        }

        if let Some(session) = session {
            info!(session_id = session.id, "Location tracking stopped");
        }
    }

    #[must_use]
    pub fn is_tracking(&self) -> bool {
        self.state.session.lock().is_some()
    }

    /// Most recent location of the running session
    #[must_use]
    pub fn last_location(&self) -> Option<Location> {
        self.state
            .session
            .lock()
            .as_ref()
            .and_then(|session| session.last_location)
    }

    /// Great-circle distance between two locations in meters
    #[must_use]
    pub fn calculate_distance(a: &Location, b: &Location) -> f64 {
        haversine_distance(a, b)
    }
}

impl Drop for JourneyTracker {
    fn drop(&mut self) {
        if let Some(task) = self.task.get_mut().take() {
            task.abort();
        }
    }
}

async fn forward_updates(state: Arc<TrackerState>, session_id: u64, mut watch: PositionWatch) {
    loop {
        match watch.next().await {
            Some(Ok(fix)) => {
                if !state.deliver(session_id, fix.to_location()) {
                    break;
                }
            },
            Some(Err(e)) => {
                warn!(session_id, error = %e, "Error tracking location");
            },
            None => {
                state.end(session_id);
                break;
            },
        }
    }
    watch.cancel();
    debug!(session_id, "Position watch closed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{PositionFix, PositionUpdate};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::time::Duration;
    use tokio::sync::mpsc;

    /// Platform double that hands the test the sending side of every watch
    #[derive(Default)]
    struct FakePlatform {
        unsupported: bool,
        watches: Mutex<Vec<mpsc::Sender<PositionUpdate>>>,
    }

    impl FakePlatform {
        fn sender(&self, index: usize) -> mpsc::Sender<PositionUpdate> {
            self.watches.lock()[index].clone()
        }

        /// Close a watch from the platform side
        fn end_watch(&self, index: usize) {
            let (closed, _) = mpsc::channel(1);
            self.watches.lock()[index] = closed;
        }

        fn watch_count(&self) -> usize {
            self.watches.lock().len()
        }
    }

    #[async_trait]
    impl GeolocationPort for FakePlatform {
        fn is_supported(&self) -> bool {
            !self.unsupported
        }

        async fn current_position(
            &self,
            _options: &PositionOptions,
        ) -> Result<PositionFix, GeolocationError> {
            Err(GeolocationError::PositionUnavailable("not used".to_string()))
        }

        async fn watch_position(
            &self,
            _options: &PositionOptions,
        ) -> Result<PositionWatch, GeolocationError> {
            let (tx, watch) = PositionWatch::channel(16);
            self.watches.lock().push(tx);
            Ok(watch)
        }
    }

    fn fix(lat: f64, lon: f64) -> PositionUpdate {
        Ok(PositionFix::new(Location::new(lat, lon), Utc::now()))
    }

    fn recording_observer() -> (
        impl FnMut(Location) + Send + 'static,
        mpsc::UnboundedReceiver<Location>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        (move |location| {
            let _ = tx.send(location);
        }, rx)
    }

    async fn recv(rx: &mut mpsc::UnboundedReceiver<Location>) -> Location {
        tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("observer was not called")
            .expect("observer dropped")
    }

    #[tokio::test]
    async fn delivers_fixes_in_order() {
        let platform = Arc::new(FakePlatform::default());
        let tracker = JourneyTracker::new(platform.clone());
        let (observer, mut rx) = recording_observer();

        tokio_test::assert_ok!(tracker.start_tracking(observer).await);
        assert!(tracker.is_tracking());

        let tx = platform.sender(0);
        tx.send(fix(1.0, 1.0)).await.unwrap();
        tx.send(fix(2.0, 2.0)).await.unwrap();
        tx.send(fix(3.0, 3.0)).await.unwrap();

        assert_eq!(recv(&mut rx).await, Location::new(1.0, 1.0));
        assert_eq!(recv(&mut rx).await, Location::new(2.0, 2.0));
        assert_eq!(recv(&mut rx).await, Location::new(3.0, 3.0));
        assert!(rx.try_recv().is_err());
        assert_eq!(tracker.last_location(), Some(Location::new(3.0, 3.0)));
    }

    #[tokio::test]
    async fn no_delivery_after_stop() {
        let platform = Arc::new(FakePlatform::default());
        let tracker = JourneyTracker::new(platform.clone());
        let (observer, mut rx) = recording_observer();

        tracker.start_tracking(observer).await.unwrap();
        let tx = platform.sender(0);
        tx.send(fix(1.0, 1.0)).await.unwrap();
        assert_eq!(recv(&mut rx).await, Location::new(1.0, 1.0));

        tracker.stop_tracking();
        assert!(!tracker.is_tracking());
        assert!(tracker.last_location().is_none());

        let _ = tx.send(fix(2.0, 2.0)).await;
        // The observer is dropped with the session, closing the channel
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn stop_cancels_platform_subscription() {
        let platform = Arc::new(FakePlatform::default());
        let tracker = JourneyTracker::new(platform.clone());
        let (observer, _rx) = recording_observer();

        tracker.start_tracking(observer).await.unwrap();
        let tx = platform.sender(0);
        tracker.stop_tracking();

        tokio::time::timeout(Duration::from_secs(1), tx.closed())
            .await
            .expect("subscription was not cancelled");
    }

    #[tokio::test]
    async fn stop_is_idempotent() {
        let platform = Arc::new(FakePlatform::default());
        let tracker = JourneyTracker::new(platform.clone());

        tracker.stop_tracking();
        assert!(!tracker.is_tracking());

        let (observer, _rx) = recording_observer();
        tracker.start_tracking(observer).await.unwrap();
        tracker.stop_tracking();
        tracker.stop_tracking();
        assert!(!tracker.is_tracking());
    }

    #[tokio::test]
    async fn errors_are_not_forwarded_and_tracking_continues() {
        let platform = Arc::new(FakePlatform::default());
        let tracker = JourneyTracker::new(platform.clone());
        let (observer, mut rx) = recording_observer();

        tracker.start_tracking(observer).await.unwrap();
        let tx = platform.sender(0);
        tx.send(Err(GeolocationError::PermissionDenied("revoked".to_string())))
            .await
            .unwrap();
        tx.send(Err(GeolocationError::Timeout)).await.unwrap();
        tx.send(fix(4.0, 4.0)).await.unwrap();

        assert_eq!(recv(&mut rx).await, Location::new(4.0, 4.0));
        assert!(tracker.is_tracking());
    }

    #[tokio::test]
    async fn platform_ending_watch_stops_tracking() {
        let platform = Arc::new(FakePlatform::default());
        let tracker = JourneyTracker::new(platform.clone());
        let (observer, mut rx) = recording_observer();

        tracker.start_tracking(observer).await.unwrap();
        let tx = platform.sender(0);
        tx.send(fix(1.0, 1.0)).await.unwrap();
        assert_eq!(recv(&mut rx).await, Location::new(1.0, 1.0));

        drop(tx);
        platform.end_watch(0);

        // The observer is dropped with the session
        tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("session was not ended");
        assert!(!tracker.is_tracking());
        assert!(tracker.last_location().is_none());
    }

    #[tokio::test]
    async fn unsupported_platform_stays_idle() {
        let platform = Arc::new(FakePlatform {
            unsupported: true,
            ..FakePlatform::default()
        });
        let tracker = JourneyTracker::new(platform.clone());
        let (observer, _rx) = recording_observer();

        assert_eq!(
            tracker.start_tracking(observer).await,
            Err(GeolocationError::UnsupportedPlatform)
        );
        assert!(!tracker.is_tracking());
        assert_eq!(platform.watch_count(), 0);
    }

    #[tokio::test]
    async fn restart_replaces_previous_session() {
        let platform = Arc::new(FakePlatform::default());
        let tracker = JourneyTracker::new(platform.clone());

        let (first, mut first_rx) = recording_observer();
        tracker.start_tracking(first).await.unwrap();
        let first_tx = platform.sender(0);

        let (second, mut second_rx) = recording_observer();
        tracker.start_tracking(second).await.unwrap();
        let second_tx = platform.sender(1);

        tokio::time::timeout(Duration::from_secs(1), first_tx.closed())
            .await
            .expect("first subscription was not cancelled");
        assert!(first_rx.recv().await.is_none());

        second_tx.send(fix(5.0, 5.0)).await.unwrap();
        assert_eq!(recv(&mut second_rx).await, Location::new(5.0, 5.0));
    }

    #[tokio::test]
    async fn observer_can_accumulate_journey_distance() {
        let platform = Arc::new(FakePlatform::default());
        let tracker = JourneyTracker::new(platform.clone());
        let journey = Arc::new(Mutex::new(domain::Journey::started_at(Utc::now())));
        let (done_tx, mut done_rx) = mpsc::unbounded_channel();

        let sink = Arc::clone(&journey);
        tracker
            .start_tracking(move |location| {
                let _ = sink.lock().record_position(location);
                let _ = done_tx.send(());
            })
            .await
            .unwrap();

        let tx = platform.sender(0);
        for update in [fix(0.0, 0.0), fix(1.0, 0.0), fix(2.0, 0.0)] {
            tx.send(update).await.unwrap();
            done_rx.recv().await.unwrap();
        }
        tracker.stop_tracking();

        let one_degree = JourneyTracker::calculate_distance(
            &Location::new(0.0, 0.0),
            &Location::new(1.0, 0.0),
        );
        assert!((journey.lock().total_distance() - 2.0 * one_degree).abs() < 1e-6);
    }

    #[test]
    fn calculate_distance_matches_haversine() {
        let a = Location::new(52.52, 13.405);
        let b = Location::new(51.5074, -0.1278);
        assert!(
            (JourneyTracker::calculate_distance(&a, &b) - haversine_distance(&a, &b)).abs()
                < f64::EPSILON
        );
        assert!(JourneyTracker::calculate_distance(&a, &a).abs() < f64::EPSILON);
    }
}
