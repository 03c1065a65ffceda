use crate::{
    error::FetchError,
    model::{RequestState, Units},
    provider::WeatherProvider,
};
use reqwest::StatusCode;
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};
use tokio::sync::{Mutex, watch};
use tracing::{debug, instrument, warn};

/// Drives weather lookups and publishes their lifecycle as a single
/// [`RequestState`] value on a watch channel.
///
/// Because the state is one value, subscribers can never observe loading,
/// result and error in a mutually inconsistent combination. Overlapping
/// requests are resolved with a generation counter: a completion is applied
/// only if it belongs to the most recently started request, so the latest
/// request wins deterministically.
///
/// Every error is absorbed here and surfaced as a `Failed` message; nothing
/// propagates to the caller.
pub struct WeatherCoordinator {
    provider: Arc<dyn WeatherProvider>,
    units: Units,
    state: watch::Sender<RequestState>,
    generation: AtomicU64,
    last_city: Mutex<Option<String>>,
}

impl WeatherCoordinator {
    pub fn new(provider: Arc<dyn WeatherProvider>, units: Units) -> Self {
        let (state, _) = watch::channel(RequestState::Idle);

        Self {
            provider,
            units,
            state,
            generation: AtomicU64::new(0),
            last_city: Mutex::new(None),
        }
    }

    /// Subscribe to state updates. Dropping the receiver ends the
    /// subscription; the channel only ever holds the latest state.
    pub fn subscribe(&self) -> watch::Receiver<RequestState> {
        self.state.subscribe()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> RequestState {
        self.state.borrow().clone()
    }

    /// Look up current weather for `city` and publish the outcome.
    ///
    /// Blank input is ignored without a state transition. A request that is
    /// superseded before it completes leaves the state untouched; the
    /// superseding request publishes the terminal state, so the loading
    /// condition always clears once the newest request finishes.
    #[instrument(skip(self))]
    pub async fn request_weather(&self, city: &str) {
        let city = city.trim();
        if city.is_empty() {
            warn!("ignoring weather request for a blank city name");
            return;
        }

        *self.last_city.lock().await = Some(city.to_string());

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_replace(RequestState::Loading);
        debug!(city, generation, "weather request started");

        let outcome = self.provider.fetch(city, self.units).await;

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(city, generation, "discarding superseded weather response");
            return;
        }

        let next = match outcome {
            Ok(record) => RequestState::Loaded(record),
            Err(error) => RequestState::Failed(failure_message(&error)),
        };
        self.state.send_replace(next);
    }

    /// Re-issue the last searched city, the programmatic form of the
    /// pull-to-refresh gesture. Returns `false` when nothing has been
    /// searched yet.
    pub async fn refresh(&self) -> bool {
        let city = self.last_city.lock().await.clone();

        match city {
            Some(city) => {
                self.request_weather(&city).await;
                true
            }
            None => false,
        }
    }
}

fn failure_message(error: &FetchError) -> String {
    match error {
        FetchError::Status { status, .. } if *status == StatusCode::NOT_FOUND => {
            "City not found. Please try again.".to_string()
        }
        FetchError::Status { status, .. } if *status == StatusCode::UNAUTHORIZED => {
            "Invalid API key. Please check your API key.".to_string()
        }
        FetchError::Status { message, .. } => format!("Error: {message}"),
        FetchError::Network(message) | FetchError::Parse(message) => {
            format!("Network error: {message}")
        }
    }
}
