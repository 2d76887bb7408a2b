//! Request state machine: `Idle -> Loading -> Success | Error`.
//!
//! Every request gets a sequence number when it starts. An outcome is only
//! applied if it belongs to the most recently issued request, so a slow
//! response can never overwrite the result of a newer one.

use std::sync::Arc;

use crate::{
    error::WeatherError,
    model::{LocationQuery, RequestState, WeatherResult},
    provider::WeatherProvider,
};

/// Handle for one issued request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestTicket {
    seq: u64,
    query: LocationQuery,
}

impl RequestTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn query(&self) -> &LocationQuery {
        &self.query
    }
}

#[derive(Debug)]
pub struct WeatherFetcher {
    provider: Arc<dyn WeatherProvider>,
    state: RequestState,
    latest: u64,
}

impl WeatherFetcher {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self { provider, state: RequestState::Idle, latest: 0 }
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn provider(&self) -> Arc<dyn WeatherProvider> {
        Arc::clone(&self.provider)
    }

    /// Start a request for `query`; everything issued before it becomes stale.
    pub fn begin(&mut self, query: LocationQuery) -> RequestTicket {
        self.latest += 1;
        self.state = RequestState::Loading;
        tracing::debug!(seq = self.latest, query = %query, "weather request issued");
        RequestTicket { seq: self.latest, query }
    }

    /// Apply the outcome of `ticket`. Returns `false` if the ticket was stale
    /// and the outcome was dropped.
    pub fn finish(
        &mut self,
        ticket: &RequestTicket,
        outcome: Result<WeatherResult, WeatherError>,
    ) -> bool {
        if ticket.seq != self.latest {
            tracing::debug!(seq = ticket.seq, latest = self.latest, "discarding stale weather response");
            return false;
        }

        self.state = match outcome {
            Ok(result) => RequestState::Success(result),
            Err(err) => {
                tracing::warn!(seq = ticket.seq, error = %err, "weather request failed");
                RequestState::Error(err.user_message())
            }
        };
        true
    }

    /// Record a failure that happened before any request could be issued.
    pub fn fail(&mut self, err: &WeatherError) {
        self.latest += 1;
        self.state = RequestState::Error(err.user_message());
    }

    /// Back to `Idle`; in-flight requests are ignored when they complete.
    pub fn reset(&mut self) {
        self.latest += 1;
        self.state = RequestState::Idle;
    }

    /// Issue a request and wait for it.
    ///
    /// The fetcher stays borrowed until the response arrives. A front end that
    /// must keep taking input meanwhile calls [`begin`](Self::begin), awaits
    /// [`provider`](Self::provider) outside the borrow and hands the outcome to
    /// [`finish`](Self::finish); overlapping requests then resolve newest-wins.
    pub async fn fetch(&mut self, query: LocationQuery) -> &RequestState {
        let ticket = self.begin(query);
        let provider = self.provider();
        let outcome = provider.current(ticket.query()).await;
        self.finish(&ticket, outcome);
        &self.state
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub(crate) fn result_for(name: &str) -> WeatherResult {
        WeatherResult {
            location_name: name.to_string(),
            region: String::new(),
            country: "Nowhere".to_string(),
            local_time: NaiveDate::from_ymd_opt(2024, 6, 10)
                .and_then(|d| d.and_hms_opt(9, 5, 0))
                .unwrap(),
            temperature_c: 21.0,
            feels_like_c: 20.0,
            condition: "Sunny".to_string(),
            icon_url: "https://cdn.weatherapi.com/weather/64x64/day/113.png".to_string(),
            humidity_pct: 40,
            wind_kph: 5.0,
            wind_dir: "N".to_string(),
            uv_index: 3.0,
            pressure_mb: 1012.0,
        }
    }

    /// Echoes the query back as the location name.
    #[derive(Debug, Default)]
    pub(crate) struct EchoProvider {
        pub(crate) calls: AtomicUsize,
    }

    #[async_trait]
    impl WeatherProvider for EchoProvider {
        async fn current(&self, query: &LocationQuery) -> Result<WeatherResult, WeatherError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(result_for(&query.as_query_string()))
        }
    }

    fn fetcher() -> WeatherFetcher {
        WeatherFetcher::new(Arc::new(EchoProvider::default()))
    }

    #[test]
    fn begin_moves_to_loading() {
        let mut f = fetcher();
        assert_eq!(f.state(), &RequestState::Idle);

        let ticket = f.begin(LocationQuery::City("Paris".into()));
        assert!(f.state().is_loading());
        assert_eq!(ticket.seq(), 1);
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut f = fetcher();
        let first = f.begin(LocationQuery::City("Paris".into()));
        let second = f.begin(LocationQuery::City("Berlin".into()));

        assert!(f.finish(&second, Ok(result_for("Berlin"))));
        assert!(!f.finish(&first, Ok(result_for("Paris"))));

        assert_eq!(f.state().result().map(|r| r.location_name.as_str()), Some("Berlin"));
    }

    #[test]
    fn stale_error_does_not_clear_newer_result() {
        let mut f = fetcher();
        let first = f.begin(LocationQuery::City("Paris".into()));
        let second = f.begin(LocationQuery::City("Berlin".into()));

        f.finish(&second, Ok(result_for("Berlin")));
        f.finish(&first, Err(WeatherError::Parse("late".into())));

        assert!(f.state().result().is_some());
    }

    #[test]
    fn error_replaces_previous_result() {
        let mut f = fetcher();
        let t = f.begin(LocationQuery::City("Paris".into()));
        f.finish(&t, Ok(result_for("Paris")));

        let t = f.begin(LocationQuery::City("Atlantis".into()));
        f.finish(&t, Err(WeatherError::Network { status: reqwest::StatusCode::BAD_REQUEST }));

        assert_eq!(f.state(), &RequestState::Error("Failed to fetch weather data.".into()));
        assert!(f.state().result().is_none());
    }

    #[test]
    fn reset_invalidates_in_flight_request() {
        let mut f = fetcher();
        let t = f.begin(LocationQuery::City("Paris".into()));
        f.reset();

        assert!(!f.finish(&t, Ok(result_for("Paris"))));
        assert_eq!(f.state(), &RequestState::Idle);
    }

    #[test]
    fn validation_failure_invalidates_in_flight_request() {
        let mut f = fetcher();
        let t = f.begin(LocationQuery::City("Paris".into()));
        f.fail(&WeatherError::missing_location());

        assert!(!f.finish(&t, Ok(result_for("Paris"))));
        assert!(f.state().error().is_some());
    }

    #[tokio::test]
    async fn fetch_runs_to_success() {
        let mut f = fetcher();
        let state = f.fetch(LocationQuery::City("Paris".into())).await;
        assert_eq!(state.result().map(|r| r.location_name.as_str()), Some("Paris"));
    }
}
