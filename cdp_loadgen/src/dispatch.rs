//! The HTTP dispatcher.
//!
//! Every generated event is POSTed to the target exactly once. There is no
//! retry and no backoff: a request that fails, times out or is answered with
//! an unexpected status becomes an [`Outcome`] describing the failure, never
//! an error of the run.
//!
//! ## Metrics
//!
//! `requests_sent`: Total number of requests sent
//! `request_ok`: Requests that received a response, labelled by status code
//! `request_failure`: Requests that received no response
//! `bytes_written`: Total bytes written
//!

use std::{num::NonZeroU16, sync::Arc, time::Duration};

use bytes::Bytes;
use cdp_loadgen_payload::{EventType, ProfileEvent};
use http::{
    HeaderValue, Method, Request, StatusCode, Uri,
    header::{CONTENT_LENGTH, CONTENT_TYPE, InvalidHeaderValue},
    uri::Scheme,
};
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper_util::{
    client::legacy::{Client, connect::HttpConnector},
    rt::TokioExecutor,
};
use metrics::counter;
use serde::{Deserialize, Serialize};
use tokio::{sync::Semaphore, task::JoinSet, time};
use tracing::{error, info};

use crate::config::Config;

const API_KEY_HEADER: &str = "x-api-key";
/// Characters of a failed response body kept in its [`Outcome`].
pub const MAX_RESPONSE_CHARS: usize = 200;
// A char is at most four bytes of UTF-8.
const MAX_RESPONSE_BYTES: usize = MAX_RESPONSE_CHARS * 4;

type HttpClient = Client<HttpConnector, Full<Bytes>>;

#[derive(thiserror::Error, Debug)]
/// Errors produced while building a [`Dispatcher`].
pub enum Error {
    /// The API key cannot be carried in an HTTP header
    #[error("API key is not a valid header value: {0}")]
    ApiKey(#[from] InvalidHeaderValue),
    /// The target is not a plain `http` URI
    #[error("Target {uri} is not supported, only absolute http:// URIs are")]
    UnsupportedScheme {
        /// Target URI
        uri: String,
    },
}

#[derive(thiserror::Error, Debug)]
/// Reasons a single request received no response.
pub enum SendError {
    /// The event could not be encoded as JSON
    #[error("Failed to encode event: {0}")]
    Encode(#[from] cdp_loadgen_payload::Error),
    /// Wrapper around [`http::Error`].
    #[error("HTTP error: {0}")]
    Http(#[from] http::Error),
    /// Error making HTTP request
    #[error("Failed to send HTTP request to {uri}: {source}")]
    RequestFailed {
        /// Target URI
        uri: String,
        /// Underlying client error
        #[source]
        source: Box<hyper_util::client::legacy::Error>,
    },
    /// No response arrived within the configured timeout
    #[error("Request to {uri} timed out after {timeout:?}")]
    Timeout {
        /// Target URI
        uri: String,
        /// The timeout that elapsed
        timeout: Duration,
    },
}

/// The result of sending one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    /// 1-based position of the event in submission order
    pub index: usize,
    /// HTTP status of the response, 0 when no response arrived
    pub status_code: u16,
    /// True if and only if the status is 200 or 201
    pub success: bool,
    /// Identity key of the event
    pub idcard: String,
    /// Type of the event
    #[serde(rename = "type")]
    pub kind: EventType,
    /// Leading characters of the body of a non-2xx response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    /// Why no response arrived
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Outcome {
    fn responded(event: &ProfileEvent, index: usize, status: StatusCode, body: Option<String>) -> Self {
        Self {
            index,
            status_code: status.as_u16(),
            success: is_success(status),
            idcard: event.idcard().to_string(),
            kind: event.kind,
            response: body,
            error: None,
        }
    }

    fn fault(event: &ProfileEvent, index: usize, error: &impl std::fmt::Display) -> Self {
        Self {
            index,
            status_code: 0,
            success: false,
            idcard: event.idcard().to_string(),
            kind: event.kind,
            response: None,
            error: Some(error.to_string()),
        }
    }

    /// Human readable description of a failure.
    #[must_use]
    pub fn detail(&self) -> &str {
        self.error
            .as_deref()
            .or(self.response.as_deref())
            .unwrap_or("Unknown error")
    }
}

/// Whether `status` counts as an accepted event.
#[must_use]
pub fn is_success(status: StatusCode) -> bool {
    status == StatusCode::OK || status == StatusCode::CREATED
}

/// How a batch of events is pushed at the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// One task per event, at most `workers` requests in flight. Outcomes are
    /// returned in completion order.
    Concurrent {
        /// Maximum requests in flight
        workers: NonZeroU16,
    },
    /// One request at a time, pausing `delay` after each. Outcomes are
    /// returned in submission order.
    Sequential {
        /// Pause after each request
        delay: Duration,
    },
}

/// Sends profile events to a single ingestion endpoint.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    uri: Uri,
    api_key: HeaderValue,
    timeout: Duration,
    client: HttpClient,
    labels: Vec<(String, String)>,
}

impl Dispatcher {
    /// Create a new [`Dispatcher`] from the run configuration.
    ///
    /// # Errors
    ///
    /// Fails if the configured target is not an absolute `http` URI or the
    /// API key is not a valid header value.
    pub fn new(config: &Config) -> Result<Self, Error> {
        Self::with_target(
            config.target_uri.clone(),
            &config.api_key,
            config.request_timeout(),
            config.workers,
        )
    }

    /// Create a new [`Dispatcher`] for `uri`, keeping up to `connections`
    /// idle connections open.
    ///
    /// # Errors
    ///
    /// Fails if `uri` is not an absolute `http` URI or `api_key` is not a
    /// valid header value.
    pub fn with_target(
        uri: Uri,
        api_key: &str,
        timeout: Duration,
        connections: NonZeroU16,
    ) -> Result<Self, Error> {
        if uri.scheme() != Some(&Scheme::HTTP) || uri.authority().is_none() {
            return Err(Error::UnsupportedScheme {
                uri: uri.to_string(),
            });
        }

        let client = Client::builder(TokioExecutor::new())
            .pool_max_idle_per_host(usize::from(connections.get()))
            .retry_canceled_requests(false)
            .build_http();

        Ok(Self {
            uri,
            api_key: HeaderValue::from_str(api_key)?,
            timeout,
            client,
            labels: vec![("component".to_string(), "dispatcher".to_string())],
        })
    }

    /// Send every event according to `strategy`, returning one [`Outcome`]
    /// per event.
    pub async fn dispatch(
        &self,
        events: &[ProfileEvent],
        strategy: Strategy,
        show_progress: bool,
    ) -> Vec<Outcome> {
        let mut progress = Progress::new(events.len(), show_progress);
        match strategy {
            Strategy::Concurrent { workers } => {
                self.send_concurrent(events, workers, &mut progress).await
            }
            Strategy::Sequential { delay } => {
                self.send_sequential(events, delay, &mut progress).await
            }
        }
    }

    /// Send `events` through a pool of at most `workers` in-flight requests.
    /// Outcomes are in completion order.
    pub async fn send_concurrent(
        &self,
        events: &[ProfileEvent],
        workers: NonZeroU16,
        progress: &mut Progress,
    ) -> Vec<Outcome> {
        let permits = Arc::new(Semaphore::new(usize::from(workers.get())));
        let mut tasks = JoinSet::new();

        for (offset, event) in events.iter().enumerate() {
            let dispatcher = self.clone();
            let permits = Arc::clone(&permits);
            let event = event.clone();
            tasks.spawn(async move {
                let index = offset + 1;
                match permits.acquire_owned().await {
                    Ok(_permit) => dispatcher.send_one(&event, index).await,
                    Err(err) => Outcome::fault(&event, index, &err),
                }
            });
        }

        let mut outcomes = Vec::with_capacity(events.len());
        while let Some(res) = tasks.join_next().await {
            match res {
                Ok(outcome) => {
                    progress.record(&outcome);
                    outcomes.push(outcome);
                }
                Err(err) => error!("Send task failed to complete: {err}"),
            }
        }
        outcomes
    }

    /// Send `events` one after another, pausing `delay` after each. Outcomes
    /// are in submission order.
    pub async fn send_sequential(
        &self,
        events: &[ProfileEvent],
        delay: Duration,
        progress: &mut Progress,
    ) -> Vec<Outcome> {
        let mut outcomes = Vec::with_capacity(events.len());
        for (offset, event) in events.iter().enumerate() {
            let outcome = self.send_one(event, offset + 1).await;
            progress.record(&outcome);
            outcomes.push(outcome);
            time::sleep(delay).await;
        }
        outcomes
    }

    /// Send a single event. Failures are folded into the returned
    /// [`Outcome`].
    pub async fn send_one(&self, event: &ProfileEvent, index: usize) -> Outcome {
        counter!("requests_sent", &self.labels).increment(1);
        match self.post(event).await {
            Ok((status, body)) => {
                let mut status_labels = self.labels.clone();
                status_labels.push(("status_code".to_string(), status.as_u16().to_string()));
                counter!("request_ok", &status_labels).increment(1);
                Outcome::responded(event, index, status, body)
            }
            Err(err) => {
                error!("Event #{index} not delivered: {err}");
                counter!("request_failure", &self.labels).increment(1);
                Outcome::fault(event, index, &err)
            }
        }
    }

    async fn post(&self, event: &ProfileEvent) -> Result<(StatusCode, Option<String>), SendError> {
        let mut body = Vec::with_capacity(1_024);
        event.to_bytes(&mut body)?;
        let body_length = body.len();

        let request = Request::builder()
            .method(Method::POST)
            .uri(&self.uri)
            .header(CONTENT_TYPE, "application/json")
            .header(CONTENT_LENGTH, body_length)
            .header(API_KEY_HEADER, self.api_key.clone())
            .body(Full::new(Bytes::from(body)))?;

        let exchange = async {
            let response =
                self.client
                    .request(request)
                    .await
                    .map_err(|source| SendError::RequestFailed {
                        uri: self.uri.to_string(),
                        source: Box::new(source),
                    })?;
            counter!("bytes_written", &self.labels).increment(body_length as u64);

            let status = response.status();
            let body = if status.is_success() {
                None
            } else {
                Some(leading_text(response.into_body()).await)
            };
            Ok::<_, SendError>((status, body))
        };

        time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| SendError::Timeout {
                uri: self.uri.to_string(),
                timeout: self.timeout,
            })?
    }
}

/// Read no more of `body` than needed for its first [`MAX_RESPONSE_CHARS`]
/// characters.
async fn leading_text(body: Incoming) -> String {
    let mut body = std::pin::pin!(body);
    let mut buf: Vec<u8> = Vec::with_capacity(MAX_RESPONSE_BYTES);
    while buf.len() < MAX_RESPONSE_BYTES {
        match body.as_mut().frame().await {
            None => break,
            Some(Ok(frame)) => {
                if let Some(data) = frame.data_ref() {
                    let room = MAX_RESPONSE_BYTES - buf.len();
                    buf.extend_from_slice(&data[..data.len().min(room)]);
                }
            }
            Some(Err(err)) => return format!("Failed to read response body: {err}"),
        }
    }
    String::from_utf8_lossy(&buf)
        .chars()
        .take(MAX_RESPONSE_CHARS)
        .collect()
}

/// Completion tracking for a dispatch run.
#[derive(Debug, Clone, Copy)]
pub struct Progress {
    total: usize,
    completed: usize,
    failed: usize,
    enabled: bool,
}

impl Progress {
    /// Track `total` sends, logging only when `enabled`.
    #[must_use]
    pub fn new(total: usize, enabled: bool) -> Self {
        Self {
            total,
            completed: 0,
            failed: 0,
            enabled,
        }
    }

    /// Record one finished send.
    pub fn record(&mut self, outcome: &Outcome) {
        self.completed += 1;
        if !outcome.success {
            self.failed += 1;
        }
        if !self.enabled {
            return;
        }

        info!(
            "Event #{index} finished with status {status}: {completed}/{total} sent, {failed} failed",
            index = outcome.index,
            status = outcome.status_code,
            completed = self.completed,
            total = self.total,
            failed = self.failed,
        );
    }

    /// Number of sends recorded so far.
    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed
    }

    /// Number of recorded sends that did not succeed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failed
    }
}

#[cfg(test)]
mod tests {
    use std::{
        convert::Infallible,
        num::NonZeroU16,
        sync::{
            Arc,
            atomic::{AtomicUsize, Ordering},
        },
        time::{Duration, Instant},
    };

    use cdp_loadgen_payload::{EventType, IdentityPool, Profile, ProfileEvent};
    use http::Uri;
    use rand::{SeedableRng, rngs::SmallRng};
    use rustc_hash::FxHashSet;
    use warp::{Filter, http::StatusCode};

    use super::{Dispatcher, Error, MAX_RESPONSE_CHARS, Progress, Strategy};

    const TYPES: [EventType; 5] = [
        EventType::Login,
        EventType::Register,
        EventType::UpdateProfile,
        EventType::Purchase,
        EventType::ViewProduct,
    ];

    fn events(total: usize) -> Vec<ProfileEvent> {
        let mut rng = SmallRng::seed_from_u64(19_690_716);
        let pool = IdentityPool::generate(
            std::num::NonZeroU32::new(7).expect("non-zero"),
            &mut rng,
        );
        let profile = Profile::new(pool);
        (1..=total)
            .map(|index| {
                let mut event = profile.generate(index, &mut rng);
                event.kind = TYPES[index % TYPES.len()];
                event
            })
            .collect()
    }

    /// Serve an ingestion endpoint whose answer depends on the event type.
    fn spawn_ingest() -> Uri {
        let route = warp::post()
            .and(warp::path!("v1" / "profiles" / "track"))
            .and(warp::header::<String>("x-api-key"))
            .and(warp::body::json())
            .map(|key: String, event: serde_json::Value| {
                if key != "secret" {
                    return warp::reply::with_status("bad key".to_string(), StatusCode::UNAUTHORIZED);
                }
                match event["type"].as_str() {
                    Some("login") => warp::reply::with_status(String::new(), StatusCode::OK),
                    Some("register") => warp::reply::with_status(String::new(), StatusCode::CREATED),
                    Some("update_profile") => {
                        warp::reply::with_status(String::new(), StatusCode::ACCEPTED)
                    }
                    Some("purchase") => warp::reply::with_status(
                        "x".repeat(500),
                        StatusCode::INTERNAL_SERVER_ERROR,
                    ),
                    _ => warp::reply::with_status("missing".to_string(), StatusCode::NOT_FOUND),
                }
            });

        let (addr, serve_fut) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
        tokio::spawn(serve_fut);
        format!("http://{addr}/v1/profiles/track")
            .parse()
            .expect("valid uri")
    }

    fn dispatcher(uri: Uri, api_key: &str, timeout: Duration) -> Dispatcher {
        Dispatcher::with_target(uri, api_key, timeout, NonZeroU16::new(4).expect("non-zero"))
            .expect("valid dispatcher")
    }

    #[tokio::test]
    async fn success_only_for_200_and_201() {
        let dispatcher = dispatcher(spawn_ingest(), "secret", Duration::from_secs(5));
        let events = events(10);

        let outcomes = dispatcher
            .dispatch(
                &events,
                Strategy::Sequential {
                    delay: Duration::from_millis(1),
                },
                false,
            )
            .await;

        assert_eq!(outcomes.len(), events.len());
        for outcome in &outcomes {
            assert_eq!(
                outcome.success,
                matches!(outcome.status_code, 200 | 201),
                "{outcome:?}"
            );
            match outcome.kind {
                EventType::Login => assert_eq!(outcome.status_code, 200),
                EventType::Register => assert_eq!(outcome.status_code, 201),
                EventType::UpdateProfile => {
                    assert_eq!(outcome.status_code, 202);
                    assert!(!outcome.success);
                    assert_eq!(outcome.response, None);
                }
                EventType::Purchase => {
                    assert_eq!(outcome.status_code, 500);
                    let body = outcome.response.as_deref().expect("body retained");
                    assert_eq!(body.chars().count(), MAX_RESPONSE_CHARS);
                }
                EventType::ViewProduct => {
                    assert_eq!(outcome.status_code, 404);
                    assert_eq!(outcome.response.as_deref(), Some("missing"));
                }
            }
            assert_eq!(outcome.error, None);
        }
    }

    #[tokio::test]
    async fn sequential_preserves_submission_order() {
        let dispatcher = dispatcher(spawn_ingest(), "secret", Duration::from_secs(5));
        let events = events(12);

        let outcomes = dispatcher
            .dispatch(
                &events,
                Strategy::Sequential {
                    delay: Duration::from_millis(1),
                },
                true,
            )
            .await;

        let indices: Vec<usize> = outcomes.iter().map(|o| o.index).collect();
        assert_eq!(indices, (1..=12).collect::<Vec<_>>());
        for (outcome, event) in outcomes.iter().zip(&events) {
            assert_eq!(outcome.idcard, event.traits.idcard);
            assert_eq!(outcome.kind, event.kind);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_yields_one_outcome_per_event() {
        let dispatcher = dispatcher(spawn_ingest(), "secret", Duration::from_secs(5));
        let events = events(64);

        let outcomes = dispatcher
            .dispatch(
                &events,
                Strategy::Concurrent {
                    workers: NonZeroU16::new(8).expect("non-zero"),
                },
                true,
            )
            .await;

        assert_eq!(outcomes.len(), events.len());
        let sent: FxHashSet<(usize, String, EventType)> = outcomes
            .iter()
            .map(|o| (o.index, o.idcard.clone(), o.kind))
            .collect();
        let expected: FxHashSet<(usize, String, EventType)> = events
            .iter()
            .enumerate()
            .map(|(offset, e)| (offset + 1, e.traits.idcard.clone(), e.kind))
            .collect();
        assert_eq!(sent, expected);
    }

    #[tokio::test]
    async fn api_key_is_sent() {
        let dispatcher = dispatcher(spawn_ingest(), "wrong", Duration::from_secs(5));
        let events = events(1);

        let outcome = dispatcher.send_one(&events[0], 1).await;
        assert_eq!(outcome.status_code, 401);
        assert!(!outcome.success);
        assert_eq!(outcome.response.as_deref(), Some("bad key"));
    }

    #[tokio::test]
    async fn unreachable_target_is_recorded() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("failed to bind");
        let addr = listener.local_addr().expect("no local addr");
        drop(listener);

        let uri: Uri = format!("http://{addr}/v1/profiles/track")
            .parse()
            .expect("valid uri");
        let dispatcher = dispatcher(uri, "secret", Duration::from_secs(5));
        let events = events(3);

        let mut progress = Progress::new(events.len(), false);
        let outcomes = dispatcher
            .send_concurrent(&events, NonZeroU16::new(2).expect("non-zero"), &mut progress)
            .await;

        assert_eq!(progress.completed(), 3);
        assert_eq!(outcomes.len(), 3);
        for outcome in outcomes {
            assert_eq!(outcome.status_code, 0);
            assert!(!outcome.success);
            assert!(outcome.error.is_some());
            assert_eq!(outcome.detail(), outcome.error.as_deref().unwrap_or_default());
        }
    }

    #[tokio::test]
    async fn slow_target_times_out() {
        let route = warp::post().and_then(|| async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Ok::<_, Infallible>(warp::reply())
        });
        let (addr, serve_fut) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
        tokio::spawn(serve_fut);

        let uri: Uri = format!("http://{addr}/").parse().expect("valid uri");
        let dispatcher = dispatcher(uri, "secret", Duration::from_millis(100));
        let events = events(1);

        let outcome = dispatcher.send_one(&events[0], 1).await;
        assert_eq!(outcome.status_code, 0);
        assert!(!outcome.success);
        let error = outcome.error.expect("timeout recorded");
        assert!(error.contains("timed out"), "{error}");
    }

    #[test]
    fn invalid_api_key_is_rejected() {
        let res = Dispatcher::with_target(
            Uri::from_static("http://localhost/"),
            "bad\nkey",
            Duration::from_secs(1),
            NonZeroU16::new(1).expect("non-zero"),
        );
        assert!(res.is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_respects_worker_limit() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let route = {
            let in_flight = Arc::clone(&in_flight);
            let peak = Arc::clone(&peak);
            warp::post().and_then(move || {
                let in_flight = Arc::clone(&in_flight);
                let peak = Arc::clone(&peak);
                async move {
                    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                    Ok::<_, Infallible>(warp::reply::with_status(
                        warp::reply(),
                        StatusCode::CREATED,
                    ))
                }
            })
        };
        let (addr, serve_fut) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
        tokio::spawn(serve_fut);

        let uri: Uri = format!("http://{addr}/v1/profiles/track")
            .parse()
            .expect("valid uri");
        let dispatcher = dispatcher(uri, "secret", Duration::from_secs(5));
        let events = events(30);

        let outcomes = dispatcher
            .dispatch(
                &events,
                Strategy::Concurrent {
                    workers: NonZeroU16::new(3).expect("non-zero"),
                },
                false,
            )
            .await;

        assert_eq!(outcomes.len(), 30);
        assert!(outcomes.iter().all(|o| o.success));
        let peak = peak.load(Ordering::SeqCst);
        assert!(peak >= 1);
        assert!(peak <= 3, "{peak} requests were in flight at once");
    }

    #[tokio::test]
    async fn sequential_pauses_after_each_send() {
        let dispatcher = dispatcher(spawn_ingest(), "secret", Duration::from_secs(5));
        let events = events(5);
        let delay = Duration::from_millis(30);

        let start = Instant::now();
        let outcomes = dispatcher
            .dispatch(&events, Strategy::Sequential { delay }, false)
            .await;

        assert_eq!(outcomes.len(), 5);
        assert!(start.elapsed() >= delay * 5);
    }

    #[tokio::test]
    async fn large_error_body_is_cut_short() {
        let route = warp::post().map(|| {
            warp::reply::with_status("é".repeat(1_000_000), StatusCode::SERVICE_UNAVAILABLE)
        });
        let (addr, serve_fut) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
        tokio::spawn(serve_fut);

        let uri: Uri = format!("http://{addr}/").parse().expect("valid uri");
        let dispatcher = dispatcher(uri, "secret", Duration::from_secs(5));
        let events = events(1);

        let outcome = dispatcher.send_one(&events[0], 1).await;
        assert_eq!(outcome.status_code, 503);
        assert_eq!(
            outcome.response.as_deref(),
            Some("é".repeat(MAX_RESPONSE_CHARS).as_str())
        );
    }

    #[test]
    fn only_http_targets_are_accepted() {
        for target in [
            "https://127.0.0.1:8443/v1/profiles/track",
            "ftp://ingest.example/track",
            "/v1/profiles/track",
        ] {
            let res = Dispatcher::with_target(
                Uri::from_static(target),
                "secret",
                Duration::from_secs(1),
                NonZeroU16::new(1).expect("non-zero"),
            );
            assert!(
                matches!(res, Err(Error::UnsupportedScheme { ref uri }) if uri == target),
                "{target}"
            );
        }
    }

    #[test]
    fn progress_counts_failures() {
        let events = events(3);
        let mut progress = Progress::new(3, true);
        for (offset, status) in [200u16, 0, 500].into_iter().enumerate() {
            let outcome = super::Outcome {
                index: offset + 1,
                status_code: status,
                success: status == 200,
                idcard: events[offset].traits.idcard.clone(),
                kind: events[offset].kind,
                response: None,
                error: None,
            };
            progress.record(&outcome);
        }
        assert_eq!(progress.completed(), 3);
        assert_eq!(progress.failed(), 2);
    }
}
