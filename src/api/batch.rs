//
//  octane-cli
//  api/batch.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Chunked bulk writes with bounded concurrency and retry.
//!
//! Octane limits how many entities a single request may create, so a bulk
//! create is split into chunks of [`MAX_ITEMS_PER_REQUEST`] entities. Each
//! chunk is posted independently:
//!
//! - at most [`MAX_CONCURRENT_CHUNKS`] chunk requests are in flight at once;
//! - a chunk whose request fails with a transient network error (timeout or
//!   connection reset) is retried with exponential backoff;
//! - a chunk that fails for any other reason settles as failed without
//!   cancelling its siblings.
//!
//! Every chunk yields a [`ChunkOutcome`], returned in chunk order inside a
//! [`BulkReport`], so partial failure is visible to the caller instead of only
//! in the logs.
//!
//! # Example
//!
//! ```rust
//! use octane_cli::api::batch::chunk;
//!
//! let chunks = chunk((0..250).collect::<Vec<_>>(), 100);
//! let sizes: Vec<_> = chunks.iter().map(Vec::len).collect();
//! assert_eq!(sizes, vec![100, 100, 50]);
//! ```

use std::future::Future;
use std::time::Duration;

use futures_util::stream::{self, StreamExt};
use serde::{Serialize, Serializer};
use serde_json::Value;
use tracing::{debug, error, warn};

use super::{ApiError, Entity};

/// Maximum number of entities sent in one create request.
pub const MAX_ITEMS_PER_REQUEST: usize = 100;

/// Maximum number of chunk requests in flight at once.
pub const MAX_CONCURRENT_CHUNKS: usize = 3;

/// Splits `items` into contiguous groups of at most `size` elements.
///
/// The last group may be smaller. Order is preserved within and across
/// groups. A `size` of zero is treated as one.
pub fn chunk<T>(items: Vec<T>, size: usize) -> Vec<Vec<T>> {
    let size = size.max(1);
    let mut chunks = Vec::with_capacity(items.len().div_ceil(size));
    let mut iter = items.into_iter().peekable();
    while iter.peek().is_some() {
        chunks.push(iter.by_ref().take(size).collect());
    }
    chunks
}

/// Entities handed to a write operation: a single entity or a list.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    One(Entity),
    Many(Vec<Entity>),
}

impl Payload {
    /// Splits the payload into request-sized chunks.
    ///
    /// A single entity always becomes one chunk holding one entity.
    pub fn into_chunks(self, size: usize) -> Vec<Vec<Entity>> {
        match self {
            Self::One(entity) => vec![vec![entity]],
            Self::Many(entities) => chunk(entities, size),
        }
    }

    pub fn into_vec(self) -> Vec<Entity> {
        match self {
            Self::One(entity) => vec![entity],
            Self::Many(entities) => entities,
        }
    }
}

impl From<Entity> for Payload {
    fn from(entity: Entity) -> Self {
        Self::One(entity)
    }
}

impl From<Vec<Entity>> for Payload {
    fn from(entities: Vec<Entity>) -> Self {
        Self::Many(entities)
    }
}

impl TryFrom<Value> for Payload {
    type Error = ApiError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(entity) => Ok(Self::One(entity)),
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::Object(entity) => Ok(entity),
                    _ => Err(ApiError::UnexpectedShape(
                        "payload arrays must contain only objects".to_string(),
                    )),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Many),
            _ => Err(ApiError::UnexpectedShape(
                "payload must be an object or an array of objects".to_string(),
            )),
        }
    }
}

/// Exponential backoff settings for retried chunk requests.
///
/// The delay before retry `n` (zero based) is
/// `min(min_timeout * factor^n, max_timeout)`.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries allowed after the first attempt.
    pub retries: u32,
    pub min_timeout: Duration,
    pub max_timeout: Duration,
    pub factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 1000,
            min_timeout: Duration::from_secs(1),
            max_timeout: Duration::from_secs(10),
            factor: 2.0,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            retries: 0,
            ..Self::default()
        }
    }

    pub fn delay(&self, retry: u32) -> Duration {
        let exponent = retry.min(64) as i32;
        let secs = self.min_timeout.as_secs_f64() * self.factor.powi(exponent);
        Duration::from_secs_f64(secs.min(self.max_timeout.as_secs_f64()).max(0.0))
    }
}

/// Result of a retried operation plus the number of attempts it took.
#[derive(Debug)]
pub struct Retried<T, E> {
    pub result: Result<T, E>,
    pub attempts: u32,
}

/// Runs `op` until it succeeds, fails with a non-transient error, or the
/// policy's retry budget is spent.
///
/// `op` receives the 1-based attempt number.
pub async fn retry<T, E, F, Fut, P>(policy: &RetryPolicy, mut op: F, is_transient: P) -> Retried<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
    E: std::fmt::Display,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        match op(attempt).await {
            Ok(value) => {
                return Retried {
                    result: Ok(value),
                    attempts: attempt,
                }
            }
            Err(err) => {
                let retries_used = attempt - 1;
                if !is_transient(&err) || retries_used >= policy.retries {
                    return Retried {
                        result: Err(err),
                        attempts: attempt,
                    };
                }

                let delay = policy.delay(retries_used);
                warn!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "Transient failure, retrying"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

/// How a single chunk of a bulk create settled.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChunkOutcome {
    /// The chunk was written; `entities` are the normalized created entities.
    Created {
        index: usize,
        attempts: u32,
        entities: Vec<Entity>,
    },
    /// The chunk could not be written.
    Failed {
        index: usize,
        attempts: u32,
        #[serde(serialize_with = "serialize_error")]
        error: ApiError,
    },
}

impl ChunkOutcome {
    pub fn index(&self) -> usize {
        match self {
            Self::Created { index, .. } | Self::Failed { index, .. } => *index,
        }
    }

    pub fn attempts(&self) -> u32 {
        match self {
            Self::Created { attempts, .. } | Self::Failed { attempts, .. } => *attempts,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created { .. })
    }

    pub fn error(&self) -> Option<&ApiError> {
        match self {
            Self::Failed { error, .. } => Some(error),
            Self::Created { .. } => None,
        }
    }
}

fn serialize_error<S: Serializer>(error: &ApiError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Per-chunk outcomes of a bulk create, in chunk order.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct BulkReport {
    outcomes: Vec<ChunkOutcome>,
}

impl BulkReport {
    pub fn new(outcomes: Vec<ChunkOutcome>) -> Self {
        Self { outcomes }
    }

    pub fn outcomes(&self) -> &[ChunkOutcome] {
        &self.outcomes
    }

    pub fn into_outcomes(self) -> Vec<ChunkOutcome> {
        self.outcomes
    }

    /// `true` when every chunk was created.
    pub fn is_complete(&self) -> bool {
        self.outcomes.iter().all(ChunkOutcome::is_created)
    }

    pub fn failed(&self) -> impl Iterator<Item = &ChunkOutcome> {
        self.outcomes.iter().filter(|o| !o.is_created())
    }

    /// All created entities, in chunk order.
    pub fn created_entities(&self) -> impl Iterator<Item = &Entity> {
        self.outcomes.iter().flat_map(|o| match o {
            ChunkOutcome::Created { entities, .. } => entities.as_slice(),
            ChunkOutcome::Failed { .. } => &[],
        })
    }
}

/// Sends every chunk through `send`, at most `concurrency` at a time.
///
/// Chunks are dispatched in order; completion order is not guaranteed, but
/// the returned report lists outcomes in chunk order. A failed chunk never
/// aborts the others.
pub async fn dispatch_chunks<F, Fut>(
    chunks: Vec<Vec<Entity>>,
    concurrency: usize,
    policy: &RetryPolicy,
    send: F,
) -> BulkReport
where
    F: Fn(Vec<Entity>) -> Fut,
    Fut: Future<Output = Result<Vec<Entity>, ApiError>>,
{
    let send = &send;
    let total = chunks.len();

    let outcomes = stream::iter(chunks.into_iter().enumerate())
        .map(|(index, chunk)| async move {
            debug!(chunk = index, total, size = chunk.len(), "Dispatching chunk");
            let Retried { result, attempts } =
                retry(policy, |_| send(chunk.clone()), ApiError::is_transient).await;

            match result {
                Ok(entities) => ChunkOutcome::Created {
                    index,
                    attempts,
                    entities,
                },
                Err(error) => {
                    error!(chunk = index, attempts, error = %error, "Failed to create chunk");
                    ChunkOutcome::Failed {
                        index,
                        attempts,
                        error,
                    }
                }
            }
        })
        .buffered(concurrency.max(1))
        .collect::<Vec<_>>()
        .await;

    BulkReport::new(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn named(i: usize) -> Entity {
        json!({ "name": format!("e-{i}") }).as_object().cloned().unwrap()
    }

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            retries: 5,
            min_timeout: Duration::from_millis(1),
            max_timeout: Duration::from_millis(2),
            factor: 2.0,
        }
    }

    #[derive(Debug)]
    struct Flaky(bool);

    impl std::fmt::Display for Flaky {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "flaky(transient={})", self.0)
        }
    }

    #[test]
    fn test_chunk_sizes_and_order() {
        let items: Vec<usize> = (0..250).collect();
        let chunks = chunk(items.clone(), 100);
        assert_eq!(chunks.iter().map(Vec::len).collect::<Vec<_>>(), vec![100, 100, 50]);
        assert_eq!(chunks.concat(), items);
    }

    #[test]
    fn test_chunk_edge_cases() {
        assert!(chunk(Vec::<u8>::new(), 100).is_empty());
        assert_eq!(chunk(vec![1, 2, 3], 0), vec![vec![1], vec![2], vec![3]]);
        assert_eq!(chunk(vec![1, 2], 100), vec![vec![1, 2]]);
    }

    #[test]
    fn test_single_entity_is_one_chunk() {
        let chunks = Payload::from(named(0)).into_chunks(MAX_ITEMS_PER_REQUEST);
        assert_eq!(chunks, vec![vec![named(0)]]);
    }

    #[test]
    fn test_payload_try_from_value() {
        assert!(matches!(
            Payload::try_from(json!([{"name": "a"}, {"name": "b"}])),
            Ok(Payload::Many(v)) if v.len() == 2
        ));
        assert!(Payload::try_from(json!("story")).is_err());
        assert!(Payload::try_from(json!([1])).is_err());
    }

    #[test]
    fn test_retry_delays_are_bounded() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay(0), Duration::from_secs(1));
        assert_eq!(policy.delay(1), Duration::from_secs(2));
        assert_eq!(policy.delay(3), Duration::from_secs(8));
        assert_eq!(policy.delay(4), Duration::from_secs(10));
        assert_eq!(policy.delay(999), Duration::from_secs(10));
    }

    #[test]
    fn test_negative_factor_delay_is_zero() {
        let policy = RetryPolicy {
            factor: -2.0,
            ..RetryPolicy::default()
        };
        assert_eq!(policy.delay(1), Duration::ZERO);
        assert_eq!(policy.delay(2), Duration::from_secs(4));
    }

    #[tokio::test]
    async fn test_retry_until_success() {
        let calls = AtomicUsize::new(0);
        let retried = retry(
            &fast_policy(),
            |_| {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(Flaky(true))
                    } else {
                        Ok("done")
                    }
                }
            },
            |e: &Flaky| e.0,
        )
        .await;

        assert_eq!(retried.result.unwrap(), "done");
        assert_eq!(retried.attempts, 3);
    }

    #[tokio::test]
    async fn test_retry_stops_on_permanent_error() {
        let retried: Retried<(), Flaky> =
            retry(&fast_policy(), |_| async { Err(Flaky(false)) }, |e: &Flaky| e.0).await;
        assert!(retried.result.is_err());
        assert_eq!(retried.attempts, 1);
    }

    #[tokio::test]
    async fn test_retry_exhausts_budget() {
        let retried: Retried<(), Flaky> =
            retry(&fast_policy(), |_| async { Err(Flaky(true)) }, |e: &Flaky| e.0).await;
        assert_eq!(retried.attempts, 6);
    }

    #[test]
    fn test_failed_chunk_does_not_abort_siblings() {
        let chunks = chunk((0..250).map(named).collect(), MAX_ITEMS_PER_REQUEST);

        let report = tokio_test::block_on(dispatch_chunks(
            chunks,
            MAX_CONCURRENT_CHUNKS,
            &fast_policy(),
            |chunk| async move {
                if chunk[0]["name"] == "e-100" {
                    Err(ApiError::Http {
                        status: StatusCode::BAD_REQUEST,
                        message: "invalid".to_string(),
                    })
                } else {
                    Ok(chunk)
                }
            },
        ));

        let outcomes = report.outcomes();
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].is_created());
        assert!(!outcomes[1].is_created());
        assert_eq!(outcomes[1].attempts(), 1);
        assert!(outcomes[2].is_created());
        assert_eq!(outcomes.iter().map(ChunkOutcome::index).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert!(!report.is_complete());
        assert_eq!(report.created_entities().count(), 150);
    }

    #[tokio::test]
    async fn test_concurrency_is_capped() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let chunks = chunk((0..1000).map(named).collect(), MAX_ITEMS_PER_REQUEST);

        let report = dispatch_chunks(chunks, MAX_CONCURRENT_CHUNKS, &fast_policy(), |chunk| {
            let in_flight = in_flight.clone();
            let peak = peak.clone();
            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                Ok(chunk)
            }
        })
        .await;

        assert!(report.is_complete());
        assert_eq!(report.outcomes().len(), 10);
        assert!(peak.load(Ordering::SeqCst) <= MAX_CONCURRENT_CHUNKS);
        assert!(peak.load(Ordering::SeqCst) > 1);
    }

    #[test]
    fn test_outcome_serialization() {
        let outcome = ChunkOutcome::Failed {
            index: 1,
            attempts: 1,
            error: ApiError::UnexpectedShape("bad".to_string()),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["error"], "Unexpected response shape: bad");
    }
}
