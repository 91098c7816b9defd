use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use crate::error::{StoreError, StoreResult};

/// Request-scoped deadline threaded through every repository call.
///
/// Created once per inbound request; every store round trip made on that
/// request's behalf is bounded by the same absolute deadline.
#[derive(Clone, Copy, Debug)]
pub struct RequestContext {
    deadline: Instant,
    budget: Duration,
}

impl RequestContext {
    /// A context whose deadline is `budget` from now.
    pub fn with_timeout(budget: Duration) -> Self {
        Self {
            deadline: Instant::now() + budget,
            budget,
        }
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.deadline
    }

    /// Run a store call, failing with [`StoreError::DeadlineExceeded`] if
    /// the deadline passes first.
    pub async fn bound<T, F>(&self, call: F) -> StoreResult<T>
    where
        F: Future<Output = StoreResult<T>>,
    {
        match tokio::time::timeout_at(self.deadline, call).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::DeadlineExceeded {
                budget: self.budget,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn passes_through_fast_calls() {
        let ctx = RequestContext::with_timeout(Duration::from_secs(5));
        let out = ctx.bound(async { Ok::<_, StoreError>(7) }).await.unwrap();
        assert_eq!(out, 7);
        assert!(!ctx.is_expired());
        assert!(ctx.deadline() > Instant::now());
    }

    #[tokio::test]
    async fn passes_through_errors() {
        let ctx = RequestContext::with_timeout(Duration::from_secs(5));
        let err = ctx
            .bound(async { Err::<(), _>(StoreError::Unavailable("down".into())) })
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::Unavailable("down".into()));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_calls_hit_the_deadline() {
        let ctx = RequestContext::with_timeout(Duration::from_millis(50));
        let err = ctx
            .bound(async {
                tokio::time::sleep(Duration::from_secs(10)).await;
                Ok::<_, StoreError>(())
            })
            .await
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::DeadlineExceeded {
                budget: Duration::from_millis(50)
            }
        );
        assert!(ctx.is_expired());
    }
}
