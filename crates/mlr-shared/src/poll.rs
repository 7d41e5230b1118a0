//! Poll-until-ready for content that shows up asynchronously.
//!
//! The host may not have experiences ready when a panel first attaches, so
//! callers retry a probe at a fixed interval up to a ceiling. A `watch`
//! channel carries cancellation; setting it to `true` stops the poll at the
//! next attempt or mid-sleep.

use crate::error::{MlrError, Result};
use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, warn};

/// Receiving side of a cancellation flag.
pub type CancelSignal = watch::Receiver<bool>;

/// Sending side; `cancel()` flips the flag.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        // No receivers left means nobody is polling; nothing to stop.
        let _ = self.tx.send(true);
    }
}

/// New cancellation pair, initially not cancelled.
pub fn cancel_pair() -> (CancelHandle, CancelSignal) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, rx)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub max_retries: u32,
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_retries: 10,
            interval: Duration::from_secs(2),
        }
    }
}

/// Call `probe` until it yields `Some`, at most `config.max_retries` times.
///
/// Probe errors count as a failed attempt. Returns `PollExhausted` after the
/// ceiling and `Cancelled` once the signal turns true.
pub async fn poll_until_ready<T, F, Fut>(
    config: &PollConfig,
    cancel: &mut CancelSignal,
    mut probe: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>>>,
{
    let mut cancel_alive = true;

    for attempt in 1..=config.max_retries {
        if *cancel.borrow() {
            return Err(MlrError::Cancelled);
        }

        match probe().await {
            Ok(Some(value)) => {
                debug!("Content ready after {} attempt(s)", attempt);
                return Ok(value);
            }
            Ok(None) => debug!("Attempt {}/{}: not ready", attempt, config.max_retries),
            Err(e) => warn!("Attempt {}/{} failed: {}", attempt, config.max_retries, e),
        }

        if attempt == config.max_retries {
            break;
        }

        let deadline = Instant::now() + config.interval;
        loop {
            tokio::select! {
                _ = sleep_until(deadline) => break,
                changed = cancel.changed(), if cancel_alive => match changed {
                    Ok(()) => {
                        if *cancel.borrow_and_update() {
                            return Err(MlrError::Cancelled);
                        }
                    }
                    Err(_) => cancel_alive = false,
                },
            }
        }
    }

    Err(MlrError::PollExhausted {
        attempts: config.max_retries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn fast(max_retries: u32) -> PollConfig {
        PollConfig {
            max_retries,
            interval: Duration::from_millis(5),
        }
    }

    #[tokio::test]
    async fn test_ready_on_third_attempt() {
        let calls = Arc::new(AtomicU32::new(0));
        let (_handle, mut signal) = cancel_pair();
        let counter = calls.clone();
        let value = poll_until_ready(&fast(10), &mut signal, move || {
            let counter = counter.clone();
            async move {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                Ok::<_, MlrError>((n >= 3).then_some(n))
            }
        })
        .await
        .unwrap();
        assert_eq!(value, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhausted_after_ceiling() {
        let calls = Arc::new(AtomicU32::new(0));
        let (_handle, mut signal) = cancel_pair();
        let counter = calls.clone();
        let result: Result<()> = poll_until_ready(&fast(4), &mut signal, move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, MlrError>(None)
            }
        })
        .await;
        assert!(matches!(result, Err(MlrError::PollExhausted { attempts: 4 })));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_probe_errors_count_as_attempts() {
        let (_handle, mut signal) = cancel_pair();
        let result: Result<()> = poll_until_ready(&fast(2), &mut signal, || async {
            Err::<Option<()>, _>(MlrError::Source("host unavailable".into()))
        })
        .await;
        assert!(matches!(result, Err(MlrError::PollExhausted { attempts: 2 })));
    }

    #[tokio::test]
    async fn test_cancel_before_start() {
        let (handle, mut signal) = cancel_pair();
        handle.cancel();
        let result: Result<()> =
            poll_until_ready(&fast(3), &mut signal, || async { Ok::<_, MlrError>(None) }).await;
        assert!(matches!(result, Err(MlrError::Cancelled)));
    }

    #[tokio::test]
    async fn test_cancel_during_sleep() {
        let config = PollConfig {
            max_retries: 10,
            interval: Duration::from_secs(30),
        };
        let (handle, mut signal) = cancel_pair();
        let task = tokio::spawn(async move {
            poll_until_ready(&config, &mut signal, || async {
                Ok::<Option<()>, MlrError>(None)
            })
            .await
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
        handle.cancel();
        let result = tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .expect("poll should stop promptly")
            .unwrap();
        assert!(matches!(result, Err(MlrError::Cancelled)));
    }

    #[tokio::test]
    async fn test_dropped_handle_does_not_spin() {
        let (handle, mut signal) = cancel_pair();
        drop(handle);
        let result: Result<()> =
            poll_until_ready(&fast(3), &mut signal, || async { Ok::<_, MlrError>(None) }).await;
        assert!(matches!(result, Err(MlrError::PollExhausted { attempts: 3 })));
    }
}
