//! 有界固定间隔重试
//!
//! 依赖冷启动期间的连接策略：固定间隔、固定次数，预算耗尽后升级为致命错误。
//! 策略作为独立的值传入，测试可以注入零间隔变体。

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tracing::warn;

/// 重试策略
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// 最大尝试次数
    pub max_attempts: u32,
    /// 相邻两次尝试之间的固定间隔
    pub delay: Duration,
}

impl RetryPolicy {
    pub const fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// 零间隔策略，测试用
    pub const fn immediate(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::ZERO)
    }
}

/// 尝试次数耗尽，携带最后一次失败原因
#[derive(Debug, Error)]
#[error("gave up after {attempts} attempts: {source}")]
pub struct RetryExhausted<E: std::error::Error> {
    pub attempts: u32,
    #[source]
    pub source: E,
}

/// 按策略重复执行 `op`；成功立即返回，之后不再有任何尝试
pub async fn retry<T, E, F, Fut>(
    policy: &RetryPolicy,
    what: &str,
    mut op: F,
) -> Result<T, RetryExhausted<E>>
where
    E: std::error::Error,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                warn!(
                    attempt,
                    max_attempts = policy.max_attempts,
                    error = %err,
                    "{what} failed"
                );
                if attempt >= policy.max_attempts {
                    return Err(RetryExhausted {
                        attempts: attempt,
                        source: err,
                    });
                }
                tokio::time::sleep(policy.delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    fn unreachable_error() -> io::Error {
        io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused")
    }

    #[tokio::test]
    async fn succeeds_on_kth_attempt_with_no_further_attempts() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::immediate(30);

        let result = retry(&policy, "test operation", || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n < 3 {
                    Err(unreachable_error())
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn first_attempt_success_performs_single_attempt() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::immediate(30);

        let result = retry(&policy, "test operation", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, io::Error>(()) }
        })
        .await;

        assert!(result.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn exhaustion_stops_after_budget_and_reports_attempts() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::immediate(5);

        let result: Result<(), _> = retry(&policy, "test operation", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(unreachable_error()) }
        })
        .await;

        let err = result.unwrap_err();
        assert_eq!(err.attempts, 5);
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }

    /// 第 3 次尝试成功时，总计恰好消耗两个完整间隔
    #[tokio::test(start_paused = true)]
    async fn fixed_interval_schedule_is_cumulative() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(30, Duration::from_secs(10));
        let start = tokio::time::Instant::now();

        let result = retry(&policy, "test operation", || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n < 3 {
                    Err(unreachable_error())
                } else {
                    Ok(())
                }
            }
        })
        .await;

        assert!(result.is_ok());
        assert_eq!(start.elapsed(), Duration::from_secs(20));
    }
}
