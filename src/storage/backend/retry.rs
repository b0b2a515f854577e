//! 持久化写入重试模块
//!
//! Transient I/O failures while flushing the link document are retried with
//! exponential backoff. Each attempt receives a deadline and must honour it
//! itself: an attempt is always awaited to completion, so two attempts of
//! the same operation never run at the same time.

use std::future::Future;
use std::io;
use std::time::{Duration, Instant};

use tokio::time::sleep;
use tracing::{debug, warn};

/// 判断 I/O 错误是否可重试
pub fn is_retryable_error(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
    )
}

/// 重试配置
#[derive(Clone, Copy, Debug)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 50,
            max_delay_ms: 1000,
        }
    }
}

/// 计算指数退避延迟（带抖动）
fn calculate_backoff(attempt: u32, base_ms: u64, max_ms: u64) -> u64 {
    let exp_delay = base_ms.saturating_mul(2u64.saturating_pow(attempt.saturating_sub(1)));
    let capped = exp_delay.min(max_ms);
    // 添加 0-25% 的随机抖动，避免惊群效应
    let jitter = rand::random_range(0..=capped / 4);
    capped.saturating_add(jitter)
}

/// 构造超时错误
pub fn deadline_exceeded(operation_name: &str, timeout_ms: u64) -> io::Error {
    io::Error::new(
        io::ErrorKind::TimedOut,
        format!("Operation '{}' timed out after {}ms", operation_name, timeout_ms),
    )
}

/// 带截止时间的重试执行器
///
/// `operation` receives the deadline of the current attempt and reports
/// `TimedOut` when it gives up at that deadline. Timeouts are retryable;
/// the error of the last attempt is returned once retries are exhausted.
pub async fn with_retry_timeout<T, F, Fut>(
    operation_name: &str,
    config: RetryConfig,
    timeout_ms: u64,
    mut operation: F,
) -> io::Result<T>
where
    F: FnMut(Instant) -> Fut,
    Fut: Future<Output = io::Result<T>>,
{
    let mut attempt = 0;
    loop {
        let deadline = Instant::now() + Duration::from_millis(timeout_ms);

        let err = match operation(deadline).await {
            Ok(value) => {
                if attempt > 0 {
                    debug!(
                        "Operation '{}' succeeded after {} retries",
                        operation_name, attempt
                    );
                }
                return Ok(value);
            }
            Err(e) if is_retryable_error(&e) => e,
            Err(e) => {
                debug!(
                    "Operation '{}' failed with non-retryable error: {}",
                    operation_name, e
                );
                return Err(e);
            }
        };

        if attempt >= config.max_retries {
            warn!(
                "Operation '{}' failed, retries exhausted: {}",
                operation_name, err
            );
            return Err(err);
        }

        attempt += 1;
        let delay = calculate_backoff(attempt, config.base_delay_ms, config.max_delay_ms);
        warn!(
            "Operation '{}' failed (attempt {}/{}): {}; retrying in {} ms",
            operation_name,
            attempt,
            config.max_retries + 1,
            err,
            delay
        );
        sleep(Duration::from_millis(delay)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_config(max_retries: u32) -> RetryConfig {
        RetryConfig {
            max_retries,
            base_delay_ms: 1,
            max_delay_ms: 5,
        }
    }

    #[test]
    fn test_is_retryable_error() {
        assert!(is_retryable_error(&io::Error::from(io::ErrorKind::Interrupted)));
        assert!(is_retryable_error(&io::Error::from(io::ErrorKind::TimedOut)));
        assert!(!is_retryable_error(&io::Error::from(
            io::ErrorKind::PermissionDenied
        )));
        assert!(!is_retryable_error(&io::Error::from(io::ErrorKind::NotFound)));
    }

    #[test]
    fn test_calculate_backoff_exponential() {
        let delay1 = calculate_backoff(1, 100, 2000);
        assert!((100..=125).contains(&delay1));

        let delay2 = calculate_backoff(2, 100, 2000);
        assert!((200..=250).contains(&delay2));

        let delay3 = calculate_backoff(3, 100, 2000);
        assert!((400..=500).contains(&delay3));
    }

    #[test]
    fn test_calculate_backoff_capped_at_max() {
        let delay = calculate_backoff(10, 100, 2000);
        assert!((2000..=2500).contains(&delay));
    }

    #[tokio::test]
    async fn test_success_first_try() {
        let calls = AtomicU32::new(0);
        let result = with_retry_timeout("test_op", fast_config(3), 1000, |_deadline| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, io::Error>(42) }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_success_after_retries() {
        let calls = AtomicU32::new(0);
        let result = with_retry_timeout("test_op", fast_config(3), 1000, |_deadline| {
            let count = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if count < 2 {
                    Err(io::Error::from(io::ErrorKind::Interrupted))
                } else {
                    Ok(7)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_retryable_error_no_retry() {
        let calls = AtomicU32::new(0);
        let result = with_retry_timeout("test_op", fast_config(3), 1000, |_deadline| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<i32, _>(io::Error::from(io::ErrorKind::PermissionDenied)) }
        })
        .await;

        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::PermissionDenied);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_timeout_exhausts_retries() {
        let calls = AtomicU32::new(0);
        let result = with_retry_timeout("slow_op", fast_config(1), 10, |deadline| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                sleep(Duration::from_millis(30)).await;
                if Instant::now() >= deadline {
                    return Err(deadline_exceeded("slow_op", 10));
                }
                Ok(())
            }
        })
        .await;

        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::TimedOut);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_attempts_never_overlap() {
        let running = std::sync::Arc::new(AtomicU32::new(0));
        let overlapped = std::sync::Arc::new(AtomicU32::new(0));
        let result = with_retry_timeout("overlap_op", fast_config(3), 5, |deadline| {
            let running = running.clone();
            let overlapped = overlapped.clone();
            async move {
                if running.fetch_add(1, Ordering::SeqCst) > 0 {
                    overlapped.fetch_add(1, Ordering::SeqCst);
                }
                sleep(Duration::from_millis(20)).await;
                running.fetch_sub(1, Ordering::SeqCst);
                if Instant::now() >= deadline {
                    return Err::<(), _>(deadline_exceeded("overlap_op", 5));
                }
                Ok(())
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(overlapped.load(Ordering::SeqCst), 0);
    }
}
