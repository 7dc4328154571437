//! Per-client sliding-window rate limiter

use dashmap::DashMap;
use std::net::IpAddr;
use std::time::{Duration, Instant};

/// Returned when a client has exhausted its request budget
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("rate limit exceeded: max {max_requests} requests per {window_secs} seconds")]
pub struct RateLimitError {
    pub max_requests: usize,
    pub window_secs: u64,
}

/// Sliding-window admission check keyed by client IP
///
/// Each admitted request leaves a timestamp; a request is rejected when the
/// client already has `max_requests` timestamps inside the window.
pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    history: DashMap<IpAddr, Vec<Instant>>,
}

impl RateLimiter {
    /// Create a limiter allowing `max_requests` per `window`
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            history: DashMap::new(),
        }
    }

    /// Admit or reject a request from `client`
    pub fn check(&self, client: IpAddr) -> Result<(), RateLimitError> {
        let now = Instant::now();
        let mut timestamps = self.history.entry(client).or_default();

        timestamps.retain(|t| now.duration_since(*t) < self.window);

        if timestamps.len() >= self.max_requests {
            return Err(RateLimitError {
                max_requests: self.max_requests,
                window_secs: self.window.as_secs(),
            });
        }

        timestamps.push(now);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn client(last: u8) -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(127, 0, 0, last))
    }

    #[test]
    fn test_admits_up_to_limit() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));

        assert!(limiter.check(client(1)).is_ok());
        assert!(limiter.check(client(1)).is_ok());
        assert!(limiter.check(client(1)).is_ok());
        assert!(limiter.check(client(1)).is_err());
    }

    #[test]
    fn test_clients_are_independent() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));

        assert!(limiter.check(client(1)).is_ok());
        assert!(limiter.check(client(2)).is_ok());
        assert!(limiter.check(client(1)).is_err());
    }

    #[test]
    fn test_window_slides() {
        let limiter = RateLimiter::new(2, Duration::from_millis(40));

        assert!(limiter.check(client(1)).is_ok());
        assert!(limiter.check(client(1)).is_ok());
        assert!(limiter.check(client(1)).is_err());

        std::thread::sleep(Duration::from_millis(60));
        assert!(limiter.check(client(1)).is_ok());
    }

    #[test]
    fn test_error_message() {
        let limiter = RateLimiter::new(0, Duration::from_secs(10));
        let err = limiter.check(client(1)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "rate limit exceeded: max 0 requests per 10 seconds"
        );
    }
}
