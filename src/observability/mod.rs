//! Request logging and metrics collection.
//!
//! A bounded in-memory log with one-minute rolling counters, owned by the
//! application state rather than a module-level global so tests get a
//! fresh instance per server.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Instant;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::AppState;

/// A single request log entry.
#[derive(Debug, Clone, Serialize)]
pub struct RequestLog {
    pub timestamp: DateTime<Utc>,
    pub method: String,
    pub path: String,
    pub status_code: u16,
    pub response_time_ms: f64,
}

/// Metrics over the current one-minute window.
#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub request_count_1min: u64,
    pub error_count_1min: u64,
    pub error_rate_1min_percent: f64,
    pub avg_response_time_ms: f64,
    pub total_logged: usize,
}

#[derive(Debug)]
struct LoggerInner {
    logs: VecDeque<RequestLog>,
    request_count_1min: u64,
    error_count_1min: u64,
    total_response_time_1min: f64,
    last_minute_reset: DateTime<Utc>,
}

/// Request logger with a circular buffer and minute-window counters.
#[derive(Debug)]
pub struct RequestLogger {
    capacity: usize,
    inner: Mutex<LoggerInner>,
}

impl RequestLogger {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: Mutex::new(LoggerInner {
                logs: VecDeque::with_capacity(capacity),
                request_count_1min: 0,
                error_count_1min: 0,
                total_response_time_1min: 0.0,
                last_minute_reset: Utc::now(),
            }),
        }
    }

    /// Drop all buffered logs and counters.
    pub fn reset(&self) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.logs.clear();
        inner.request_count_1min = 0;
        inner.error_count_1min = 0;
        inner.total_response_time_1min = 0.0;
        inner.last_minute_reset = Utc::now();
    }

    /// Record one completed request.
    pub fn log_request(&self, method: &str, path: &str, status_code: u16, response_time_ms: f64) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        maybe_reset_minute(&mut inner);

        if inner.logs.len() == self.capacity {
            inner.logs.pop_front();
        }
        inner.logs.push_back(RequestLog {
            timestamp: Utc::now(),
            method: method.to_string(),
            path: path.to_string(),
            status_code,
            response_time_ms,
        });

        inner.request_count_1min += 1;
        inner.total_response_time_1min += response_time_ms;
        if status_code >= 400 {
            inner.error_count_1min += 1;
        }
    }

    /// Most recent entries first, with optional level and path filters.
    /// Level `error` keeps 5xx, `warning` keeps anything 4xx and up.
    pub fn get_logs(&self, limit: usize, level: Option<&str>, path: Option<&str>) -> Vec<RequestLog> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        maybe_reset_minute(&mut inner);

        inner
            .logs
            .iter()
            .rev()
            .filter(|log| match level {
                Some("error") => log.status_code >= 500,
                Some("warning") => log.status_code >= 400,
                _ => true,
            })
            .filter(|log| path.map(|p| log.path.contains(p)).unwrap_or(true))
            .take(limit)
            .cloned()
            .collect()
    }

    /// Snapshot of the minute-window counters.
    pub fn get_metrics(&self) -> MetricsSnapshot {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        maybe_reset_minute(&mut inner);

        let (avg, rate) = if inner.request_count_1min > 0 {
            let n = inner.request_count_1min as f64;
            (
                inner.total_response_time_1min / n,
                inner.error_count_1min as f64 / n * 100.0,
            )
        } else {
            (0.0, 0.0)
        };

        MetricsSnapshot {
            request_count_1min: inner.request_count_1min,
            error_count_1min: inner.error_count_1min,
            error_rate_1min_percent: rate,
            avg_response_time_ms: avg,
            total_logged: inner.logs.len(),
        }
    }
}

fn maybe_reset_minute(inner: &mut LoggerInner) {
    let now = Utc::now();
    if (now - inner.last_minute_reset).num_seconds() >= 60 {
        inner.request_count_1min = 0;
        inner.error_count_1min = 0;
        inner.total_response_time_1min = 0.0;
        inner.last_minute_reset = now;
    }
}

/// Middleware that records every request into the state's logger.
pub async fn track_requests(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    state
        .request_log
        .log_request(&method, &path, response.status().as_u16(), elapsed_ms);

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_buffer_evicts_oldest() {
        let logger = RequestLogger::new(3);
        for i in 0..5 {
            logger.log_request("GET", &format!("/r{}", i), 200, 1.0);
        }
        let logs = logger.get_logs(10, None, None);
        assert_eq!(logs.len(), 3);
        // Newest first, oldest two evicted.
        assert_eq!(logs[0].path, "/r4");
        assert_eq!(logs[2].path, "/r2");
    }

    #[test]
    fn test_metrics_counts_errors() {
        let logger = RequestLogger::new(10);
        logger.log_request("GET", "/ok", 200, 10.0);
        logger.log_request("GET", "/missing", 404, 20.0);
        logger.log_request("GET", "/boom", 500, 30.0);

        let metrics = logger.get_metrics();
        assert_eq!(metrics.request_count_1min, 3);
        assert_eq!(metrics.error_count_1min, 2);
        assert!((metrics.avg_response_time_ms - 20.0).abs() < 1e-9);
        assert!((metrics.error_rate_1min_percent - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_log_filters() {
        let logger = RequestLogger::new(10);
        logger.log_request("GET", "/api/feed", 200, 1.0);
        logger.log_request("POST", "/api/feed/view", 404, 1.0);
        logger.log_request("GET", "/api/tags", 500, 1.0);

        assert_eq!(logger.get_logs(10, Some("error"), None).len(), 1);
        assert_eq!(logger.get_logs(10, Some("warning"), None).len(), 2);
        assert_eq!(logger.get_logs(10, None, Some("/feed")).len(), 2);
    }

    #[test]
    fn test_reset_clears_everything() {
        let logger = RequestLogger::new(10);
        logger.log_request("GET", "/r", 200, 1.0);
        logger.reset();
        assert!(logger.get_logs(10, None, None).is_empty());
        assert_eq!(logger.get_metrics().request_count_1min, 0);
    }
}
