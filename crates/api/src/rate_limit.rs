// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Login rate limiting.
//!
//! Failed login attempts are counted per key within a sliding window, and a
//! key that exhausts its attempts is blocked for a fixed period. Two keys
//! are maintained for every login attempt: one for the caller's address
//! (`ip:<addr>`) and one for the claimed account (`user:<personal number>`),
//! so neither a single address nor a single account can be hammered.
//!
//! The limiter is a plain instance guarded by a mutex. The server owns one
//! and shares it across request handlers; tests construct their own.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use time::{Duration, OffsetDateTime};

/// Maximum failed attempts per key within one window.
pub const MAX_ATTEMPTS: u32 = 5;

/// Length of the attempt-counting window.
pub const ATTEMPT_WINDOW: Duration = Duration::minutes(15);

/// How long a key stays blocked after exhausting its attempts.
pub const BLOCK_DURATION: Duration = Duration::minutes(15);

/// Failed-attempt bookkeeping for one key.
#[derive(Debug, Clone)]
struct AttemptRecord {
    /// Number of failures since the window opened.
    count: u32,
    /// When the current window opened.
    window_start: OffsetDateTime,
    /// When the block expires, if the key is blocked.
    blocked_until: Option<OffsetDateTime>,
}

/// In-process login rate limiter.
#[derive(Debug)]
pub struct RateLimiter {
    records: Mutex<HashMap<String, AttemptRecord>>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimiter {
    /// Creates an empty rate limiter.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, AttemptRecord>> {
        // A poisoned mutex only means another thread panicked mid-update;
        // the map itself stays usable.
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Checks whether a key is currently blocked.
    ///
    /// Returns the remaining block time in whole seconds, or `None` when
    /// the key may attempt a login.
    #[must_use]
    pub fn check(&self, key: &str) -> Option<u64> {
        self.check_at(key, OffsetDateTime::now_utc())
    }

    /// Records one failed attempt against a key.
    ///
    /// The fifth failure within a window blocks the key.
    pub fn record_failure(&self, key: &str) {
        self.record_failure_at(key, OffsetDateTime::now_utc());
    }

    /// Returns how many attempts remain for a key in the current window.
    #[must_use]
    pub fn remaining_attempts(&self, key: &str) -> u32 {
        self.remaining_attempts_at(key, OffsetDateTime::now_utc())
    }

    /// Clears all bookkeeping for a key, typically after a successful login.
    pub fn clear(&self, key: &str) {
        self.lock().remove(key);
    }

    /// Evicts records whose window and block have both expired.
    ///
    /// The server runs this periodically so the map does not grow without
    /// bound under scanning traffic.
    pub fn sweep(&self) {
        self.sweep_at(OffsetDateTime::now_utc());
    }

    pub(crate) fn check_at(&self, key: &str, now: OffsetDateTime) -> Option<u64> {
        let records = self.lock();
        let record = records.get(key)?;
        let blocked_until = record.blocked_until?;
        if now < blocked_until {
            let remaining = blocked_until - now;
            Some(remaining.whole_seconds().max(1).unsigned_abs())
        } else {
            None
        }
    }

    pub(crate) fn record_failure_at(&self, key: &str, now: OffsetDateTime) {
        let mut records = self.lock();
        let record = records.entry(key.to_string()).or_insert(AttemptRecord {
            count: 0,
            window_start: now,
            blocked_until: None,
        });

        // An expired window or expired block starts fresh bookkeeping.
        let window_expired = now - record.window_start > ATTEMPT_WINDOW;
        let block_expired = record.blocked_until.is_some_and(|until| now >= until);
        if window_expired || block_expired {
            record.count = 0;
            record.window_start = now;
            record.blocked_until = None;
        }

        record.count += 1;
        if record.count >= MAX_ATTEMPTS {
            record.blocked_until = Some(now + BLOCK_DURATION);
        }
    }

    pub(crate) fn remaining_attempts_at(&self, key: &str, now: OffsetDateTime) -> u32 {
        let records = self.lock();
        match records.get(key) {
            Some(record) if now - record.window_start <= ATTEMPT_WINDOW => {
                MAX_ATTEMPTS.saturating_sub(record.count)
            }
            _ => MAX_ATTEMPTS,
        }
    }

    pub(crate) fn sweep_at(&self, now: OffsetDateTime) {
        self.lock().retain(|_, record| {
            let window_live = now - record.window_start <= ATTEMPT_WINDOW;
            let block_live = record.blocked_until.is_some_and(|until| now < until);
            window_live || block_live
        });
    }
}

/// Builds the address-scoped rate-limit key for a login attempt.
#[must_use]
pub fn ip_key(addr: &str) -> String {
    format!("ip:{addr}")
}

/// Builds the account-scoped rate-limit key for a login attempt.
#[must_use]
pub fn user_key(personal_number: &str) -> String {
    format!("user:{personal_number}")
}
