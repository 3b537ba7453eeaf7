use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Outcome of a single admission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Admitted,
    Rejected,
}

impl Admission {
    pub fn is_admitted(self) -> bool {
        matches!(self, Admission::Admitted)
    }
}

/// Per-identity sliding-window rate limiter.
///
/// Keeps the timestamps of admitted requests within the trailing window
/// for each identity. A check prunes expired timestamps, rejects when
/// the window is full, and only records the attempt when it is admitted,
/// so rejected attempts never consume quota.
pub struct RateLimiter {
    // identity -> admitted-request timestamps inside the window
    windows: DashMap<u64, Vec<Instant>>,
    limit: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            windows: DashMap::new(),
            limit,
            window,
        }
    }

    /// Decide whether a request from `identity` is admitted right now.
    pub fn check(&self, identity: u64) -> Admission {
        self.check_at(identity, Instant::now())
    }

    /// Same as [`check`](Self::check) with an explicit clock reading.
    ///
    /// The entry guard holds the map's per-key lock for the whole
    /// read-modify-write, so concurrent checks for the same identity
    /// serialize and cannot admit past the limit. `now` must come from
    /// a single non-decreasing clock per identity.
    pub fn check_at(&self, identity: u64, now: Instant) -> Admission {
        if self.limit == 0 {
            return Admission::Rejected;
        }

        let mut entry = self.windows.entry(identity).or_default();
        entry.retain(|&t| now.duration_since(t) < self.window);

        if entry.len() >= self.limit as usize {
            return Admission::Rejected;
        }

        entry.push(now);
        Admission::Admitted
    }

    /// Drop identities whose windows hold no live timestamps.
    ///
    /// Windows are created on first sight and otherwise kept for the
    /// process lifetime; a periodic sweep keeps the map from growing
    /// with every identity ever seen.
    pub fn sweep(&self) {
        let now = Instant::now();
        self.windows
            .retain(|_, window| window.iter().any(|&t| now.duration_since(t) < self.window));
    }

    /// Number of identities currently holding a window.
    pub fn tracked_identities(&self) -> usize {
        self.windows.len()
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}
