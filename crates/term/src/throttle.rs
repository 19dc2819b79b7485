/// Rate limiter for panel refreshes.
///
/// The engine ticks far more often than a human can read a status line, so
/// detail changes are coalesced while phase changes go through at once.
#[derive(Debug, Clone)]
pub struct RenderThrottle {
    min_interval_ms: u64,
    last_render_ms: u64,
    last_key: u64,
    last_fingerprint: u64,
    has_rendered: bool,
}

impl RenderThrottle {
    pub fn new(min_interval_ms: u64) -> Self {
        Self {
            min_interval_ms,
            last_render_ms: 0,
            last_key: 0,
            last_fingerprint: 0,
            has_rendered: false,
        }
    }

    /// Forget history so the next call renders.
    pub fn invalidate(&mut self) {
        self.has_rendered = false;
    }

    /// Decide whether to render a new frame.
    ///
    /// - First call, or `key` changed: render immediately.
    /// - `fingerprint` changed: render at most once per `min_interval_ms`.
    /// - Nothing changed: never render.
    pub fn should_render(&mut self, now_ms: u64, key: u64, fingerprint: u64) -> bool {
        if !self.has_rendered || key != self.last_key {
            self.has_rendered = true;
            self.last_render_ms = now_ms;
            self.last_key = key;
            self.last_fingerprint = fingerprint;
            return true;
        }

        if fingerprint == self.last_fingerprint {
            return false;
        }

        if now_ms.saturating_sub(self.last_render_ms) >= self.min_interval_ms {
            self.last_render_ms = now_ms;
            self.last_fingerprint = fingerprint;
            return true;
        }

        false
    }
}
