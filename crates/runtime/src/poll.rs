//! Input poll error budget.
//!
//! A single failed poll or read on the terminal is logged and treated as an
//! idle iteration. Only a run of consecutive failures ends the foreground
//! loop.

use anyhow::Result;
use log::warn;

use crate::input::InputEvent;

/// Consecutive failed polls tolerated before giving up.
pub const MAX_POLL_FAILURES: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollFailures {
    consecutive: u32,
    limit: u32,
}

impl Default for PollFailures {
    fn default() -> Self {
        Self::new(MAX_POLL_FAILURES)
    }
}

impl PollFailures {
    pub fn new(limit: u32) -> Self {
        Self { consecutive: 0, limit }
    }

    pub fn consecutive(&self) -> u32 {
        self.consecutive
    }

    /// Pass successful events through and turn tolerated errors into `Idle`.
    pub fn absorb(&mut self, polled: Result<InputEvent>) -> Result<InputEvent> {
        match polled {
            Ok(event) => {
                self.consecutive = 0;
                Ok(event)
            }
            Err(e) => {
                self.consecutive += 1;
                if self.consecutive >= self.limit {
                    return Err(e.context(format!(
                        "input poll failed {} times in a row",
                        self.consecutive
                    )));
                }
                warn!("input poll failed ({}/{}): {:#}", self.consecutive, self.limit, e);
                Ok(InputEvent::Idle)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn transient_error_reads_as_idle() {
        let mut failures = PollFailures::new(3);
        let event = failures.absorb(Err(anyhow!("interrupted"))).unwrap();
        assert_eq!(event, InputEvent::Idle);
        assert_eq!(failures.consecutive(), 1);
    }

    #[test]
    fn success_resets_the_run() {
        let mut failures = PollFailures::new(3);
        failures.absorb(Err(anyhow!("interrupted"))).unwrap();
        failures.absorb(Err(anyhow!("interrupted"))).unwrap();
        assert_eq!(failures.absorb(Ok(InputEvent::Quit)).unwrap(), InputEvent::Quit);
        assert_eq!(failures.consecutive(), 0);
        assert!(failures.absorb(Err(anyhow!("interrupted"))).is_ok());
    }

    #[test]
    fn limit_consecutive_errors_give_up() {
        let mut failures = PollFailures::new(3);
        assert!(failures.absorb(Err(anyhow!("tty gone"))).is_ok());
        assert!(failures.absorb(Err(anyhow!("tty gone"))).is_ok());
        let err = failures.absorb(Err(anyhow!("tty gone"))).unwrap_err();
        assert!(format!("{:#}", err).contains("3 times"));
        assert!(format!("{:#}", err).contains("tty gone"));
    }

    #[test]
    fn default_budget_tolerates_a_burst() {
        let mut failures = PollFailures::default();
        for _ in 1..MAX_POLL_FAILURES {
            assert!(failures.absorb(Err(anyhow!("eintr"))).is_ok());
        }
        assert!(failures.absorb(Err(anyhow!("eintr"))).is_err());
    }
}
