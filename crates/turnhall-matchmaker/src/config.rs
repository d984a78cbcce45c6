//! Matchmaker tuning knobs.

use std::time::Duration;

/// Configuration for the matchmaking queue and pairing loop.
#[derive(Debug, Clone)]
pub struct MatchmakerConfig {
    /// How often the pairing pass runs.
    pub tick_interval: Duration,
    /// Cap on the wait-time bonus subtracted from a pairing score, in
    /// seconds. Waiting longer than this stops improving the score.
    pub wait_bonus_cap_secs: i64,
    /// After waiting this long, a request matches the first available
    /// partner regardless of rating or desired-rating filter.
    pub loosen_after: Duration,
    /// Half-width of the band a candidate's rating must fall in when
    /// the seeker set a desired rating. Ignored once loosened.
    pub desired_rating_window: i32,
}

impl Default for MatchmakerConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(5),
            wait_bonus_cap_secs: 300,
            loosen_after: Duration::from_secs(120),
            desired_rating_window: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = MatchmakerConfig::default();
        assert_eq!(config.tick_interval, Duration::from_secs(5));
        assert_eq!(config.wait_bonus_cap_secs, 300);
        assert_eq!(config.loosen_after, Duration::from_secs(120));
    }
}
