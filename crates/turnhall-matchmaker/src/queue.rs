//! Match requests and the pure pairing pass.
//!
//! `plan_pairs` is deliberately free of I/O and clocks (the caller
//! passes `now`), so the scoring rules are unit-testable without a
//! runtime or a live orchestrator.

use chrono::{DateTime, Utc};
use turnhall_protocol::{GameType, PlayerId};

use crate::MatchmakerConfig;

/// One player waiting to be matched.
///
/// Keyed by player id in the queue; re-enqueuing replaces the prior
/// request. Removed on match, withdrawal, or disconnect.
#[derive(Debug, Clone)]
pub struct MatchRequest {
    pub player_id: PlayerId,
    pub game_type: GameType,
    /// Rating snapshot taken at enqueue time.
    pub rating: i32,
    /// Optional band the partner's rating must fall in (until the
    /// request is loosened by waiting).
    pub desired_rating: Option<i32>,
    pub enqueued_at: DateTime<Utc>,
}

impl MatchRequest {
    fn seconds_waited(&self, now: DateTime<Utc>) -> i64 {
        (now - self.enqueued_at).num_seconds().max(0)
    }

    /// Whether `other` passes this request's desired-rating filter.
    fn accepts(&self, other: &MatchRequest, window: i32) -> bool {
        match self.desired_rating {
            Some(desired) => (other.rating - desired).abs() <= window,
            None => true,
        }
    }
}

/// Pairing score: lower is better. The wait-time bonus shrinks the
/// score the longer the seeker has waited (capped), so long-waiting
/// players out-compete fresh ones for the same candidate; scores can
/// go negative after long waits.
fn score(seeker: &MatchRequest, candidate: &MatchRequest, now: DateTime<Utc>, cap: i64) -> i64 {
    let diff = i64::from((seeker.rating - candidate.rating).abs());
    diff - seeker.seconds_waited(now).min(cap)
}

/// Plans the pairs for one game-type bucket.
///
/// `bucket` must be sorted by enqueue time ascending. Each request is
/// considered in that order; for each, the best-scoring later request
/// that passes both desired-rating filters wins, ties going to the
/// earlier-enqueued candidate. A request that has waited past the
/// loosening threshold and finds no filtered candidate takes the
/// first free request in the bucket regardless of rating.
pub(crate) fn plan_pairs(
    bucket: &[MatchRequest],
    now: DateTime<Utc>,
    config: &MatchmakerConfig,
) -> Vec<(PlayerId, PlayerId)> {
    let loosen_after = chrono::Duration::from_std(config.loosen_after)
        .unwrap_or_else(|_| chrono::Duration::seconds(120));
    let mut taken = vec![false; bucket.len()];
    let mut pairs = Vec::new();

    for i in 0..bucket.len() {
        if taken[i] {
            continue;
        }
        let seeker = &bucket[i];

        let mut best: Option<(i64, usize)> = None;
        for (j, candidate) in bucket.iter().enumerate().skip(i + 1) {
            if taken[j]
                || !seeker.accepts(candidate, config.desired_rating_window)
                || !candidate.accepts(seeker, config.desired_rating_window)
            {
                continue;
            }
            let s = score(seeker, candidate, now, config.wait_bonus_cap_secs);
            // Strict < keeps the earlier-enqueued candidate on ties.
            if best.is_none_or(|(b, _)| s < b) {
                best = Some((s, j));
            }
        }

        let chosen = match best {
            Some((_, j)) => Some(j),
            None if now - seeker.enqueued_at >= loosen_after => {
                // Loosened: anyone still free, filters ignored.
                (0..bucket.len()).find(|&j| j != i && !taken[j])
            }
            None => None,
        };

        if let Some(j) = chosen {
            taken[i] = true;
            taken[j] = true;
            pairs.push((seeker.player_id, bucket[j].player_id));
        }
    }

    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(rating: i32, waited_secs: i64) -> MatchRequest {
        MatchRequest {
            player_id: PlayerId::new(),
            game_type: GameType::from("x"),
            rating,
            desired_rating: None,
            enqueued_at: Utc::now() - chrono::Duration::seconds(waited_secs),
        }
    }

    fn config() -> MatchmakerConfig {
        MatchmakerConfig::default()
    }

    #[test]
    fn test_plan_pairs_two_fresh_requests_match() {
        let bucket = [request(1000, 0), request(1050, 0)];
        let pairs = plan_pairs(&bucket, Utc::now(), &config());
        assert_eq!(pairs, vec![(bucket[0].player_id, bucket[1].player_id)]);
    }

    #[test]
    fn test_plan_pairs_prefers_closest_rating() {
        let bucket = [request(1000, 0), request(1500, 0), request(1010, 0)];
        let pairs = plan_pairs(&bucket, Utc::now(), &config());
        assert_eq!(pairs, vec![(bucket[0].player_id, bucket[2].player_id)]);
    }

    #[test]
    fn test_plan_pairs_tie_goes_to_earlier_candidate() {
        // Both candidates sit 50 away from the seeker.
        let bucket = [request(1000, 0), request(1050, 0), request(950, 0)];
        let pairs = plan_pairs(&bucket, Utc::now(), &config());
        assert_eq!(pairs[0], (bucket[0].player_id, bucket[1].player_id));
    }

    #[test]
    fn test_plan_pairs_leftover_request_stays_unmatched() {
        let bucket = [request(1000, 0), request(1000, 0), request(1000, 0)];
        let pairs = plan_pairs(&bucket, Utc::now(), &config());
        assert_eq!(pairs.len(), 1);
    }

    #[test]
    fn test_plan_pairs_empty_and_single_buckets_produce_nothing() {
        assert!(plan_pairs(&[], Utc::now(), &config()).is_empty());
        assert!(plan_pairs(&[request(1000, 500)], Utc::now(), &config()).is_empty());
    }

    #[test]
    fn test_plan_pairs_desired_rating_filter_blocks_far_candidates() {
        let mut seeker = request(1000, 0);
        seeker.desired_rating = Some(2000);
        let bucket = [seeker, request(1000, 0)];
        assert!(plan_pairs(&bucket, Utc::now(), &config()).is_empty());
    }

    #[test]
    fn test_plan_pairs_filter_applies_in_both_directions() {
        let picky = request(1000, 0);
        let mut candidate = request(1000, 0);
        candidate.desired_rating = Some(2000); // rejects the seeker
        let bucket = [picky, candidate];
        assert!(plan_pairs(&bucket, Utc::now(), &config()).is_empty());
    }

    #[test]
    fn test_plan_pairs_loosens_after_waiting_threshold() {
        let mut seeker = request(1000, 130); // past the 120 s threshold
        seeker.desired_rating = Some(2000);
        let bucket = [seeker, request(1000, 0)];
        let pairs = plan_pairs(&bucket, Utc::now(), &config());
        assert_eq!(pairs, vec![(bucket[0].player_id, bucket[1].player_id)]);
    }

    #[test]
    fn test_plan_pairs_wait_bonus_lets_long_waiter_outscore() {
        // The long-waiting seeker at index 0 claims the 1200-rated
        // candidate even though the rating gap is wide; its wait bonus
        // drives the score below zero.
        let bucket = [request(1000, 250), request(1200, 0)];
        let pairs = plan_pairs(&bucket, Utc::now(), &config());
        assert_eq!(pairs.len(), 1);
    }
}
