//! Frame-to-ball association.
//!
//! The detector hands over every organism centroid it found inside the region of
//! interest. Only one of them can carry the ball: the one nearest to where the
//! ball currently is.

use glam::Vec2;

/// Pick the candidate closest to `anchor`.
///
/// Ties go to the earliest candidate in the slice, so the result only depends on
/// detector order. Returns `None` for an empty slice, which callers treat as a
/// frame without detection.
pub fn closest_candidate(anchor: Vec2, candidates: &[Vec2]) -> Option<Vec2> {
    let mut best: Option<(Vec2, f32)> = None;
    for &candidate in candidates {
        let dist = anchor.distance_squared(candidate);
        match best {
            Some((_, best_dist)) if dist >= best_dist => {}
            _ => best = Some((candidate, dist)),
        }
    }
    best.map(|(candidate, _)| candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_candidates_yield_none() {
        assert_eq!(closest_candidate(Vec2::new(5.0, 5.0), &[]), None);
    }

    #[test]
    fn test_picks_nearest() {
        let anchor = Vec2::new(100.0, 100.0);
        let candidates = [
            Vec2::new(150.0, 100.0),
            Vec2::new(104.0, 97.0),
            Vec2::new(60.0, 60.0),
        ];
        assert_eq!(
            closest_candidate(anchor, &candidates),
            Some(Vec2::new(104.0, 97.0))
        );
    }

    #[test]
    fn test_tie_goes_to_first_seen() {
        let anchor = Vec2::ZERO;
        let candidates = [
            Vec2::new(0.0, 10.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(-10.0, 0.0),
        ];
        assert_eq!(
            closest_candidate(anchor, &candidates),
            Some(Vec2::new(0.0, 10.0))
        );
    }

    #[test]
    fn test_candidate_on_anchor() {
        let anchor = Vec2::new(3.0, 3.0);
        let candidates = [Vec2::new(9.0, 9.0), anchor];
        assert_eq!(closest_candidate(anchor, &candidates), Some(anchor));
    }
}
