use crate::models::occupation::OccupationRecord;

/// Records must score strictly above this to reach the prompt.
pub const RELEVANCE_THRESHOLD: f32 = 0.1;

/// Keeps records whose score exceeds `threshold`, preserving order.
/// Idempotent, and monotone in `threshold`.
pub fn filter_relevant(records: Vec<OccupationRecord>, threshold: f32) -> Vec<OccupationRecord> {
    records
        .into_iter()
        .filter(|record| record.score > threshold)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, score: f32) -> OccupationRecord {
        OccupationRecord {
            id: id.to_string(),
            score,
            ..Default::default()
        }
    }

    fn reference_set() -> Vec<OccupationRecord> {
        vec![
            record("261313", 0.82),
            record("261312", 0.55),
            record("261111", 0.3),
            record("135112", 0.09),
            record("224711", 0.02),
        ]
    }

    fn ids(records: &[OccupationRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_keeps_scores_above_threshold_in_order() {
        let kept = filter_relevant(reference_set(), RELEVANCE_THRESHOLD);
        assert_eq!(ids(&kept), vec!["261313", "261312", "261111"]);
    }

    #[test]
    fn test_score_equal_to_threshold_is_dropped() {
        let kept = filter_relevant(vec![record("a", 0.1), record("b", 0.1001)], 0.1);
        assert_eq!(ids(&kept), vec!["b"]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let once = filter_relevant(reference_set(), RELEVANCE_THRESHOLD);
        let twice = filter_relevant(once.clone(), RELEVANCE_THRESHOLD);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_higher_threshold_yields_subset() {
        for (low, high) in [(0.0, 0.1), (0.1, 0.3), (0.3, 0.6), (0.05, 0.9)] {
            let loose = filter_relevant(reference_set(), low);
            let strict = filter_relevant(reference_set(), high);
            assert!(strict.iter().all(|r| loose.contains(r)));
            assert!(strict.len() <= loose.len());
        }
    }

    #[test]
    fn test_empty_input_is_empty_output() {
        let kept = filter_relevant(Vec::new(), RELEVANCE_THRESHOLD);
        assert!(kept.is_empty());
    }
}
