//! Statistical split of ranked candidates into a trusted core and a tail

use crate::error::FilterError;
use dossier_domain::{sort_by_score_desc, CandidateMatch, ScoreCluster};
use tracing::debug;

/// Splits candidates at the first score below `mean + k * stdev`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreClusterer {
    stdev_multiplier: f64,
    max_core: usize,
}

impl ScoreClusterer {
    /// Create a clusterer
    pub fn new(stdev_multiplier: f64, max_core: usize) -> Self {
        Self {
            stdev_multiplier,
            max_core: max_core.max(1),
        }
    }

    /// Sort `candidates` by descending score and split them.
    ///
    /// The core is a prefix of the sorted list holding every candidate up to
    /// the first one below the threshold, capped at `max_core`. It never
    /// holds fewer than one candidate.
    ///
    /// # Examples
    ///
    /// ```
    /// use dossier_domain::CandidateMatch;
    /// use dossier_filter::ScoreClusterer;
    ///
    /// let candidates = vec![
    ///     CandidateMatch::new(40, "c"),
    ///     CandidateMatch::new(98, "a"),
    ///     CandidateMatch::new(95, "b"),
    ///     CandidateMatch::new(38, "d"),
    ///     CandidateMatch::new(37, "e"),
    /// ];
    /// let cluster = ScoreClusterer::default().cluster(candidates).unwrap();
    /// assert_eq!(cluster.core_urls(), vec!["a", "b"]);
    /// assert_eq!(cluster.tail.len(), 3);
    /// ```
    pub fn cluster(&self, mut candidates: Vec<CandidateMatch>) -> Result<ScoreCluster, FilterError> {
        if candidates.is_empty() {
            return Err(FilterError::EmptyCandidateSet);
        }
        sort_by_score_desc(&mut candidates);

        let scores: Vec<f64> = candidates.iter().map(|c| f64::from(c.score)).collect();
        let (mean, stdev) = mean_and_sample_stdev(&scores);
        let threshold = mean + self.stdev_multiplier * stdev;

        // The top candidate is always trusted, even when it sits below the
        // threshold (any two distinct scores put the top one there).
        let boundary = scores
            .iter()
            .position(|&s| s < threshold)
            .unwrap_or(scores.len())
            .max(1);
        let core_len = boundary.min(self.max_core);

        debug!(
            candidates = candidates.len(),
            mean,
            stdev,
            threshold,
            core = core_len,
            "Clustered candidate scores"
        );

        let tail = candidates.split_off(core_len);
        Ok(ScoreCluster {
            core: candidates,
            tail,
        })
    }
}

impl Default for ScoreClusterer {
    fn default() -> Self {
        Self::new(1.0, 5)
    }
}

/// Mean and sample standard deviation; the deviation is 0 below two values
fn mean_and_sample_stdev(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if values.len() < 2 {
        return (mean, 0.0);
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    (mean, variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn candidates(scores: &[u32]) -> Vec<CandidateMatch> {
        scores
            .iter()
            .enumerate()
            .map(|(i, &s)| CandidateMatch::new(s, format!("u{}", i)))
            .collect()
    }

    #[test]
    fn test_empty_is_error() {
        assert_eq!(
            ScoreClusterer::default().cluster(Vec::new()),
            Err(FilterError::EmptyCandidateSet)
        );
    }

    #[test]
    fn test_single_candidate_is_core() {
        let cluster = ScoreClusterer::default().cluster(candidates(&[42])).unwrap();
        assert_eq!(cluster.core.len(), 1);
        assert!(cluster.tail.is_empty());
    }

    #[test]
    fn test_worked_example() {
        let input = vec![
            CandidateMatch::new(98, "a"),
            CandidateMatch::new(95, "b"),
            CandidateMatch::new(40, "c"),
            CandidateMatch::new(38, "d"),
            CandidateMatch::new(37, "e"),
        ];
        let cluster = ScoreClusterer::default().cluster(input).unwrap();
        assert_eq!(cluster.core_urls(), vec!["a", "b"]);
        let tail: Vec<_> = cluster.tail.iter().map(|c| c.url.as_str()).collect();
        assert_eq!(tail, vec!["c", "d", "e"]);
    }

    #[test]
    fn test_equal_scores_capped() {
        let cluster = ScoreClusterer::default().cluster(candidates(&[80; 8])).unwrap();
        assert_eq!(cluster.core.len(), 5);
        assert_eq!(cluster.tail.len(), 3);
        // stable sort keeps service order among ties
        assert_eq!(cluster.core_urls(), vec!["u0", "u1", "u2", "u3", "u4"]);
    }

    #[test]
    fn test_top_score_always_in_core() {
        let cluster = ScoreClusterer::default().cluster(candidates(&[90, 10])).unwrap();
        assert_eq!(cluster.core_urls(), vec!["u0"]);
    }

    #[test]
    fn test_sample_stdev() {
        let (mean, stdev) = mean_and_sample_stdev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!((mean - 5.0).abs() < 1e-9);
        assert!((stdev - 2.138_089_935).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn prop_core_is_bounded_prefix(scores in prop::collection::vec(0u32..=100, 1..40)) {
            let mut sorted = candidates(&scores);
            sort_by_score_desc(&mut sorted);

            let cluster = ScoreClusterer::default().cluster(candidates(&scores)).unwrap();

            prop_assert!(!cluster.core.is_empty());
            prop_assert!(cluster.core.len() <= 5);
            prop_assert_eq!(cluster.core.len() + cluster.tail.len(), scores.len());
            prop_assert_eq!(&sorted[..cluster.core.len()], &cluster.core[..]);
            if let (Some(floor), Some(top)) = (cluster.core_floor(), cluster.tail.first()) {
                prop_assert!(floor >= top.score);
            }
        }
    }
}
