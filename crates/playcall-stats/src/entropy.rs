//! Entropy and information gain over class-count tables
//!
//! A candidate split divides a set of labelled observations into groups. Each
//! group is described by its per-class counts (one slot per class, zero allowed).
//!
//! - **Entropy** `H(D) = -Σ p·log2(p)` over classes with `p = count / total`
//! - **Information gain** `H(D) - Σ (|D_c| / |D|)·H(D_c)` over non-empty groups
//! - **Intrinsic value** `-Σ (|D_c| / |D|)·log2(|D_c| / |D|)`, the entropy of the
//!   group sizes themselves
//! - **Gain ratio** gain divided by intrinsic value, which removes the bias of
//!   plain gain toward splits with many small groups

/// Information contribution of one class holding `count` of `total` observations.
#[expect(clippy::cast_precision_loss)]
fn information(count: usize, total: usize) -> f64 {
    let ratio = count as f64 / total as f64;
    -ratio * ratio.log2()
}

/// Computes the Shannon entropy (base 2) of a class-count distribution.
///
/// Zero counts are skipped. An empty or all-zero distribution has entropy 0.
///
/// # Examples
///
/// ```
/// use playcall_stats::entropy::entropy;
///
/// assert_eq!(entropy([4, 4]), 1.0);
/// assert_eq!(entropy([8, 0]), 0.0);
/// assert_eq!(entropy([1, 1, 1, 1]), 2.0);
/// ```
#[must_use]
pub fn entropy<I>(counts: I) -> f64
where
    I: IntoIterator<Item = usize>,
{
    let counts = counts
        .into_iter()
        .filter(|&c| c > 0)
        .collect::<Vec<_>>();
    let total = counts.iter().sum::<usize>();
    counts.into_iter().map(|c| information(c, total)).sum()
}

/// Information gain and intrinsic value of one candidate split.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InformationGain {
    /// Reduction in entropy achieved by the split.
    pub gain: f64,
    /// Entropy of the group-size distribution induced by the split.
    pub intrinsic_value: f64,
}

impl InformationGain {
    /// Scores a split given the per-class counts of each group.
    ///
    /// Empty groups are ignored. The parent distribution is the class-wise sum
    /// of all groups.
    ///
    /// # Returns
    ///
    /// * `Some(InformationGain)` - if at least two groups are non-empty
    /// * `None` - otherwise, since a split into one group carries no information
    ///
    /// # Examples
    ///
    /// ```
    /// use playcall_stats::entropy::InformationGain;
    ///
    /// // Same class mix in both groups: nothing gained
    /// let groups = [vec![1, 1], vec![1, 1]];
    /// let gain = InformationGain::from_groups(&groups).unwrap();
    /// assert_eq!(gain.gain, 0.0);
    /// assert_eq!(gain.intrinsic_value, 1.0);
    ///
    /// // All observations in one group
    /// assert!(InformationGain::from_groups(&[vec![3, 1], vec![0, 0]]).is_none());
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_groups<G>(groups: &[G]) -> Option<Self>
    where
        G: AsRef<[usize]>,
    {
        let groups = groups
            .iter()
            .map(AsRef::as_ref)
            .filter(|g| g.iter().any(|&c| c > 0))
            .collect::<Vec<_>>();
        if groups.len() <= 1 {
            return None;
        }

        let num_classes = groups.iter().map(|g| g.len()).max().unwrap_or(0);
        let mut parent = vec![0; num_classes];
        for group in &groups {
            for (slot, &count) in parent.iter_mut().zip(group.iter()) {
                *slot += count;
            }
        }
        let group_totals = groups
            .iter()
            .map(|g| g.iter().sum::<usize>())
            .collect::<Vec<_>>();
        let total = group_totals.iter().sum::<usize>();

        let mut gain = entropy(parent.iter().copied());
        for (group, &group_total) in groups.iter().zip(&group_totals) {
            let group_entropy = entropy(group.iter().copied());
            gain -= (group_entropy * group_total as f64) / total as f64;
        }

        let intrinsic_value = group_totals
            .iter()
            .map(|&size| information(size, total))
            .sum();

        Some(Self {
            gain,
            intrinsic_value,
        })
    }

    /// Returns the information gain ratio, `gain / intrinsic_value`.
    #[must_use]
    pub fn ratio(&self) -> f64 {
        self.gain / self.intrinsic_value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    #[test]
    fn test_entropy_of_empty_distribution() {
        assert_eq!(entropy(Vec::<usize>::new()), 0.0);
        assert_eq!(entropy([0, 0, 0]), 0.0);
    }

    #[test]
    fn test_entropy_uneven_distribution() {
        // p = 3/4, 1/4
        let expected = -(0.75_f64 * 0.75_f64.log2()) - (0.25_f64 * 0.25_f64.log2());
        assert!((entropy([3, 1]) - expected).abs() < EPSILON);
    }

    #[test]
    fn test_perfect_split_has_unit_ratio() {
        // 4 observations, 2 classes, a binary attribute separating them exactly
        let groups = [[2, 0], [0, 2]];
        let gain = InformationGain::from_groups(&groups).unwrap();
        assert_eq!(gain.gain, 1.0);
        assert_eq!(gain.intrinsic_value, 1.0);
        assert_eq!(gain.ratio(), 1.0);
    }

    #[test]
    fn test_empty_groups_are_ignored() {
        let with_empty = InformationGain::from_groups(&[vec![2, 0], vec![0, 0], vec![0, 2]]);
        let without = InformationGain::from_groups(&[vec![2, 0], vec![0, 2]]);
        assert_eq!(with_empty, without);
    }

    #[test]
    fn test_partial_split() {
        // Parent [3, 1]; groups [2, 0] and [1, 1]
        let gain = InformationGain::from_groups(&[[2, 0], [1, 1]]).unwrap();
        let parent = entropy([3, 1]);
        let expected_gain = parent - 0.5;
        assert!((gain.gain - expected_gain).abs() < EPSILON);
        assert!((gain.intrinsic_value - 1.0).abs() < EPSILON);
        assert!(gain.ratio() > 0.0 && gain.ratio() < 1.0);
    }

    #[test]
    fn test_single_group_is_none() {
        assert!(InformationGain::from_groups(&[[5, 3]]).is_none());
        assert!(InformationGain::from_groups::<[usize; 2]>(&[]).is_none());
    }
}
