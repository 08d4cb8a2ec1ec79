/// Precomputed percentile values for a sample of integers.
///
/// This structure stores percentile-value pairs for efficient lookup
/// of commonly used percentile points.
///
/// # Examples
///
/// ```
/// use playcall_stats::percentiles::Percentiles;
///
/// let values = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
/// let percentiles = Percentiles::new(&values, &[25.0, 50.0, 75.0]);
///
/// assert_eq!(percentiles.get(50.0), Some(6));
/// assert_eq!(percentiles.get(25.0), Some(3));
/// ```
#[derive(Debug, Clone)]
pub struct Percentiles {
    /// Percentile-value pairs, in the order requested.
    /// Each tuple contains (percentile, value) where percentile is 0.0-100.0.
    values: Vec<(f32, i32)>,
}

impl Percentiles {
    /// Computes percentiles from sorted values.
    ///
    /// Percentiles of an empty sample are omitted.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[must_use]
    pub fn from_sorted(sorted_values: &[i32], percentile_points: &[f32]) -> Self {
        assert!(
            sorted_values.is_sorted(),
            "values must be sorted in ascending order"
        );

        let values = percentile_points
            .iter()
            .filter_map(|&p| compute_percentile(sorted_values, p).map(|value| (p, value)))
            .collect();
        Self { values }
    }

    /// Computes percentiles from unsorted values.
    ///
    /// # Examples
    ///
    /// ```
    /// use playcall_stats::percentiles::Percentiles;
    ///
    /// let percentiles = Percentiles::new(&[5, 2, 8, 1, 9], &[25.0, 50.0, 75.0]);
    /// assert_eq!(percentiles.get(50.0), Some(5));
    /// ```
    #[must_use]
    pub fn new(values: &[i32], percentile_points: &[f32]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_unstable();
        Self::from_sorted(&sorted, percentile_points)
    }

    /// Gets the value at a specific percentile.
    ///
    /// Returns `None` if the percentile was not precomputed.
    #[must_use]
    pub fn get(&self, percentile: f32) -> Option<i32> {
        self.values.iter().find_map(|(p, value)| {
            if (*p - percentile).abs() < f32::EPSILON {
                Some(*value)
            } else {
                None
            }
        })
    }

    /// Returns an iterator over all (percentile, value) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (f32, i32)> + '_ {
        self.values.iter().copied()
    }
}

/// Computes a single percentile value from sorted data.
///
/// This function uses the nearest-rank method: for a sample with n values, the
/// k-th percentile is the value at position `floor(n * k / 100)`, clamped to
/// the last element.
///
/// Returns `None` if the input is empty.
///
/// # Examples
///
/// ```
/// use playcall_stats::percentiles::compute_percentile;
///
/// let values = [1, 2, 3, 4, 5];
/// assert_eq!(compute_percentile(&values, 50.0), Some(3));
/// assert_eq!(compute_percentile(&values, 25.0), Some(2));
/// assert_eq!(compute_percentile(&values, 100.0), Some(5));
/// assert_eq!(compute_percentile(&[], 50.0), None);
/// ```
#[expect(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
#[must_use]
pub fn compute_percentile(sorted_values: &[i32], percentile: f32) -> Option<i32> {
    if sorted_values.is_empty() {
        return None;
    }
    let idx = ((sorted_values.len() as f32 * percentile) / 100.0) as usize;
    let idx = idx.min(sorted_values.len() - 1);
    Some(sorted_values[idx])
}
