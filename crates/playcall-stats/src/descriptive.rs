/// Descriptive statistics summarizing a sample of integer values.
///
/// All derived values use truncating integer arithmetic: the mean is the
/// integer quotient of the sum and the count, and the standard deviation is the
/// truncated square root of the truncated mean squared deviation from that
/// integer mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegerStats {
    /// Number of values in the sample.
    pub count: usize,
    /// The minimum value in the sample.
    pub min: i32,
    /// The maximum value in the sample.
    pub max: i32,
    /// Sum of all values.
    pub sum: i64,
    /// The truncated arithmetic mean.
    pub mean: i32,
    /// The median value (upper median for even sample sizes).
    pub median: i32,
    /// The truncated population standard deviation.
    pub std_dev: i32,
}

impl IntegerStats {
    /// Computes descriptive statistics from unsorted values.
    ///
    /// This method will sort the values internally before computing statistics.
    ///
    /// # Returns
    ///
    /// * `Some(IntegerStats)` - if the sample contains at least one value
    /// * `None` - if the sample is empty
    ///
    /// # Examples
    ///
    /// ```
    /// # use playcall_stats::descriptive::IntegerStats;
    /// let stats = IntegerStats::new([5, 2, 4, 1, 3]).unwrap();
    /// assert_eq!(stats.min, 1);
    /// assert_eq!(stats.max, 5);
    /// assert_eq!(stats.mean, 3);
    /// assert_eq!(stats.median, 3);
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = i32>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_unstable();
        Self::from_sorted(&values)
    }

    /// Computes descriptive statistics from pre-sorted values.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// # use playcall_stats::descriptive::IntegerStats;
    /// let stats = IntegerStats::from_sorted(&[-3, 0, 4]).unwrap();
    /// assert_eq!(stats.sum, 1);
    /// assert_eq!(stats.mean, 0);
    /// ```
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap,
        clippy::cast_precision_loss
    )]
    #[must_use]
    pub fn from_sorted(sorted_values: &[i32]) -> Option<Self> {
        assert!(
            sorted_values.is_sorted(),
            "values must be sorted in ascending order"
        );

        let min = *sorted_values.first()?;
        let max = *sorted_values.last()?;
        let count = sorted_values.len();
        let n = count as i64;
        let sum = sorted_values.iter().map(|&v| i64::from(v)).sum::<i64>();
        let mean = sum / n;
        let median = sorted_values[count / 2];
        let squared_deviation = sorted_values
            .iter()
            .map(|&v| (i64::from(v) - mean).pow(2))
            .sum::<i64>()
            / n;
        let std_dev = (squared_deviation as f64).sqrt() as i64;

        Some(Self {
            count,
            min,
            max,
            sum,
            mean: mean as i32,
            median,
            std_dev: std_dev as i32,
        })
    }
}
