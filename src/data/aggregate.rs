use std::collections::BTreeMap;

/// Decimal places for percentages in general reporting.
pub const PERCENT_DECIMALS: u32 = 4;

/// Decimal places for the gender breakdown.
pub const GENDER_PERCENT_DECIMALS: u32 = 2;

// ---------------------------------------------------------------------------
// ModeSet – every value tied for the highest frequency
// ---------------------------------------------------------------------------

/// A non-empty, ascending set of values. Callers always iterate it,
/// whether it holds one value or several tied ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeSet<T>(Vec<T>);

impl<T> ModeSet<T> {
    /// A set holding exactly one value.
    pub fn single(value: T) -> Self {
        ModeSet(vec![value])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.0.iter()
    }

    /// Map every value, keeping the set's order.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> ModeSet<U> {
        ModeSet(self.0.into_iter().map(f).collect())
    }
}

/// Result of a most-frequent-value query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mode<T> {
    pub values: ModeSet<T>,
    /// Occurrences of the first mode value (all tied values share it).
    pub count: usize,
}

impl<T> Mode<T> {
    /// Relabel the mode values, e.g. month numbers to month names.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Mode<U> {
        Mode {
            values: self.values.map(f),
            count: self.count,
        }
    }
}

// ---------------------------------------------------------------------------
// Column aggregations
// ---------------------------------------------------------------------------

fn occurrences<T: Ord>(values: impl IntoIterator<Item = Option<T>>) -> BTreeMap<T, usize> {
    let mut counts = BTreeMap::new();
    for v in values.into_iter().flatten() {
        *counts.entry(v).or_insert(0) += 1;
    }
    counts
}

/// Values with the highest occurrence count, ignoring missing cells.
///
/// Returns `None` when the column has no present values.
pub fn most_frequent<T: Ord>(values: impl IntoIterator<Item = Option<T>>) -> Option<Mode<T>> {
    let counts = occurrences(values);
    let max = counts.values().copied().max()?;
    let tied: Vec<T> = counts
        .into_iter()
        .filter(|(_, n)| *n == max)
        .map(|(v, _)| v)
        .collect();
    Some(Mode {
        values: ModeSet(tied),
        count: max,
    })
}

/// Number of cells exactly equal to `value`.
pub fn count_matches<T: PartialEq>(values: impl IntoIterator<Item = Option<T>>, value: &T) -> usize {
    values
        .into_iter()
        .filter(|v| v.as_ref() == Some(value))
        .count()
}

/// Number of missing cells, or `None` when the column is complete.
pub fn missing_count<T>(values: impl IntoIterator<Item = Option<T>>) -> Option<usize> {
    let missing = values.into_iter().filter(Option::is_none).count();
    (missing > 0).then_some(missing)
}

/// `count / total * 100`, rounded to `decimals` places. Zero when `total` is zero.
pub fn percentage(count: usize, total: usize, decimals: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let scale = 10f64.powi(decimals as i32);
    (count as f64 / total as f64 * 100.0 * scale).round() / scale
}

/// One entry of a value breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct Share<T> {
    pub value: T,
    pub count: usize,
    pub percent: f64,
}

/// Every distinct present value with its share of `total`, most frequent
/// first; equal counts keep ascending value order.
pub fn distribution<T: Ord>(
    values: impl IntoIterator<Item = Option<T>>,
    total: usize,
    decimals: u32,
) -> Vec<Share<T>> {
    let mut shares: Vec<Share<T>> = occurrences(values)
        .into_iter()
        .map(|(value, count)| Share {
            value,
            count,
            percent: percentage(count, total, decimals),
        })
        .collect();
    shares.sort_by(|a, b| b.count.cmp(&a.count));
    shares
}

/// Smallest and largest present value.
pub fn extremes<T: Ord + Copy>(values: impl IntoIterator<Item = Option<T>>) -> Option<(T, T)> {
    values.into_iter().flatten().fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

// ---------------------------------------------------------------------------
// Durations
// ---------------------------------------------------------------------------

/// Sum of present durations; zero for an all-missing column.
pub fn total_seconds(values: impl IntoIterator<Item = Option<f64>>) -> f64 {
    values.into_iter().flatten().sum()
}

/// Arithmetic mean of present durations.
pub fn mean_seconds(values: impl IntoIterator<Item = Option<f64>>) -> Option<f64> {
    let (sum, n) = values
        .into_iter()
        .flatten()
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// A duration split into whole hours, minutes and seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationParts {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl DurationParts {
    pub fn from_seconds(total: u64) -> Self {
        let (hours, rest) = (total / 3600, total % 3600);
        DurationParts {
            hours,
            minutes: rest / 60,
            seconds: rest % 60,
        }
    }

    /// Floors fractional input; negative input clamps to zero.
    pub fn from_secs_f64(total: f64) -> Self {
        Self::from_seconds(total.max(0.0).floor() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(values: &[Option<&'static str>]) -> Vec<Option<&'static str>> {
        values.to_vec()
    }

    #[test]
    fn mode_reports_every_tied_value() {
        let c = col(&[Some("b"), Some("a"), Some("b"), Some("a"), Some("c"), None, None, None]);
        let mode = most_frequent(c.clone()).unwrap();
        assert_eq!(mode.values.iter().copied().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(mode.count, 2);
        for v in mode.values.iter() {
            assert_eq!(count_matches(c.clone(), v), mode.count);
        }
    }

    #[test]
    fn missing_is_never_a_mode() {
        let c = col(&[None, None, None, Some("x")]);
        let mode = most_frequent(c).unwrap();
        assert_eq!(mode.values, ModeSet::single("x"));
        assert_eq!(mode.count, 1);

        assert_eq!(most_frequent(col(&[None, None])), None);
        assert_eq!(most_frequent(Vec::<Option<u32>>::new()), None);
    }

    #[test]
    fn counts_partition_the_column() {
        let c = col(&[Some("x"), None, Some("y"), Some("x"), None, Some("z")]);
        let counted: usize = ["x", "y", "z"].iter().map(|v| count_matches(c.clone(), v)).sum();
        let missing = missing_count(c.clone()).unwrap_or(0);
        assert_eq!(counted, c.len() - missing);
        assert_eq!(missing, 2);
    }

    #[test]
    fn complete_column_reports_no_missing() {
        assert_eq!(missing_count(vec![Some(1), Some(2)]), None);
    }

    #[test]
    fn percentage_bounds_and_rounding() {
        assert_eq!(percentage(0, 17, PERCENT_DECIMALS), 0.0);
        assert_eq!(percentage(17, 17, PERCENT_DECIMALS), 100.0);
        assert_eq!(percentage(1, 3, PERCENT_DECIMALS), 33.3333);
        assert_eq!(percentage(2, 3, GENDER_PERCENT_DECIMALS), 66.67);
        assert_eq!(percentage(5, 0, PERCENT_DECIMALS), 0.0);
    }

    #[test]
    fn distribution_sorted_by_frequency() {
        let c = col(&[Some("Customer"), Some("Subscriber"), Some("Subscriber"), None]);
        let shares = distribution(c, 4, PERCENT_DECIMALS);
        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].value, "Subscriber");
        assert_eq!(shares[0].percent, 50.0);
        assert_eq!(shares[1].value, "Customer");
        assert_eq!(shares[1].percent, 25.0);
    }

    #[test]
    fn station_pairs_tie_completely() {
        let pairs = vec![
            Some(("A", "B")),
            Some(("B", "A")),
            Some(("A", "B")),
            Some(("B", "A")),
            Some(("A", "C")),
        ];
        let mode = most_frequent(pairs).unwrap();
        assert_eq!(
            mode.values.iter().copied().collect::<Vec<_>>(),
            vec![("A", "B"), ("B", "A")]
        );
        assert_eq!(mode.count, 2);
    }

    #[test]
    fn extremes_skip_missing() {
        assert_eq!(extremes(vec![None, Some(1980), Some(1899), Some(2001)]), Some((1899, 2001)));
        assert_eq!(extremes(Vec::<Option<i32>>::new()), None);
    }

    #[test]
    fn duration_parts_round_trip() {
        for total in [0u64, 59, 60, 3599, 3600, 3661, 86_399, 1_234_567] {
            let p = DurationParts::from_seconds(total);
            assert!(p.minutes < 60 && p.seconds < 60);
            assert_eq!(p.hours * 3600 + p.minutes * 60 + p.seconds, total);
        }
        assert_eq!(
            DurationParts::from_secs_f64(3725.9),
            DurationParts { hours: 1, minutes: 2, seconds: 5 }
        );
    }

    #[test]
    fn duration_sum_and_mean_ignore_missing() {
        let d = vec![Some(60.0), None, Some(120.0)];
        assert_eq!(total_seconds(d.clone()), 180.0);
        assert_eq!(mean_seconds(d), Some(90.0));
        assert_eq!(mean_seconds(vec![None]), None);
    }
}
