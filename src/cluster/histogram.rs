//! Cluster-size histogram.

use core::fmt;

/// Cluster sizes, the minimum sanity check on a partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterHistogram {
    counts: Vec<usize>,
}

impl ClusterHistogram {
    /// Count labels into `k` bins. Labels outside `[0, k)` are ignored.
    pub fn new(labels: &[usize], k: usize) -> Self {
        let mut counts = vec![0usize; k];
        for &label in labels {
            if let Some(c) = counts.get_mut(label) {
                *c += 1;
            }
        }
        Self { counts }
    }

    /// Size of each cluster, indexed by label.
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Total number of counted items.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Number of clusters with no members.
    pub fn empty_clusters(&self) -> usize {
        self.counts.iter().filter(|&&c| c == 0).count()
    }

    /// Fraction of items held by the largest cluster.
    pub fn largest_share(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.counts.iter().copied().max().unwrap_or(0) as f64 / total as f64
    }
}

impl fmt::Display for ClusterHistogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const WIDTH: usize = 40;
        let max = self.counts.iter().copied().max().unwrap_or(0).max(1);
        let label_width = self.counts.len().saturating_sub(1).to_string().len();
        for (label, &count) in self.counts.iter().enumerate() {
            let bar = "#".repeat((count * WIDTH).div_ceil(max));
            writeln!(f, "cluster {label:>label_width$} {count:>8} {bar}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_and_shares() {
        let h = ClusterHistogram::new(&[0, 1, 1, 1, 3], 4);
        assert_eq!(h.counts(), &[1, 3, 0, 1]);
        assert_eq!(h.total(), 5);
        assert_eq!(h.empty_clusters(), 1);
        assert!((h.largest_share() - 0.6).abs() < 1e-12);
    }

    #[test]
    fn display_has_one_line_per_cluster() {
        let h = ClusterHistogram::new(&[0, 0, 1], 2);
        let text = h.to_string();
        assert_eq!(text.lines().count(), 2);
        assert!(text.lines().next().unwrap().contains("cluster 0        2"));
    }

    #[test]
    fn empty_histogram() {
        let h = ClusterHistogram::new(&[], 3);
        assert_eq!(h.largest_share(), 0.0);
        assert_eq!(h.empty_clusters(), 3);
    }
}
