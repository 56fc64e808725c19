//! Job catalog: the immutable job → duration table.

use crate::error::ConfigError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Processing durations of the jobs in one instance.
///
/// Job identities are the indices `0..len()`. The catalog is fixed for
/// the lifetime of a run and shared read-only by every assignment built
/// over it.
///
/// # Examples
///
/// ```
/// use u_makespan::JobCatalog;
///
/// let catalog = JobCatalog::new(vec![10, 20, 30]).unwrap();
/// assert_eq!(catalog.len(), 3);
/// assert_eq!(catalog.total_duration(), 60);
/// assert_eq!(catalog.lower_bound(2), 30);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<u64>", into = "Vec<u64>"))]
pub struct JobCatalog {
    durations: Vec<u64>,
    total: u64,
}

impl JobCatalog {
    /// Builds a catalog, checking that the summed duration fits in `u64`.
    ///
    /// Loads are cached as `u64`, so a catalog whose total overflows
    /// could not be represented by any assignment.
    pub fn new(durations: Vec<u64>) -> Result<Self, ConfigError> {
        let total = durations
            .iter()
            .try_fold(0u64, |acc, &d| acc.checked_add(d))
            .ok_or(ConfigError::DurationOverflow)?;
        Ok(Self { durations, total })
    }

    /// Builds a catalog from signed durations, rejecting negative values.
    pub fn from_signed(durations: &[i64]) -> Result<Self, ConfigError> {
        let unsigned = durations
            .iter()
            .enumerate()
            .map(|(job, &duration)| {
                u64::try_from(duration).map_err(|_| ConfigError::NegativeDuration { job, duration })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(unsigned)
    }

    /// The 100-job benchmark instance.
    ///
    /// Job `i` takes the ten decimals of pi starting at decimal `100 * i`
    /// (leading zeros dropped).
    pub fn reference() -> Self {
        // Sum is ~5e11, far from overflow.
        let durations = REFERENCE_DURATIONS.to_vec();
        let total = durations.iter().sum();
        Self { durations, total }
    }

    /// Duration of `job`.
    ///
    /// # Panics
    ///
    /// Panics if `job >= len()`.
    #[inline]
    pub fn duration(&self, job: usize) -> u64 {
        self.durations[job]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.durations.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }

    /// Sum of all durations.
    #[inline]
    pub fn total_duration(&self) -> u64 {
        self.total
    }

    /// Longest single job, 0 for an empty catalog.
    pub fn max_duration(&self) -> u64 {
        self.durations.iter().copied().max().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.durations.iter().copied()
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.durations
    }

    /// Classical `P||Cmax` lower bound: `max(longest job, ceil(total / m))`.
    ///
    /// No assignment onto `machines` machines can have a smaller makespan.
    /// `machines` is clamped to at least 1.
    pub fn lower_bound(&self, machines: usize) -> u64 {
        let m = machines.max(1) as u64;
        self.max_duration().max(self.total.div_ceil(m))
    }
}

impl TryFrom<Vec<u64>> for JobCatalog {
    type Error = ConfigError;

    fn try_from(durations: Vec<u64>) -> Result<Self, Self::Error> {
        Self::new(durations)
    }
}

impl From<JobCatalog> for Vec<u64> {
    fn from(catalog: JobCatalog) -> Self {
        catalog.durations
    }
}

const REFERENCE_DURATIONS: [u64; 100] = [
    1415926535, 8214808651, 4428810975, 7245870066, 3305727036, 9833673362, 5681271, 4201995611,
    5024459455, 5982534904, 5820974944, 4811174502, 4564856692, 7892590360, 744623799, 6094370277,
    1468440901, 5187072113, 7101000313, 8903894223, 8979323846, 3282306647, 6659334461, 631558817,
    5759591953, 4406566430, 4526356082, 2129021960, 3469083026, 2875546873, 5923078164, 8410270193,
    3460348610, 113305305, 6274956735, 539217176, 2249534301, 4999999837, 7838752886, 2858849455,
    2643383279, 938446095, 2847564823, 4881520920, 921861173, 8602139494, 7785771342, 8640344181,
    4252230825, 1159562863, 628620899, 8521105559, 4543266482, 4882046652, 1885752724, 2931767523,
    4654958537, 2978049951, 5875332083, 9550031194, 5028841971, 5058223172, 3786783165, 9628292540,
    8193261179, 6395224737, 7577896091, 5981362977, 3344685035, 8823537875, 8628034825, 6446229489,
    1339360726, 1384146951, 8912279381, 8467481846, 1050792279, 597317328, 8142061717, 6252505467,
    6939937510, 5359408128, 2712019091, 9171536436, 3105118548, 1907021798, 7363717872, 4771309960,
    2619311881, 9375195778, 3421170679, 5493038196, 249141273, 9415116094, 8301194912, 7669405132,
    6892589235, 1609631859, 7669147303, 4157424218,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sums_durations() {
        let catalog = JobCatalog::new(vec![3, 5, 7]).unwrap();
        assert_eq!(catalog.total_duration(), 15);
        assert_eq!(catalog.duration(1), 5);
        assert_eq!(catalog.max_duration(), 7);
        assert_eq!(catalog.iter().collect::<Vec<_>>(), vec![3, 5, 7]);
    }

    #[test]
    fn test_overflow_rejected() {
        let err = JobCatalog::new(vec![u64::MAX, 1]).unwrap_err();
        assert_eq!(err, ConfigError::DurationOverflow);
    }

    #[test]
    fn test_negative_duration_rejected() {
        let err = JobCatalog::from_signed(&[4, -2, 9]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::NegativeDuration {
                job: 1,
                duration: -2
            }
        );
    }

    #[test]
    fn test_from_signed_accepts_zero() {
        let catalog = JobCatalog::from_signed(&[0, 12]).unwrap();
        assert_eq!(catalog.as_slice(), &[0, 12]);
    }

    #[test]
    fn test_try_from_recomputes_total() {
        let catalog = JobCatalog::try_from(vec![2, 9, 4]).unwrap();
        assert_eq!(catalog.total_duration(), 15);
        assert_eq!(
            JobCatalog::try_from(vec![u64::MAX, u64::MAX]).unwrap_err(),
            ConfigError::DurationOverflow
        );
        assert_eq!(Vec::from(catalog), vec![2, 9, 4]);
    }

    #[test]
    fn test_reference_instance() {
        let catalog = JobCatalog::reference();
        assert_eq!(catalog.len(), 100);
        assert_eq!(catalog.duration(0), 1415926535);
        assert_eq!(catalog.duration(99), 4157424218);
        assert_eq!(catalog.total_duration(), catalog.iter().sum::<u64>());
    }

    #[test]
    fn test_lower_bound() {
        let catalog = JobCatalog::new(vec![10, 20, 30]).unwrap();
        assert_eq!(catalog.lower_bound(2), 30);
        assert_eq!(catalog.lower_bound(1), 60);
        // Longest job dominates with many machines.
        assert_eq!(catalog.lower_bound(10), 30);

        let even = JobCatalog::new(vec![5, 5, 5, 6]).unwrap();
        assert_eq!(even.lower_bound(2), 11);
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = JobCatalog::new(Vec::new()).unwrap();
        assert!(catalog.is_empty());
        assert_eq!(catalog.lower_bound(3), 0);
    }
}
