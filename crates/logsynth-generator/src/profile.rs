//! Weighted category tables and the standard access-log profile.
//!
//! A [`CategoryTable`] is a discrete distribution over a finite set of
//! values. Tables are static configuration: built once at job start and
//! shared read-only across workers.

use rand::Rng;

/// Error type for profile configuration.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    /// Table has no entries
    #[error("Category table must have at least one entry")]
    EmptyTable,

    /// A weight was zero or negative
    #[error("Category weight must be positive, got {0}")]
    NonPositiveWeight(f64),
}

/// A weighted discrete distribution over a finite set of values.
///
/// Entry weights do not need to sum to 1; the selection probability of
/// entry `i` is `w_i / total_weight`.
#[derive(Debug, Clone)]
pub struct CategoryTable<T> {
    entries: Vec<(T, f64)>,
    total_weight: f64,
}

impl<T> CategoryTable<T> {
    /// Create a table from `(value, weight)` pairs.
    ///
    /// Fails if the table is empty or any weight is not strictly positive.
    pub fn new(entries: Vec<(T, f64)>) -> Result<Self, ProfileError> {
        if entries.is_empty() {
            return Err(ProfileError::EmptyTable);
        }
        for (_, weight) in &entries {
            if *weight <= 0.0 {
                return Err(ProfileError::NonPositiveWeight(*weight));
            }
        }
        let total_weight = entries.iter().map(|(_, w)| w).sum();
        Ok(Self {
            entries,
            total_weight,
        })
    }

    /// Number of entries in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries. Always false for constructed tables.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all entry weights.
    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// Draw one value according to the table weights.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> &T {
        self.pick(rng.gen_range(0.0..self.total_weight))
    }

    /// Select the entry whose cumulative weight interval contains `r`.
    ///
    /// Entries are scanned in table order and the first entry whose
    /// cumulative weight is `>= r` wins, so boundary draws resolve to the
    /// earlier entry. If floating-point drift pushes `r` past every
    /// cumulative sum, the last entry is returned.
    fn pick(&self, r: f64) -> &T {
        let mut cumulative = 0.0;
        for (value, weight) in &self.entries {
            cumulative += weight;
            if cumulative >= r {
                return value;
            }
        }
        &self.entries[self.entries.len() - 1].0
    }
}

/// Client platform triple sampled as a single category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientAgent {
    pub os: &'static str,
    pub browser: &'static str,
    pub version: &'static str,
}

/// Inclusive response-size band in bytes.
///
/// The band's weight controls how often the band is drawn; the actual
/// byte count is drawn uniformly inside the band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeBand {
    pub min: u64,
    pub max: u64,
}

/// The full set of weighted tables one record is sampled from.
#[derive(Debug, Clone)]
pub struct AccessLogProfile {
    pub status_codes: CategoryTable<u16>,
    pub methods: CategoryTable<&'static str>,
    pub agents: CategoryTable<ClientAgent>,
    pub uris: CategoryTable<&'static str>,
    pub regions: CategoryTable<&'static str>,
    pub size_bands: CategoryTable<SizeBand>,
}

// Static tables with known-good literals; skips per-entry validation.
fn table<T>(entries: Vec<(T, f64)>) -> CategoryTable<T> {
    let total_weight = entries.iter().map(|(_, w)| w).sum();
    CategoryTable {
        entries,
        total_weight,
    }
}

impl AccessLogProfile {
    /// The standard profile: realistic web-traffic distributions for
    /// status codes, methods, client platforms, request paths, regions
    /// and response sizes.
    pub fn standard() -> Self {
        let status_codes = table(vec![
            (200, 0.70),
            (404, 0.15),
            (500, 0.05),
            (301, 0.05),
            (403, 0.03),
            (503, 0.02),
        ]);

        let methods = table(vec![
            ("GET", 0.65),
            ("POST", 0.20),
            ("PUT", 0.08),
            ("DELETE", 0.05),
            ("HEAD", 0.02),
        ]);

        let agents = table(vec![
            (
                ClientAgent {
                    os: "Windows 10",
                    browser: "Chrome",
                    version: "120.0",
                },
                0.35,
            ),
            (
                ClientAgent {
                    os: "Windows 11",
                    browser: "Chrome",
                    version: "121.0",
                },
                0.25,
            ),
            (
                ClientAgent {
                    os: "Mac OS X",
                    browser: "Safari",
                    version: "16.0",
                },
                0.15,
            ),
            (
                ClientAgent {
                    os: "Linux",
                    browser: "Firefox",
                    version: "115.0",
                },
                0.10,
            ),
            (
                ClientAgent {
                    os: "iOS",
                    browser: "Mobile Safari",
                    version: "16.0",
                },
                0.08,
            ),
            (
                ClientAgent {
                    os: "Android",
                    browser: "Chrome Mobile",
                    version: "120.0",
                },
                0.07,
            ),
        ]);

        let uris = table(vec![
            ("/index.html", 0.25),
            ("/products", 0.15),
            ("/search", 0.15),
            ("/api/v1/data", 0.10),
            ("/images/logo.png", 0.10),
            ("/static/main.css", 0.10),
            ("/contact", 0.08),
            ("/about", 0.07),
        ]);

        let regions = table(vec![
            ("US", 0.50),
            ("EU", 0.30),
            ("APAC", 0.15),
            ("LATAM", 0.05),
        ]);

        let size_bands = table(vec![
            (SizeBand { min: 100, max: 500 }, 0.30),
            (
                SizeBand {
                    min: 501,
                    max: 5000,
                },
                0.50,
            ),
            (
                SizeBand {
                    min: 5001,
                    max: 50000,
                },
                0.15,
            ),
            (
                SizeBand {
                    min: 50001,
                    max: 200000,
                },
                0.05,
            ),
        ]);

        Self {
            status_codes,
            methods,
            agents,
            uris,
            regions,
            size_bands,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_empty_table_rejected() {
        let result = CategoryTable::<u16>::new(vec![]);
        assert!(matches!(result, Err(ProfileError::EmptyTable)));
    }

    #[test]
    fn test_non_positive_weight_rejected() {
        let result = CategoryTable::new(vec![(200, 0.5), (404, 0.0)]);
        assert!(matches!(result, Err(ProfileError::NonPositiveWeight(_))));

        let result = CategoryTable::new(vec![(200, -1.0)]);
        assert!(matches!(result, Err(ProfileError::NonPositiveWeight(_))));
    }

    #[test]
    fn test_sample_stays_in_table() {
        let table = CategoryTable::new(vec![("a", 1.0), ("b", 2.0), ("c", 3.0)]).unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..1000 {
            let value = table.sample(&mut rng);
            assert!(["a", "b", "c"].contains(value));
        }
    }

    #[test]
    fn test_boundary_draw_resolves_to_earlier_entry() {
        let table = CategoryTable::new(vec![("first", 1.0), ("second", 1.0)]).unwrap();

        // A draw exactly on the cumulative boundary belongs to the entry
        // that closes the interval.
        assert_eq!(*table.pick(1.0), "first");
        assert_eq!(*table.pick(0.0), "first");
        assert_eq!(*table.pick(1.0001), "second");
        assert_eq!(*table.pick(2.0), "second");
    }

    #[test]
    fn test_drift_past_total_falls_back_to_last_entry() {
        let table = CategoryTable::new(vec![("a", 0.1), ("b", 0.2)]).unwrap();

        // r above every cumulative sum must still select something.
        assert_eq!(*table.pick(0.300000001), "b");
        assert_eq!(*table.pick(f64::MAX), "b");
    }

    #[test]
    fn test_deterministic_sampling() {
        let table = CategoryTable::new(vec![(1u16, 0.3), (2, 0.3), (3, 0.4)]).unwrap();

        let mut rng1 = StdRng::seed_from_u64(7);
        let mut rng2 = StdRng::seed_from_u64(7);

        for _ in 0..100 {
            assert_eq!(table.sample(&mut rng1), table.sample(&mut rng2));
        }
    }

    #[test]
    fn test_status_code_frequencies_converge() {
        let profile = AccessLogProfile::standard();
        let mut rng = StdRng::seed_from_u64(42);

        let draws = 100_000;
        let ok_count = (0..draws)
            .filter(|_| *profile.status_codes.sample(&mut rng) == 200)
            .count();

        // 200 has weight 0.70; the tolerance band is +/- 1% of draws.
        assert!(
            (69_000..=71_000).contains(&ok_count),
            "200-count {ok_count} outside tolerance band"
        );
    }

    #[test]
    fn test_standard_profile_tables_populated() {
        let profile = AccessLogProfile::standard();
        assert_eq!(profile.status_codes.len(), 6);
        assert_eq!(profile.methods.len(), 5);
        assert_eq!(profile.agents.len(), 6);
        assert_eq!(profile.uris.len(), 8);
        assert_eq!(profile.regions.len(), 4);
        assert_eq!(profile.size_bands.len(), 4);
        assert!((profile.status_codes.total_weight() - 1.0).abs() < 1e-9);
    }
}
