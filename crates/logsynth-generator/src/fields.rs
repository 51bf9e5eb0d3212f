//! Atomic field value providers.
//!
//! Record composition needs realistic-looking atomic values (dates, client
//! IPs, hostnames, referrer URIs) that are orthogonal to the weighted
//! category tables. The [`FieldValueProvider`] trait is the seam for
//! plugging in a richer fake-data stack; [`SyntheticFieldProvider`] is the
//! built-in RNG-driven default.

use chrono::{Days, NaiveDate, NaiveTime};
use rand::Rng;
use std::net::Ipv4Addr;

/// Supplies atomic field values for record composition.
///
/// All methods draw from the caller's RNG so that a chunk's output is a
/// pure function of its seed.
pub trait FieldValueProvider {
    /// A calendar date within the trailing year.
    fn date<R: Rng>(&self, rng: &mut R) -> NaiveDate;

    /// A time of day with second precision.
    fn time_of_day<R: Rng>(&self, rng: &mut R) -> NaiveTime;

    /// A client IPv4 address.
    fn client_ip<R: Rng>(&self, rng: &mut R) -> Ipv4Addr;

    /// A hostname such as `cedar-harbor.net`.
    fn hostname<R: Rng>(&self, rng: &mut R) -> String;

    /// A referrer URI.
    fn referrer<R: Rng>(&self, rng: &mut R) -> String;
}

const HOST_WORDS: &[&str] = &[
    "cedar", "harbor", "summit", "willow", "atlas", "beacon", "canyon", "delta", "ember", "fjord",
    "garnet", "horizon", "indigo", "juniper", "krypton", "lumen", "meridian", "nimbus", "orchid",
    "pioneer", "quartz", "redwood", "sierra", "tundra",
];

const TLDS: &[&str] = &["com", "net", "org", "io"];

const PATH_WORDS: &[&str] = &[
    "articles", "blog", "catalog", "docs", "events", "feed", "gallery", "help", "items", "news",
    "posts", "reports", "store", "topics", "updates", "wiki",
];

/// Default field value provider backed by small word pools.
///
/// Dates are drawn from the year trailing `base_date`, which is captured
/// once at construction so a job's output does not depend on wall-clock
/// time during generation.
#[derive(Debug, Clone, Copy)]
pub struct SyntheticFieldProvider {
    base_date: NaiveDate,
}

impl SyntheticFieldProvider {
    /// Provider anchored to today's date.
    pub fn new() -> Self {
        Self::anchored(chrono::Utc::now().date_naive())
    }

    /// Provider anchored to a fixed date, for reproducible output.
    pub fn anchored(base_date: NaiveDate) -> Self {
        Self { base_date }
    }

    /// The anchor date used as the upper bound for generated dates.
    pub fn base_date(&self) -> NaiveDate {
        self.base_date
    }
}

impl Default for SyntheticFieldProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldValueProvider for SyntheticFieldProvider {
    fn date<R: Rng>(&self, rng: &mut R) -> NaiveDate {
        let days_back = rng.gen_range(0..=365u64);
        self.base_date
            .checked_sub_days(Days::new(days_back))
            .unwrap_or(self.base_date)
    }

    fn time_of_day<R: Rng>(&self, rng: &mut R) -> NaiveTime {
        let seconds = rng.gen_range(0..86_400u32);
        NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0).unwrap_or(NaiveTime::MIN)
    }

    fn client_ip<R: Rng>(&self, rng: &mut R) -> Ipv4Addr {
        // First octet restricted to unicast space, last to host addresses.
        Ipv4Addr::new(
            rng.gen_range(1..=223),
            rng.gen_range(0..=255),
            rng.gen_range(0..=255),
            rng.gen_range(1..=254),
        )
    }

    fn hostname<R: Rng>(&self, rng: &mut R) -> String {
        let first = HOST_WORDS[rng.gen_range(0..HOST_WORDS.len())];
        let second = HOST_WORDS[rng.gen_range(0..HOST_WORDS.len())];
        let tld = TLDS[rng.gen_range(0..TLDS.len())];
        format!("{first}-{second}.{tld}")
    }

    fn referrer<R: Rng>(&self, rng: &mut R) -> String {
        let host = self.hostname(rng);
        let path = PATH_WORDS[rng.gen_range(0..PATH_WORDS.len())];
        format!("https://{host}/{path}")
    }
}
