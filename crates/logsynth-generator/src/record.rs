//! Fixed-layout record rendering.

use crate::fields::FieldValueProvider;
use crate::profile::AccessLogProfile;
use rand::Rng;

/// Probability that a record carries a real referrer rather than the
/// `-` placeholder.
const REFERRER_PROBABILITY: f64 = 0.7;

/// Renders one access-log line from sampled categories and provided
/// field values.
///
/// The layout is fixed and must stay byte-compatible with downstream
/// parsers:
///
/// ```text
/// <date> <time> <region> <byte-size> <client-ip> <method> <host> <uri> \
/// <status> <referrer-or-dash> some-data(<os>; <browser> <version>)%20<browser>/<version>
/// ```
///
/// Composition is a pure function of the profile, the provider and the
/// caller's RNG.
#[derive(Debug, Clone, Copy)]
pub struct LogEntryComposer<'a> {
    profile: &'a AccessLogProfile,
}

impl<'a> LogEntryComposer<'a> {
    pub fn new(profile: &'a AccessLogProfile) -> Self {
        Self { profile }
    }

    /// Render a single record, without the trailing newline.
    pub fn compose<R: Rng, P: FieldValueProvider>(&self, rng: &mut R, provider: &P) -> String {
        let date = provider.date(rng);
        let time = provider.time_of_day(rng);

        let region = self.profile.regions.sample(rng);
        let band = self.profile.size_bands.sample(rng);
        // The band's weight picks the band; the byte count is uniform
        // inside it.
        let bytes_sent = rng.gen_range(band.min..=band.max);
        let ip = provider.client_ip(rng);
        let method = self.profile.methods.sample(rng);
        let host = provider.hostname(rng);
        let uri = self.profile.uris.sample(rng);
        let status = self.profile.status_codes.sample(rng);
        let referrer = if rng.gen_bool(REFERRER_PROBABILITY) {
            provider.referrer(rng)
        } else {
            "-".to_string()
        };
        let agent = self.profile.agents.sample(rng);

        format!(
            "{} {} {region} {bytes_sent} {ip} {method} {host} {uri} {status} {referrer} \
             some-data({}; {} {})%20{}/{}",
            date.format("%Y-%m-%d"),
            time.format("%H:%M:%S"),
            agent.os,
            agent.browser,
            agent.version,
            agent.browser,
            agent.version,
        )
    }
}
