//! Metric identities and the catalog of well-known platform metrics
//!
//! A metric is identified on the wire by a raw string such as
//! `__li_bandwidth:1`: a name followed by `:`-separated parameters (usually a
//! load zone id, `1` being the aggregate of all zones). The platform may also
//! append a slicing annotation after a `|`, which is not part of the identity.
//!
//! # Examples
//!
//! ```
//! use loadimpact_cli::core::metrics::{Metric, MetricKind, WellKnownMetric};
//!
//! let metric = Metric::parse("__li_bandwidth");
//! assert_eq!(metric.kind(), &MetricKind::WellKnown(WellKnownMetric::Bandwidth));
//! assert_eq!(metric.to_wire_form(true), "__li_bandwidth:1");
//! ```

use std::cmp::Ordering;
use std::fmt;

/// Prefix shared by every metric the platform itself produces
pub const WELL_KNOWN_PREFIX: &str = "__li_";

/// Parameter applied to well-known metrics when none is given (all load zones)
pub const AGGREGATE_ZONE: &str = "1";

/// Shown in place of a parameter name for metrics outside the catalog
pub const NO_PARAM: &str = "-";

/// Closed set of metrics the platform always records for a test run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WellKnownMetric {
    AccumulatedLoadTime,
    Bandwidth,
    ClientsActive,
    ConnectionsActive,
    FailureRate,
    LiveFeedback,
    LoadgenCpuUtilization,
    LoadgenMemoryUtilization,
    ProgressPercentTotal,
    RequestsPerSecond,
    UserLoadTime,
}

/// (variant, CLI parameter name, display name)
const CATALOG: &[(WellKnownMetric, &str, &str)] = &[
    (
        WellKnownMetric::AccumulatedLoadTime,
        "accumulated_load_time",
        "accumulated load time",
    ),
    (WellKnownMetric::Bandwidth, "bandwidth", "bandwidth"),
    (WellKnownMetric::ClientsActive, "clients_active", "VUs"),
    (
        WellKnownMetric::ConnectionsActive,
        "connections_active",
        "connections",
    ),
    (WellKnownMetric::FailureRate, "failure_rate", "failure rate"),
    (WellKnownMetric::LiveFeedback, "live_feedback", "live feedback"),
    (
        WellKnownMetric::LoadgenCpuUtilization,
        "loadgen_cpu_utilization",
        "loadgen CPU %",
    ),
    (
        WellKnownMetric::LoadgenMemoryUtilization,
        "loadgen_memory_utilization",
        "loadgen memory %",
    ),
    (
        WellKnownMetric::ProgressPercentTotal,
        "progress_percent_total",
        "progress %",
    ),
    (
        WellKnownMetric::RequestsPerSecond,
        "requests_per_second",
        "reqs/s",
    ),
    (
        WellKnownMetric::UserLoadTime,
        "user_load_time",
        "user load time",
    ),
];

/// Metrics streamed by `test run` when the user does not pick any
pub const DEFAULT_METRICS: [WellKnownMetric; 5] = [
    WellKnownMetric::ClientsActive,
    WellKnownMetric::RequestsPerSecond,
    WellKnownMetric::Bandwidth,
    WellKnownMetric::UserLoadTime,
    WellKnownMetric::FailureRate,
];

impl WellKnownMetric {
    /// Every catalog entry, in catalog order
    pub fn all() -> impl Iterator<Item = WellKnownMetric> {
        CATALOG.iter().map(|(metric, _, _)| *metric)
    }

    fn entry(self) -> &'static (WellKnownMetric, &'static str, &'static str) {
        // CATALOG lists every variant exactly once
        CATALOG
            .iter()
            .find(|(metric, _, _)| *metric == self)
            .unwrap_or(&CATALOG[0])
    }

    /// Name accepted by `--metric`, e.g. `requests_per_second`
    pub fn param_name(self) -> &'static str {
        self.entry().1
    }

    /// Column label, e.g. `reqs/s`
    pub fn display_name(self) -> &'static str {
        self.entry().2
    }

    /// Protocol name, e.g. `__li_requests_per_second`
    pub fn raw_name(self) -> String {
        format!("{}{}", WELL_KNOWN_PREFIX, self.param_name())
    }

    /// Case-insensitive lookup by raw or parameter name
    pub fn lookup(name: &str) -> Option<WellKnownMetric> {
        let lowered = name.to_lowercase();
        let bare = lowered.strip_prefix(WELL_KNOWN_PREFIX).unwrap_or(&lowered);
        CATALOG
            .iter()
            .find(|(_, param, _)| *param == bare)
            .map(|(metric, _, _)| *metric)
    }

    /// All parameter names, for CLI value validation
    pub fn param_names() -> Vec<&'static str> {
        CATALOG.iter().map(|(_, param, _)| *param).collect()
    }
}

impl fmt::Display for WellKnownMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// What a metric identity refers to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MetricKind {
    WellKnown(WellKnownMetric),
    /// Anything outside the catalog, kept verbatim
    Custom(String),
}

/// Parsed metric identifier: a kind plus its ordered parameters
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Metric {
    kind: MetricKind,
    params: Vec<String>,
}

impl Metric {
    /// Parse a raw identifier. Never fails: unknown names become custom metrics.
    pub fn parse(raw: &str) -> Self {
        let identity = raw.split('|').next().unwrap_or_default();
        let mut tokens = identity.split(':');
        let name = tokens.next().unwrap_or_default();
        let mut params: Vec<String> = tokens.map(str::to_string).collect();

        match WellKnownMetric::lookup(name) {
            Some(metric) => {
                if params.is_empty() {
                    params.push(AGGREGATE_ZONE.to_string());
                }
                Metric {
                    kind: MetricKind::WellKnown(metric),
                    params,
                }
            }
            None => Metric {
                kind: MetricKind::Custom(name.to_string()),
                params,
            },
        }
    }

    /// Well-known metric aggregated over all load zones
    pub fn well_known(metric: WellKnownMetric) -> Self {
        Metric {
            kind: MetricKind::WellKnown(metric),
            params: vec![AGGREGATE_ZONE.to_string()],
        }
    }

    /// The default metric set, in its canonical order
    pub fn defaults() -> Vec<Metric> {
        DEFAULT_METRICS.iter().map(|m| Metric::well_known(*m)).collect()
    }

    pub fn kind(&self) -> &MetricKind {
        &self.kind
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn is_well_known(&self) -> bool {
        matches!(self.kind, MetricKind::WellKnown(_))
    }

    /// Identifier as sent to and received from the platform
    pub fn to_wire_form(&self, include_params: bool) -> String {
        let name = match &self.kind {
            MetricKind::WellKnown(metric) => metric.raw_name(),
            MetricKind::Custom(raw) => raw.clone(),
        };

        if include_params && !self.params.is_empty() {
            format!("{}:{}", name, self.params.join(":"))
        } else {
            name
        }
    }

    /// Human readable label, used as column header
    pub fn to_display_form(&self, include_params: bool) -> String {
        let name = match &self.kind {
            MetricKind::WellKnown(metric) => metric.display_name().to_string(),
            MetricKind::Custom(raw) => custom_label(raw).to_string(),
        };

        if include_params && !self.params.is_empty() {
            format!("{} [{}]", name, self.params.join(" "))
        } else {
            name
        }
    }

    /// Name to pass to `--metric`, or `-` for custom metrics
    pub fn to_param_form(&self) -> &str {
        match &self.kind {
            MetricKind::WellKnown(metric) => metric.param_name(),
            MetricKind::Custom(_) => NO_PARAM,
        }
    }
}

/// Short label for platform generated identifiers that embed hashes or ids
fn custom_label(raw: &str) -> &str {
    if raw.contains("__li_url_") {
        "url"
    } else if raw.contains("__li_page_") {
        "page"
    } else if raw.contains("__server_metric_") {
        "server metric"
    } else if raw.contains("__custom_") {
        "custom"
    } else {
        raw
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire_form(true))
    }
}

impl Ord for Metric {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_wire_form(true)
            .cmp(&other.to_wire_form(true))
            .then_with(|| self.params.cmp(&other.params))
    }
}

impl PartialOrd for Metric {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Parse selectors from `--metric` and `--raw_metric`, falling back to the
/// default set, sorted by wire form with duplicates removed
pub fn resolve_metrics<S: AsRef<str>>(selectors: &[S]) -> Vec<Metric> {
    let mut metrics: Vec<Metric> = selectors.iter().map(|s| Metric::parse(s.as_ref())).collect();

    if metrics.is_empty() {
        metrics = Metric::defaults();
    }

    metrics.sort();
    metrics.dedup();
    metrics
}
