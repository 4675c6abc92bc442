/// Category of a test run result series, as numbered by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultType {
    Common,
    Url,
    LiveFeedback,
    Log,
    CustomMetric,
    Page,
    Dtp,
    System,
    ServerMetric,
    Integration,
}

const RESULT_TYPES: &[(ResultType, u8, &str)] = &[
    (ResultType::Common, 1, "common"),
    (ResultType::Url, 2, "url"),
    (ResultType::LiveFeedback, 3, "live_feedback"),
    (ResultType::Log, 4, "log"),
    (ResultType::CustomMetric, 5, "custom_metric"),
    (ResultType::Page, 6, "page"),
    (ResultType::Dtp, 7, "dtp"),
    (ResultType::System, 8, "system"),
    (ResultType::ServerMetric, 9, "server_metric"),
    (ResultType::Integration, 10, "integration"),
];

impl ResultType {
    pub fn from_code(code: u8) -> Option<Self> {
        RESULT_TYPES
            .iter()
            .find(|(_, c, _)| *c == code)
            .map(|(t, _, _)| *t)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        RESULT_TYPES
            .iter()
            .find(|(_, _, n)| n.eq_ignore_ascii_case(name))
            .map(|(t, _, _)| *t)
    }

    pub fn code(self) -> u8 {
        RESULT_TYPES
            .iter()
            .find(|(t, _, _)| *t == self)
            .map(|(_, c, _)| *c)
            .unwrap_or(0)
    }

    pub fn name(self) -> &'static str {
        RESULT_TYPES
            .iter()
            .find(|(t, _, _)| *t == self)
            .map(|(_, _, n)| *n)
            .unwrap_or("unknown")
    }

    /// Names accepted by `metric list --type`
    pub fn names() -> Vec<&'static str> {
        RESULT_TYPES.iter().map(|(_, _, n)| *n).collect()
    }
}

/// Display text for a raw type code, tolerating codes this client does not know
pub fn type_code_text(code: u8) -> String {
    ResultType::from_code(code)
        .map(|t| t.name().to_string())
        .unwrap_or_else(|| format!("type {}", code))
}
