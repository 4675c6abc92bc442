use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct LoadStep {
    duration: u64,
    users: u64,
}

/// One-line summary of a test configuration's load schedule, e.g.
/// `50 users 1s; 100 users 2s`. Returns `-` for anything unreadable.
pub fn summarize_config(config: &Value) -> String {
    let steps = config
        .get("load_schedule")
        .cloned()
        .and_then(|schedule| serde_json::from_value::<Vec<LoadStep>>(schedule).ok());

    match steps {
        Some(steps) if !steps.is_empty() => steps
            .iter()
            .map(|step| format!("{} users {}s", step.users, step.duration))
            .collect::<Vec<_>>()
            .join("; "),
        _ => "-".to_string(),
    }
}
