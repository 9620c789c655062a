use std::sync::LazyLock;

use regex::Regex;

static ANSWER_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"id=['"](answer[^'"]*)['"]"#).unwrap());

/// Payloads of the `data:` lines of an event-stream body, in order.
pub fn data_lines(body: &str) -> Vec<&str> {
    body.lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(|data| data.strip_prefix(' ').unwrap_or(data))
        .collect()
}

/// Id of the first answer node in an HTML fragment.
pub fn answer_id(html: &str) -> Option<&str> {
    ANSWER_ID
        .captures(html)
        .and_then(|captures| captures.get(1))
        .map(|id| id.as_str())
}
