const MAX_VISIBLE_CHARS: usize = 100;

const SECRET_MARKERS: [&str; 6] = [
    "Bearer ",
    "api-key: ",
    "api_key=",
    "client_secret=",
    "secret=",
    "token=",
];

const REDACTED: &str = "[REDACTED]";

/// Shortens transcript text for log lines and masks anything that looks like a credential.
/// Truncation counts characters so multi-byte transcripts are never split mid code point.
pub fn sanitize_prompt(prompt: &str) -> String {
    let trimmed = prompt.trim();

    if trimmed.is_empty() {
        return String::from("[EMPTY]");
    }

    let total_chars = trimmed.chars().count();
    let visible = if total_chars > MAX_VISIBLE_CHARS {
        let head: String = trimmed.chars().take(MAX_VISIBLE_CHARS).collect();
        format!("{}... ({} chars total)", head, total_chars)
    } else {
        trimmed.to_string()
    };

    SECRET_MARKERS
        .iter()
        .fold(visible, |text, marker| redact_after(&text, marker))
}

/// Replaces the value following every occurrence of `marker`, up to the next delimiter.
fn redact_after(text: &str, marker: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(idx) = rest.find(marker) {
        let value_start = idx + marker.len();
        result.push_str(&rest[..value_start]);

        let value = &rest[value_start..];
        let value_end = value
            .find(|c: char| c.is_whitespace() || matches!(c, '&' | '"' | '\''))
            .unwrap_or(value.len());

        if value.starts_with(REDACTED) {
            result.push_str(&value[..value_end]);
        } else if value_end > 0 {
            result.push_str(REDACTED);
        }
        rest = &value[value_end..];
    }

    result.push_str(rest);
    result
}
