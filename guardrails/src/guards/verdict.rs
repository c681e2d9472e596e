use guardgate_core::types::guardrails::{GuardError, GuardVerdict};

/// Parses the raw completion text of a Llama Guard backend.
///
/// The first line reads `safe` or `unsafe`. An unsafe verdict carries a second
/// line with comma separated category codes such as `S1,S10`.
pub fn parse_verdict(raw: &str) -> Result<GuardVerdict, GuardError> {
    let text = raw.trim();
    let mut lines = text.lines();
    let first = lines.next().unwrap_or_default().trim();

    if first == "unsafe" {
        let codes: Vec<String> = lines
            .next()
            .unwrap_or_default()
            .split(',')
            .map(|code| code.trim())
            .filter(|code| !code.is_empty())
            .map(|code| code.to_string())
            .collect();

        if codes.is_empty() {
            return Err(GuardError::MalformedVerdict(format!(
                "unsafe verdict without categories: {text:?}"
            )));
        }

        return Ok(GuardVerdict::Unsafe {
            violated_categories: codes,
        });
    }

    if text.starts_with("safe") {
        return Ok(GuardVerdict::Safe);
    }

    Err(GuardError::MalformedVerdict(format!(
        "expected 'safe' or 'unsafe', got {text:?}"
    )))
}
