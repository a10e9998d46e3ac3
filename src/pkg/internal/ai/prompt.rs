/// Truncates on a character count without splitting a UTF-8 sequence.
/// Provider-specific limits keep prompts inside upstream context windows.
pub fn truncate(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Renders must-have criteria tags into a prompt block. Advisory only: the
/// model is told to penalize misses, nothing mechanically enforces it.
pub fn criteria_block(criteria: &[String]) -> String {
    if criteria.is_empty() {
        return String::new();
    }
    let tags = criteria
        .iter()
        .map(|t| format!("- {}", t))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "\nKEY CRITERIA / TAGS (MUST HAVE):\n{}\n\nIMPORTANT: Use these tags to filter candidates. If they miss critical tags, penalize the score.\n",
        tags
    )
}
