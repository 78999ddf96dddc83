/// Prompt used when the caller does not supply one
pub const DEFAULT_PROMPT: &str = "Do not add code, images or charts to the response. Only use text and the following instructions.
Using the provided file, generate a metadata summary (no more than 5 sentences) that covers:
  1. Overall purpose or topic of the data.
  2. Sheet names and the year of the information.
  3. Key columns (names and data types) and any important ranges (e.g. date spans, numeric min/max).
  4. One or two notable insights (e.g. dominant category, outlier, or trend).

Be concise but precise. This summary will help decide whether to load and use the file.";

/// The caller's prompt, or [`DEFAULT_PROMPT`] when it is blank
pub fn resolve_prompt(prompt: Option<&str>) -> &str {
    match prompt {
        Some(p) if !p.trim().is_empty() => p,
        _ => DEFAULT_PROMPT,
    }
}
