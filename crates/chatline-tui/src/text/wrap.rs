//! Text wrapping.

/// Wrap a plain text string to the specified width.
///
/// Explicit line breaks in the text are kept; blank lines survive as empty
/// strings. Always returns at least one line.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        if paragraph.trim().is_empty() {
            lines.push(String::new());
            continue;
        }
        lines.extend(
            textwrap::wrap(paragraph, width)
                .into_iter()
                .map(std::borrow::Cow::into_owned),
        );
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
