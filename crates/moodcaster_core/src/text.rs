//! Text helpers for cast drafts and labels.

/// Maximum length of a cast, counted in Unicode scalar values.
pub const MAX_CAST_CHARS: usize = 280;

/// Returns the longest prefix of `text` that has at most `max` characters.
///
/// # Examples
///
/// ```
/// use moodcaster_core::truncate_chars;
///
/// assert_eq!(truncate_chars("héllo", 2), "hé");
/// assert_eq!(truncate_chars("hi", 10), "hi");
/// ```
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

/// Trims surrounding whitespace and caps the draft at [`MAX_CAST_CHARS`].
pub fn normalize_cast(text: &str) -> String {
    truncate_chars(text.trim(), MAX_CAST_CHARS).to_string()
}

/// Turns a wire key into a display label.
///
/// Separators (`_` and `-`) become spaces and every word is capitalised.
///
/// # Examples
///
/// ```
/// use moodcaster_core::humanize_label;
///
/// assert_eq!(humanize_label("good_morning"), "Good Morning");
/// assert_eq!(humanize_label("low-key"), "Low Key");
/// ```
pub fn humanize_label(key: &str) -> String {
    key.split(['_', '-'])
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
