//! Templated sentences served when the upstream model cannot answer.

use crate::{humanize_label, normalize_cast};
use rand::Rng;

/// Number of fallback templates.
pub const FALLBACK_TEMPLATE_COUNT: usize = 3;

const DIVERSE_SUFFIX: &str = " Trying a fresh angle today ✨";
const STANDARD_SUFFIX: &str = " ✨";

fn render(index: usize, mood: &str, category: &str, suffix: &str) -> String {
    match index % FALLBACK_TEMPLATE_COUNT {
        0 => format!(
            "Feeling {mood} today and keeping it simple. A little {category} energy for everyone here.{suffix}"
        ),
        1 => format!("{mood} mood, {category} on my mind. Wishing you all a good one.{suffix}"),
        _ => format!(
            "Today's vibe is {mood}. Sharing some {category} thoughts with the timeline.{suffix}"
        ),
    }
}

/// Every sentence [`fallback_text`] can produce for these inputs.
///
/// Keys are humanised before interpolation and each candidate is capped at
/// 280 characters.
pub fn fallback_candidates(mood: &str, category: &str, diverse: bool) -> Vec<String> {
    let mood = humanize_label(mood);
    let category = humanize_label(category);
    let suffix = if diverse {
        DIVERSE_SUFFIX
    } else {
        STANDARD_SUFFIX
    };
    (0..FALLBACK_TEMPLATE_COUNT)
        .map(|index| normalize_cast(&render(index, &mood, &category, suffix)))
        .collect()
}

/// Picks one fallback sentence at random.
///
/// # Examples
///
/// ```
/// use moodcaster_core::{fallback_candidates, fallback_text};
///
/// let text = fallback_text("calm", "good_morning", false, &mut rand::thread_rng());
/// assert!(fallback_candidates("calm", "good_morning", false).contains(&text));
/// ```
pub fn fallback_text<R: Rng + ?Sized>(
    mood: &str,
    category: &str,
    diverse: bool,
    rng: &mut R,
) -> String {
    let index = rng.gen_range(0..FALLBACK_TEMPLATE_COUNT);
    let mut candidates = fallback_candidates(mood, category, diverse);
    candidates.swap_remove(index)
}
