//! Keyword-based category and title extraction.
//!
//! A deliberately bounded heuristic: the conversational understanding
//! service lives outside the core, but simple keyword hits are enough to
//! attach a category and a clean title to a resolved time range.

use once_cell::sync::Lazy;
use regex::Regex;

/// Category keyword lists, checked in priority order (highest first) so a
/// text naming both "exam" and "study" lands in the stronger category.
const CATEGORY_KEYWORDS: [(&str, &[&str]); 5] = [
    ("Exam", &["exam", "test", "quiz", "midterm", "final"]),
    ("Study", &["study", "review", "homework", "assignment", "reading"]),
    (
        "Gym",
        &["gym", "workout", "exercise", "fitness", "training", "run", "jog"],
    ),
    (
        "Social",
        &[
            "meet", "meeting", "hangout", "party", "dinner", "lunch", "coffee", "friend", "sleep",
            "rest", "nap", "bedtime", "wake", "call",
        ],
    ),
    ("Gaming", &["game", "gaming", "play", "stream", "esports"]),
];

static CATEGORY_RES: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    CATEGORY_KEYWORDS
        .iter()
        .map(|(category, keywords)| {
            let alternation = keywords.join("|");
            let re = Regex::new(&format!(r"\b(?:{alternation})\b"))
                .expect("valid category keyword regex");
            (*category, re)
        })
        .collect()
});

static TEMPORAL_PHRASE_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\b(tomorrow|today|tonight|now|currently|right now)\b",
        r"\b(next|this|last)\s+(week|month|year|monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b",
        r"\b(in|at|on)\s+\d+\s*(am|pm|hour|hours|minute|minutes|day|days|week|weeks)?\b",
        r"\b(morning|afternoon|evening|night)\b",
        r"\b\d{1,2}:\d{2}\s*(am|pm)?\b",
    ]
    .into_iter()
    .map(|pattern| {
        Regex::new(&format!("(?i){pattern}")).expect("valid temporal phrase regex")
    })
    .collect()
});

static ACTION_VERB_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(schedule|add|create|make|set up|book)\s+")
        .expect("valid action verb regex")
});

static WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Detects a category from keyword hits; `None` when nothing matches.
pub fn extract_category(text: &str) -> Option<&'static str> {
    let text_lower = text.to_lowercase();
    CATEGORY_RES
        .iter()
        .find(|(_, re)| re.is_match(&text_lower))
        .map(|(category, _)| *category)
}

/// Extracts a task title by stripping temporal phrases and leading action
/// verbs. Falls back to the trimmed original when nothing is left.
pub fn extract_task_title(text: &str) -> String {
    let mut cleaned = text.to_string();
    for re in TEMPORAL_PHRASE_RES.iter() {
        cleaned = re.replace_all(&cleaned, "").into_owned();
    }
    cleaned = ACTION_VERB_RE.replace(&cleaned, "").into_owned();
    let cleaned = WHITESPACE_RE.replace_all(&cleaned, " ").trim().to_string();

    if cleaned.is_empty() {
        text.trim().to_string()
    } else {
        cleaned
    }
}

/// Whether the input is too thin to schedule from and needs clarification.
pub fn is_ambiguous(text: &str) -> bool {
    if text.trim().len() < 3 {
        return true;
    }

    extract_category(text).is_none() && extract_task_title(text).trim().len() < 3
}

#[cfg(test)]
mod tests {
    use super::{extract_category, extract_task_title, is_ambiguous};

    #[test]
    fn category_keywords_hit_in_priority_order() {
        assert_eq!(extract_category("algebra exam on friday"), Some("Exam"));
        assert_eq!(extract_category("study session for the exam review"), Some("Exam"));
        assert_eq!(extract_category("gym workout"), Some("Gym"));
        assert_eq!(extract_category("play some games tonight"), Some("Gaming"));
        assert_eq!(extract_category("water the plants"), None);
    }

    #[test]
    fn title_strips_temporal_noise_and_action_verbs() {
        let title = extract_task_title("schedule gym workout tomorrow evening");
        assert_eq!(title, "gym workout");
    }

    #[test]
    fn title_falls_back_to_original_when_emptied() {
        let title = extract_task_title("tomorrow evening");
        assert_eq!(title, "tomorrow evening");
    }

    #[test]
    fn short_or_contentless_input_is_ambiguous() {
        assert!(is_ambiguous("  x "));
        assert!(!is_ambiguous("dinner with ana friday"));
    }
}
