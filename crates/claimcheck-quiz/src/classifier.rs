//! Rule-based feature classification.
//!
//! Turns one free-text feature into a multiple-choice question by running
//! an ordered list of keyword match-rules against the lower-cased feature
//! text. The first matching rule wins; rule order is observable behavior
//! (a feature mentioning both a side and a color yields the side
//! question), so the table below must not be reordered. When no rule
//! matches, a fallback question is templated from the feature text itself.
//!
//! Classification is pure, deterministic, and total: it never fails for
//! any non-empty feature string and performs no external calls.

use crate::question::{choice_id, Choice, Question};

/// Number of choices every classified question carries.
pub const CHOICES_PER_QUESTION: usize = 4;

/// One priority-ordered classification rule: if any keyword occurs in the
/// lower-cased feature text, the rule's question template applies.
#[derive(Debug, Clone, Copy)]
pub struct MatchRule {
    /// Substrings probed against the lower-cased feature.
    keywords: &'static [&'static str],
    /// Question text for this rule.
    text: &'static str,
    /// Choice texts in presentation order; the first is correct.
    choices: &'static [&'static str; CHOICES_PER_QUESTION],
}

impl MatchRule {
    /// Returns `true` if any keyword occurs in `lowered`.
    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|keyword| lowered.contains(keyword))
    }
}

/// The classification rules, highest priority first.
const RULES: &[MatchRule] = &[
    MatchRule {
        keywords: &["left", "right"],
        text: "Which side is described as different?",
        choices: &["Left", "Right", "Both", "Neither"],
    },
    MatchRule {
        keywords: &["black", "blue", "red"],
        text: "What is the main color of the item?",
        choices: &["Black", "Blue", "Red", "Other"],
    },
    MatchRule {
        keywords: &["scratch", "crack"],
        text: "What kind of damage does the item have?",
        choices: &["Scratch", "Crack", "Dent", "No visible damage"],
    },
];

/// Classifies one feature into a question.
///
/// `ordinal` is the feature's position within the quiz and produces the
/// question id `q{ordinal + 1}`. The first choice of every template is
/// the correct one, so `correct_choice_id` is always `a`.
#[must_use]
pub fn classify(feature: &str, ordinal: usize) -> Question {
    let lowered = feature.to_lowercase();

    for rule in RULES {
        if rule.matches(&lowered) {
            return build_question(
                ordinal,
                rule.text.to_string(),
                rule.choices.iter().map(|text| (*text).to_string()).collect(),
            );
        }
    }

    fallback_question(feature, ordinal)
}

/// Templates the fallback question from the raw feature text.
///
/// The feature itself is the first (correct) choice; the remaining slots
/// are padded with a slightly-varied copy until the conventional choice
/// count is reached.
fn fallback_question(feature: &str, ordinal: usize) -> Question {
    let text = format!("Which detail best matches this item? ({feature})");

    let mut choices = vec![feature.to_string()];
    while choices.len() < CHOICES_PER_QUESTION {
        choices.push(format!("{feature} (slightly different)"));
    }

    build_question(ordinal, text, choices)
}

/// Assembles a question from ordered choice texts, assigning letter ids
/// in presentation order and marking the first choice correct.
fn build_question(ordinal: usize, text: String, choice_texts: Vec<String>) -> Question {
    let choices: Vec<Choice> = choice_texts
        .into_iter()
        .enumerate()
        .filter_map(|(index, text)| choice_id(index).map(|id| Choice { id, text }))
        .collect();

    Question {
        id: format!("q{}", ordinal + 1),
        text,
        choices,
        correct_choice_id: "a".to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn choice_texts(question: &Question) -> Vec<&str> {
        question
            .choices
            .iter()
            .map(|choice| choice.text.as_str())
            .collect()
    }

    #[test]
    fn test_side_rule() {
        let q = classify("scuff on the left buckle", 0);
        assert_eq!(q.id, "q1");
        assert_eq!(q.text, "Which side is described as different?");
        assert_eq!(choice_texts(&q), vec!["Left", "Right", "Both", "Neither"]);
        assert_eq!(q.correct_choice_id, "a");
    }

    #[test]
    fn test_color_rule() {
        let q = classify("Color: matte black", 1);
        assert_eq!(q.id, "q2");
        assert_eq!(q.text, "What is the main color of the item?");
        assert_eq!(choice_texts(&q), vec!["Black", "Blue", "Red", "Other"]);
    }

    #[test]
    fn test_damage_rule() {
        let q = classify("small crack near the hinge", 2);
        assert_eq!(q.id, "q3");
        assert_eq!(q.text, "What kind of damage does the item have?");
        assert_eq!(
            choice_texts(&q),
            vec!["Scratch", "Crack", "Dent", "No visible damage"]
        );
    }

    #[test]
    fn test_fallback_uses_verbatim_feature() {
        let q = classify("Brand: Nike", 0);
        assert_eq!(q.text, "Which detail best matches this item? (Brand: Nike)");
        assert_eq!(q.choices.len(), CHOICES_PER_QUESTION);
        assert_eq!(q.choices[0].text, "Brand: Nike");
        assert_eq!(q.choices[1].text, "Brand: Nike (slightly different)");
        assert_eq!(q.choices[3].text, "Brand: Nike (slightly different)");
        assert_eq!(q.correct_choice_id, "a");
    }

    #[test]
    fn test_side_rule_outranks_color_rule() {
        // Ambiguous input mentioning both a side and a color must yield
        // the side question.
        let q = classify("left strap is black", 0);
        assert_eq!(q.text, "Which side is described as different?");
    }

    #[test]
    fn test_color_rule_outranks_damage_rule() {
        let q = classify("blue case with a scratch", 0);
        assert_eq!(q.text, "What is the main color of the item?");
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let q = classify("SCRATCH ON THE LID", 0);
        assert_eq!(q.text, "What kind of damage does the item have?");
    }

    #[test]
    fn test_keyword_matches_inside_words() {
        // Substring semantics: "bright" contains "right".
        let q = classify("bright yellow sticker", 0);
        assert_eq!(q.text, "Which side is described as different?");
    }

    #[test]
    fn test_choice_ids_are_letter_prefix() {
        let q = classify("Color: matte black", 0);
        let ids: Vec<&str> = q.choices.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_every_rule_produces_valid_question() {
        for feature in ["left side", "red dot", "cracked corner", "serial 1234"] {
            let q = classify(feature, 0);
            q.validate().unwrap();
        }
    }
}
