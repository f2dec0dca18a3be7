//! Keyword heuristic.
//!
//! Counts how many clutter terms appear (case-insensitively, as substrings)
//! in an excerpt. Each distinct term adds [`KEYWORD_WEIGHT`]; the total is
//! capped at `1.0`.

use super::Score;

/// Terms that suggest promotional or junk mail.
pub const CLUTTER_KEYWORDS: [&str; 16] = [
    "unsubscribe",
    "promo",
    "promotion",
    "sale",
    "deal",
    "limited time",
    "earnings",
    "casino",
    "viagra",
    "act now",
    "winner",
    "congratulations",
    "newsletter",
    "marketing",
    "advertisement",
    "no-reply",
];

/// Score contributed by each matching term.
pub const KEYWORD_WEIGHT: f64 = 0.15;

/// Number of distinct clutter terms found in `excerpt`.
#[must_use]
pub fn keyword_hits(excerpt: &str) -> u32 {
    let folded = excerpt.to_lowercase();
    let hits = CLUTTER_KEYWORDS
        .iter()
        .filter(|keyword| folded.contains(*keyword))
        .count();
    u32::try_from(hits).unwrap_or(u32::MAX)
}

/// Heuristic clutter score for `excerpt`.
#[must_use]
pub fn heuristic_score(excerpt: &str) -> Score {
    let raw = f64::from(keyword_hits(excerpt)) * KEYWORD_WEIGHT;
    Score::saturating(raw.min(1.0))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_plain_text_scores_zero() {
        assert_eq!(heuristic_score("Hi, dinner Friday?").value(), 0.0);
        assert_eq!(heuristic_score("").value(), 0.0);
    }

    #[test]
    fn test_hits_are_case_insensitive() {
        assert_eq!(keyword_hits("Unsubscribe now for a special promo deal"), 3);
        assert_eq!(keyword_hits("CONGRATULATIONS WINNER ACT NOW"), 3);
        assert!((heuristic_score("Congratulations winner act now").value() - 0.45).abs() < 1e-9);
    }

    #[test]
    fn test_each_term_counts_once() {
        assert_eq!(keyword_hits("sale sale sale"), 1);
    }

    #[test]
    fn test_substring_matching() {
        // "promotion" matches both "promo" and "promotion".
        assert_eq!(keyword_hits("Our spring promotion ends soon"), 2);
        assert!((heuristic_score("Our spring promotion ends soon").value() - 0.30).abs() < 1e-9);
        assert_eq!(keyword_hits("Sent from no-reply@shop.example"), 1);
        assert_eq!(keyword_hits("Sent from noreply@shop.example"), 0);
    }

    #[test]
    fn test_seven_hits_saturate() {
        let excerpt = CLUTTER_KEYWORDS[..7].join(" ");
        assert_eq!(heuristic_score(&excerpt).value(), 1.0);
    }

    proptest! {
        #[test]
        fn prop_score_in_unit_interval(excerpt in ".{0,200}") {
            let score = heuristic_score(&excerpt).value();
            prop_assert!((0.0..=1.0).contains(&score));
        }

        #[test]
        fn prop_no_keyword_letters_scores_zero(excerpt in "[xzqj0-9 ,.!?]{0,80}") {
            prop_assert_eq!(heuristic_score(&excerpt).value(), 0.0);
        }

        #[test]
        fn prop_adding_a_term_never_lowers_score(
            excerpt in ".{0,120}",
            keyword in proptest::sample::select(CLUTTER_KEYWORDS.to_vec()),
        ) {
            let before = heuristic_score(&excerpt).value();
            let after = heuristic_score(&format!("{excerpt} {keyword}")).value();
            prop_assert!(after >= before);
        }

        #[test]
        fn prop_seven_or_more_terms_is_certain(
            terms in proptest::sample::subsequence(CLUTTER_KEYWORDS.to_vec(), 7..=16),
        ) {
            prop_assert_eq!(heuristic_score(&terms.join(" ")).value(), 1.0);
        }

        #[test]
        fn prop_case_does_not_matter(excerpt in "[a-zA-Z -]{0,80}") {
            prop_assert_eq!(
                keyword_hits(&excerpt.to_uppercase()),
                keyword_hits(&excerpt.to_lowercase())
            );
        }
    }
}
