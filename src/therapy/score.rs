use serde::Serialize;

/// Words that signal advice nobody needed.
pub const CLICHE_WORDS: [&str; 6] = ["just", "try", "maybe", "simply", "obviously", "clearly"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UselessnessRating {
    #[serde(rename = "🔥 Maximum Uselessness Achieved")]
    MaxUseless,
    #[serde(rename = "🍕 Pizza-tier Advice")]
    PizzaTier,
    #[serde(rename = "🤷 Mildly Unhelpful")]
    MildlyUnhelpful,
    #[serde(rename = "😴 Surprisingly Reasonable")]
    SurprisinglyReasonable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Breakdown {
    pub cliches: usize,
    pub rhetorical_questions: usize,
    pub sarcasm_level: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub score: f64,
    pub rating: UselessnessRating,
    pub breakdown: Breakdown,
}

/// Rate how unhelpful a response is, purely from surface features.
/// Deterministic and idempotent for identical text.
///
/// Each cliché word counts at most once (case-insensitive substring);
/// sarcasm is ellipses plus literal "Really?" occurrences.
pub fn score(text: &str) -> ScoreBreakdown {
    let lowered = text.to_lowercase();

    let cliches = CLICHE_WORDS
        .iter()
        .filter(|word| lowered.contains(*word))
        .count();
    let rhetorical_questions = text.matches('?').count();
    let sarcasm_level = text.matches("...").count() + text.matches("Really?").count();

    let raw = 0.2 * cliches as f64 + 0.3 * rhetorical_questions as f64 + 0.4 * sarcasm_level as f64;
    let score = raw.min(1.0);

    let rating = if score >= 0.8 {
        UselessnessRating::MaxUseless
    } else if score >= 0.6 {
        UselessnessRating::PizzaTier
    } else if score >= 0.4 {
        UselessnessRating::MildlyUnhelpful
    } else {
        UselessnessRating::SurprisinglyReasonable
    };

    ScoreBreakdown {
        score,
        rating,
        breakdown: Breakdown {
            cliches,
            rhetorical_questions,
            sarcasm_level,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoring_is_deterministic() {
        let text = "Have you tried... not being like this?";
        assert_eq!(score(text), score(text));
    }

    #[test]
    fn clean_text_is_surprisingly_reasonable() {
        let result = score("You should talk to someone who can help.");
        assert_eq!(result.score, 0.0);
        assert_eq!(result.rating, UselessnessRating::SurprisinglyReasonable);
        assert_eq!(
            result.breakdown,
            Breakdown {
                cliches: 0,
                rhetorical_questions: 0,
                sarcasm_level: 0
            }
        );
    }

    #[test]
    fn saturated_text_clamps_to_one() {
        // cliches: just, try, maybe = 3; questions = 2; ellipsis = 1.
        // raw = 0.6 + 0.6 + 0.4 = 1.6, clamped to 1.0.
        let result = score("Just try? Maybe try? ...");
        assert_eq!(
            result.breakdown,
            Breakdown {
                cliches: 3,
                rhetorical_questions: 2,
                sarcasm_level: 1
            }
        );
        assert_eq!(result.score, 1.0);
        assert_eq!(result.rating, UselessnessRating::MaxUseless);
    }

    #[test]
    fn each_cliche_word_counts_once() {
        let result = score("just just just just");
        assert_eq!(result.breakdown.cliches, 1);
        assert!((result.score - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn really_question_counts_as_sarcasm_and_question() {
        let result = score("Really? That happened?");
        assert_eq!(result.breakdown.rhetorical_questions, 2);
        assert_eq!(result.breakdown.sarcasm_level, 1);
        // 0.3*2 + 0.4*1 = 1.0
        assert_eq!(result.rating, UselessnessRating::MaxUseless);
    }

    #[test]
    fn mid_tiers_hit_their_thresholds() {
        // two cliches, nothing else: 0.4 exactly.
        let mild = score("maybe simply breathe");
        assert_eq!(mild.rating, UselessnessRating::MildlyUnhelpful);

        // three cliches: 0.6 exactly.
        let pizza = score("just maybe simply");
        assert_eq!(pizza.rating, UselessnessRating::PizzaTier);
    }

    #[test]
    fn cliche_matching_ignores_case() {
        assert_eq!(score("OBVIOUSLY.").breakdown.cliches, 1);
    }
}
