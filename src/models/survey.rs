use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Recorded for a question the user skipped.
pub const UNANSWERED: &str = "unanswered";
/// Recorded when the feedback box is left blank.
pub const NO_FEEDBACK: &str = "none given";

pub const QUESTION_COUNT: usize = 8;

/// The rating scale shared by every question.
pub const CHOICES: [&str; 4] = ["Excellent", "Good", "Fair", "Poor"];

pub struct Question {
    pub key: &'static str,
    pub prompt: &'static str,
}

pub const QUESTIONS: [Question; QUESTION_COUNT] = [
    Question { key: "p1", prompt: "How would you rate your overall experience?" },
    Question { key: "p2", prompt: "How would you rate the quality of the food?" },
    Question { key: "p3", prompt: "How would you rate the speed of service?" },
    Question { key: "p4", prompt: "How friendly was our staff?" },
    Question { key: "p5", prompt: "How clean were our facilities?" },
    Question { key: "p6", prompt: "How would you rate the value for money?" },
    Question { key: "p7", prompt: "How accurate was your order?" },
    Question { key: "p8", prompt: "How likely are you to visit us again?" },
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurveyResponse {
    pub id: i64,
    pub registration_id: i64,
    pub answers: Vec<String>,
    pub feedback: String,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSurveyResponse {
    pub registration_id: i64,
    pub answers: [String; QUESTION_COUNT],
    pub feedback: String,
    pub submitted_at: DateTime<Utc>,
}

/// Raw survey answers; every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SurveyInput {
    pub p1: Option<String>,
    pub p2: Option<String>,
    pub p3: Option<String>,
    pub p4: Option<String>,
    pub p5: Option<String>,
    pub p6: Option<String>,
    pub p7: Option<String>,
    pub p8: Option<String>,
    pub feedback: Option<String>,
}

impl SurveyInput {
    fn raw_answers(&self) -> [Option<&str>; QUESTION_COUNT] {
        [
            self.p1.as_deref(),
            self.p2.as_deref(),
            self.p3.as_deref(),
            self.p4.as_deref(),
            self.p5.as_deref(),
            self.p6.as_deref(),
            self.p7.as_deref(),
            self.p8.as_deref(),
        ]
    }

    /// Answers in question order, normalized to a valid choice or `UNANSWERED`.
    pub fn answers(&self) -> [String; QUESTION_COUNT] {
        let raw = self.raw_answers();
        std::array::from_fn(|i| normalize_answer(QUESTIONS[i].key, raw[i]))
    }

    pub fn feedback(&self) -> String {
        match self.feedback.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => NO_FEEDBACK.to_string(),
        }
    }

    /// Choice currently selected for question `index`, if it is a valid one.
    pub fn selected(&self, index: usize) -> Option<&'static str> {
        let raw = self.raw_answers().get(index).copied().flatten()?;
        CHOICES.iter().copied().find(|c| *c == raw.trim())
    }
}

fn normalize_answer(key: &str, raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        None | Some("") => UNANSWERED.to_string(),
        Some(value) => match CHOICES.iter().find(|c| **c == value) {
            Some(choice) => choice.to_string(),
            None => {
                log::warn!("Discarding unknown answer '{value}' for {key}");
                UNANSWERED.to_string()
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_all_unanswered() {
        let input = SurveyInput::default();
        assert!(input.answers().iter().all(|a| a == UNANSWERED));
        assert_eq!(input.feedback(), NO_FEEDBACK);
    }

    #[test]
    fn unknown_choice_is_recorded_as_unanswered() {
        let input = SurveyInput {
            p1: Some("Excellent".into()),
            p2: Some("Amazing".into()),
            feedback: Some("  ".into()),
            ..Default::default()
        };
        let answers = input.answers();
        assert_eq!(answers[0], "Excellent");
        assert_eq!(answers[1], UNANSWERED);
        assert_eq!(input.feedback(), NO_FEEDBACK);
        assert_eq!(input.selected(0), Some("Excellent"));
        assert_eq!(input.selected(1), None);
    }
}
