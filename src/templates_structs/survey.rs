use askama::Template;

use super::PageContext;
use crate::models::survey::{CHOICES, QUESTIONS};
use crate::models::SurveyInput;

pub struct ChoiceOption {
    pub value: &'static str,
    pub checked: bool,
}

pub struct QuestionRow {
    pub key: &'static str,
    pub prompt: &'static str,
    pub options: Vec<ChoiceOption>,
}

impl QuestionRow {
    /// Rows for every question, with `input`'s choices pre-checked.
    pub fn all(input: &SurveyInput) -> Vec<QuestionRow> {
        QUESTIONS
            .iter()
            .enumerate()
            .map(|(i, q)| {
                let selected = input.selected(i);
                QuestionRow {
                    key: q.key,
                    prompt: q.prompt,
                    options: CHOICES
                        .iter()
                        .map(|&value| ChoiceOption { value, checked: selected == Some(value) })
                        .collect(),
                }
            })
            .collect()
    }
}

#[derive(Template)]
#[template(path = "survey.html")]
pub struct SurveyTemplate {
    pub ctx: PageContext,
    /// `None` renders the missing-registration state without a usable form.
    pub ticket_id: Option<String>,
    pub questions: Vec<QuestionRow>,
    pub feedback: String,
    pub banner: Option<String>,
    pub redirect_after_secs: Option<u64>,
}
