use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::{Answer, CriteriaScore, Nomination, NominationStatus, QuestionType};

/// Answer payload as sent by clients.
///
/// Clients send whichever keys fit the question; the criterion's question type
/// decides which of them are kept.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct AnswerInput {
    pub text: Option<String>,
    pub selected: Option<String>,
    pub selected_list: Option<Vec<String>>,
    pub image_url: Option<String>,
}

impl AnswerInput {
    pub fn into_answer(self, question_type: QuestionType) -> Answer {
        match question_type {
            QuestionType::Text => Answer::Text { text: self.text },
            QuestionType::SingleSelect => Answer::SingleSelect {
                selected: self.selected,
            },
            QuestionType::MultiSelect => Answer::MultiSelect {
                selected_list: self.selected_list,
            },
            QuestionType::TextWithImage => Answer::TextWithImage {
                text: self.text,
                image_url: self.image_url,
            },
        }
    }
}

/// One entry of a submission: an answer, a legacy score, or both
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CriteriaAnswerInput {
    pub criteria_id: Uuid,

    #[validate(range(min = 1, max = 10, message = "Score must be between 1 and 10"))]
    pub score: Option<i32>,

    pub comment: Option<String>,

    pub answer: Option<AnswerInput>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SubmitNominationRequest {
    pub cycle_id: Uuid,

    pub nominee_user_id: Uuid,

    #[validate(nested)]
    #[serde(default)]
    pub scores: Vec<CriteriaAnswerInput>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct NominationFilter {
    pub cycle_id: Option<Uuid>,
    pub nominee_user_id: Option<Uuid>,
    pub submitted_by: Option<Uuid>,
    pub status: Option<NominationStatus>,
}

/// A nomination together with its answers
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct NominationDetail {
    #[serde(flatten)]
    pub nomination: Nomination,
    pub answers: Vec<CriteriaScore>,
}
