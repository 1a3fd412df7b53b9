use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use utoipa::ToSchema;
use uuid::Uuid;

/// Question type a criterion asks the submitter to answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Text,
    SingleSelect,
    MultiSelect,
    TextWithImage,
}

fn default_required() -> bool {
    true
}

/// Question configuration stored on a criterion, tagged by `type`.
///
/// ```json
/// {"type": "multi_select", "required": true, "options": ["Python", "React"]}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CriteriaConfig {
    Text {
        #[serde(default = "default_required")]
        required: bool,
    },
    SingleSelect {
        #[serde(default = "default_required")]
        required: bool,
        #[serde(default)]
        options: Vec<String>,
    },
    MultiSelect {
        #[serde(default = "default_required")]
        required: bool,
        #[serde(default)]
        options: Vec<String>,
    },
    TextWithImage {
        #[serde(default = "default_required")]
        required: bool,
        #[serde(default)]
        image_required: bool,
    },
}

impl CriteriaConfig {
    pub fn question_type(&self) -> QuestionType {
        match self {
            Self::Text { .. } => QuestionType::Text,
            Self::SingleSelect { .. } => QuestionType::SingleSelect,
            Self::MultiSelect { .. } => QuestionType::MultiSelect,
            Self::TextWithImage { .. } => QuestionType::TextWithImage,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Criteria {
    pub criteria_id: Uuid,
    pub cycle_id: Uuid,
    pub name: String,
    pub weight: Decimal,
    pub description: Option<String>,
    pub is_active: bool,
    #[schema(value_type = Option<CriteriaConfig>)]
    pub config: Option<Json<CriteriaConfig>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Criteria {
    /// Criteria created before question types existed behave as free text.
    pub fn question_type(&self) -> QuestionType {
        self.config
            .as_ref()
            .map(|c| c.question_type())
            .unwrap_or(QuestionType::Text)
    }
}
