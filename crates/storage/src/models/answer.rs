use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// A submitter's answer to one criterion, shaped by the criterion's question type.
///
/// Serialized without a discriminator: the question type lives on the
/// criterion's config, so only the keys relevant to it are stored.
/// Every field is optional: partial answers are stored as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum Answer {
    Text {
        #[serde(skip_serializing_if = "Option::is_none")]
        text: Option<String>,
    },
    SingleSelect {
        #[serde(skip_serializing_if = "Option::is_none")]
        selected: Option<String>,
    },
    MultiSelect {
        #[serde(skip_serializing_if = "Option::is_none")]
        selected_list: Option<Vec<String>>,
    },
    TextWithImage {
        #[serde(skip_serializing_if = "Option::is_none")]
        text: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        image_url: Option<String>,
    },
}

#[derive(Deserialize)]
struct StoredAnswer {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    selected: Option<String>,
    #[serde(default)]
    selected_list: Option<Vec<String>>,
    #[serde(default)]
    image_url: Option<String>,
}

impl<'de> Deserialize<'de> for Answer {
    /// Stored answers carry only the keys of their question type, so the
    /// variant follows from whichever key is present.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let stored = StoredAnswer::deserialize(deserializer)?;
        let answer = if stored.selected_list.is_some() {
            Self::MultiSelect {
                selected_list: stored.selected_list,
            }
        } else if stored.selected.is_some() {
            Self::SingleSelect {
                selected: stored.selected,
            }
        } else if stored.image_url.is_some() {
            Self::TextWithImage {
                text: stored.text,
                image_url: stored.image_url,
            }
        } else {
            Self::Text { text: stored.text }
        };
        Ok(answer)
    }
}
