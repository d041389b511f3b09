use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::dto::reading_dto::{CreateQuestionPayload, RenderedQuestion};
use crate::models::question_kind::QuestionKind;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateListeningTestPayload {
    #[validate(length(min = 1))]
    pub title: String,
    pub parts: Vec<CreatePartPayload>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePartPayload {
    #[validate(range(min = 1, message = "Part number must be positive"))]
    pub part_number: i64,
    #[validate(length(min = 1, message = "Audio URL is required"))]
    pub audio_url: String,
    pub groups: Vec<CreateGroupPayload>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateGroupPayload {
    #[serde(default)]
    pub question_range: String,
    pub group_type: QuestionKind,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub prose_content: String,
    #[serde(default)]
    pub options_list: String,
    pub questions: Vec<CreateQuestionPayload>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListeningTestDetail {
    pub id: i64,
    pub title: String,
    pub parts: Vec<RenderedPart>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderedPart {
    pub part_number: i64,
    pub audio_url: String,
    pub groups: Vec<RenderedGroup>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderedGroup {
    pub question_range: String,
    pub group_type: QuestionKind,
    pub instructions: String,
    pub image_url: Option<String>,
    pub options_list: Vec<String>,
    pub questions: Vec<RenderedQuestion>,
    pub prose_with_inputs: String,
}
