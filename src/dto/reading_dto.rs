use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

use crate::models::question_kind::QuestionKind;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateReadingTestPayload {
    #[validate(length(min = 1))]
    pub title: String,
    #[serde(default)]
    pub passage_1: String,
    #[serde(default)]
    pub passage_2: String,
    #[serde(default)]
    pub passage_3: String,
    pub blocks: Vec<CreateBlockPayload>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBlockPayload {
    #[validate(range(min = 1, max = 3, message = "Passage number must be 1, 2 or 3"))]
    pub passage_number: i64,
    #[serde(default)]
    pub instructions: String,
    pub question_type: QuestionKind,
    #[serde(default)]
    pub options_list: String,
    #[serde(default)]
    pub prose_content: String,
    pub questions: Vec<CreateQuestionPayload>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuestionPayload {
    #[validate(range(min = 1, message = "Question number must be positive"))]
    pub question_number: i64,
    #[serde(default)]
    pub question_text: String,
    #[serde(default)]
    pub choices: String,
    #[validate(length(min = 1, message = "Correct answer is required"))]
    pub correct_answer: String,
}

/// Render-ready view of a single test, grouped by passage. The templating
/// collaborator consumes this as-is.
#[derive(Debug, Clone, Serialize)]
pub struct ReadingTestDetail {
    pub id: i64,
    pub title: String,
    pub passage_1: String,
    pub passage_2: String,
    pub passage_3: String,
    pub passage_1_blocks: Vec<RenderedBlock>,
    pub passage_2_blocks: Vec<RenderedBlock>,
    pub passage_3_blocks: Vec<RenderedBlock>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderedBlock {
    pub instructions: String,
    pub question_type: QuestionKind,
    pub options_list: Vec<String>,
    pub questions: Vec<RenderedQuestion>,
    pub prose_with_inputs: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderedQuestion {
    pub id: i64,
    pub question_number: i64,
    pub question_text: String,
    pub choices: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitTestRequest {
    /// Field names are `question_<id>`, values the free-form submissions.
    #[serde(default)]
    pub answers: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitTestResponse {
    pub test_id: i64,
    pub score: i64,
    pub total_questions: i64,
    pub detailed_results: Vec<QuestionResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionResult {
    pub question_number: i64,
    pub question_text: String,
    pub submitted_answer: String,
    pub correct_answer: String,
    pub is_correct: bool,
}
