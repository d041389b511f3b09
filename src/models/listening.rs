use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::question_kind::QuestionKind;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ListeningTest {
    pub id: i64,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ListeningPart {
    pub id: i64,
    pub test_id: i64,
    pub part_number: i64,
    pub audio_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuestionGroup {
    pub id: i64,
    pub part_id: i64,
    pub question_range: String,
    pub group_type: QuestionKind,
    pub instructions: String,
    pub image_url: Option<String>,
    pub prose_content: String,
    pub options_list: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ListeningQuestion {
    pub id: i64,
    pub group_id: i64,
    pub question_number: i64,
    pub question_text: String,
    pub choices: String,
    pub correct_answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ListeningUserAnswer {
    pub id: i64,
    pub user_id: i64,
    pub question_id: i64,
    pub submitted_answer: String,
    pub is_correct: bool,
    pub submitted_at: DateTime<Utc>,
}
