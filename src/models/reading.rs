use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::question_kind::QuestionKind;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReadingTest {
    pub id: i64,
    pub title: String,
    pub passage_1: String,
    pub passage_2: String,
    pub passage_3: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuestionBlock {
    pub id: i64,
    pub test_id: i64,
    pub passage_number: i64,
    pub instructions: String,
    pub question_type: QuestionKind,
    pub options_list: String,
    pub prose_content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Question {
    pub id: i64,
    pub block_id: i64,
    pub question_number: i64,
    pub question_text: String,
    pub choices: String,
    pub correct_answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserAnswer {
    pub id: i64,
    pub user_id: i64,
    pub question_id: i64,
    pub submitted_answer: String,
    pub is_correct: bool,
    pub submitted_at: DateTime<Utc>,
}
