use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct UserStatisticsRow {
    pub id: i64,
    pub username: String,
    pub is_blocked: bool,
    pub reading_tests: i64,
    pub reading_avg: i64,
    pub listening_tests: i64,
    pub listening_avg: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserDetailResponse {
    pub id: i64,
    pub username: String,
    pub reading_tests_data: Vec<TestHistory>,
    pub listening_tests_data: Vec<TestHistory>,
}

/// Every historical answer for one test, with running totals. Ordered by
/// test id, answers by question number.
#[derive(Debug, Clone, Serialize)]
pub struct TestHistory {
    pub test_id: i64,
    pub test_title: String,
    pub correct: i64,
    pub total: i64,
    pub answers: Vec<AnswerHistory>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnswerHistory {
    pub question_number: i64,
    pub question_text: String,
    pub submitted_answer: String,
    pub correct_answer: String,
    pub is_correct: bool,
    pub submitted_at: DateTime<Utc>,
}
