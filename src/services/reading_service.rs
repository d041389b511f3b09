use std::collections::{HashMap, HashSet};

use chrono::Utc;
use sqlx::SqlitePool;
use validator::Validate;

use crate::dto::reading_dto::{
    CreateReadingTestPayload, QuestionResult, ReadingTestDetail, RenderedBlock, RenderedQuestion,
    SubmitTestRequest, SubmitTestResponse,
};
use crate::error::{Error, Result};
use crate::models::reading::{Question, QuestionBlock, ReadingTest};
use crate::services::grading::{self, AnswerKey};
use crate::utils::format::format_text;

#[derive(Clone)]
pub struct ReadingService {
    pool: SqlitePool,
}

impl ReadingService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_tests(&self) -> Result<Vec<ReadingTest>> {
        let tests = sqlx::query_as::<_, ReadingTest>(
            r#"SELECT * FROM reading_tests ORDER BY created_at DESC, id DESC"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(tests)
    }

    pub async fn get_test(&self, test_id: i64) -> Result<ReadingTest> {
        let test =
            sqlx::query_as::<_, ReadingTest>(r#"SELECT * FROM reading_tests WHERE id = ?1"#)
                .bind(test_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(test)
    }

    /// Create a test with its blocks and questions in one transaction.
    /// Question numbers must be unique within the test.
    pub async fn create_test(&self, payload: CreateReadingTestPayload) -> Result<i64> {
        payload.validate()?;
        let mut seen = HashSet::new();
        for block in &payload.blocks {
            block.validate()?;
            for question in &block.questions {
                question.validate()?;
                if !seen.insert(question.question_number) {
                    return Err(Error::BadRequest(format!(
                        "Duplicate question number {} in test",
                        question.question_number
                    )));
                }
            }
        }

        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        let test_id = sqlx::query(
            r#"INSERT INTO reading_tests (title, passage_1, passage_2, passage_3, created_at)
               VALUES (?1, ?2, ?3, ?4, ?5)"#,
        )
        .bind(&payload.title)
        .bind(&payload.passage_1)
        .bind(&payload.passage_2)
        .bind(&payload.passage_3)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        for block in &payload.blocks {
            let block_id = sqlx::query(
                r#"INSERT INTO reading_blocks
                       (test_id, passage_number, instructions, question_type, options_list, prose_content)
                   VALUES (?1, ?2, ?3, ?4, ?5, ?6)"#,
            )
            .bind(test_id)
            .bind(block.passage_number)
            .bind(&block.instructions)
            .bind(block.question_type)
            .bind(&block.options_list)
            .bind(&block.prose_content)
            .execute(&mut *tx)
            .await?
            .last_insert_rowid();

            for question in &block.questions {
                sqlx::query(
                    r#"INSERT INTO reading_questions
                           (block_id, question_number, question_text, choices, correct_answer)
                       VALUES (?1, ?2, ?3, ?4, ?5)"#,
                )
                .bind(block_id)
                .bind(question.question_number)
                .bind(&question.question_text)
                .bind(&question.choices)
                .bind(&question.correct_answer)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        Ok(test_id)
    }

    /// Load the whole hierarchy (one query per level) and produce the
    /// render-ready per-passage structure.
    pub async fn test_detail(&self, test_id: i64) -> Result<ReadingTestDetail> {
        let test = self.get_test(test_id).await?;

        let blocks = sqlx::query_as::<_, QuestionBlock>(
            r#"SELECT * FROM reading_blocks WHERE test_id = ?1 ORDER BY passage_number, id"#,
        )
        .bind(test_id)
        .fetch_all(&self.pool)
        .await?;

        let questions = sqlx::query_as::<_, Question>(
            r#"SELECT q.* FROM reading_questions q
               JOIN reading_blocks b ON q.block_id = b.id
               WHERE b.test_id = ?1
               ORDER BY q.question_number"#,
        )
        .bind(test_id)
        .fetch_all(&self.pool)
        .await?;

        let mut by_block: HashMap<i64, Vec<&Question>> = HashMap::new();
        for question in &questions {
            by_block.entry(question.block_id).or_default().push(question);
        }

        let mut passage_1_blocks = Vec::new();
        let mut passage_2_blocks = Vec::new();
        let mut passage_3_blocks = Vec::new();

        for block in &blocks {
            let block_questions = by_block.remove(&block.id).unwrap_or_default();
            let rendered = render_block(block, &block_questions);
            match block.passage_number {
                1 => passage_1_blocks.push(rendered),
                2 => passage_2_blocks.push(rendered),
                3 => passage_3_blocks.push(rendered),
                _ => continue,
            }
        }

        Ok(ReadingTestDetail {
            id: test.id,
            title: test.title,
            passage_1: test.passage_1,
            passage_2: test.passage_2,
            passage_3: test.passage_3,
            passage_1_blocks,
            passage_2_blocks,
            passage_3_blocks,
        })
    }

    /// Grade a submission and append one answer row per question, inside a
    /// single transaction so a partial result is never visible.
    pub async fn submit_test(
        &self,
        test_id: i64,
        user_id: i64,
        request: &SubmitTestRequest,
    ) -> Result<SubmitTestResponse> {
        self.get_test(test_id).await?;

        let keys = sqlx::query_as::<_, AnswerKey>(
            r#"SELECT q.id AS question_id, q.question_number, q.question_text, q.correct_answer
               FROM reading_questions q
               JOIN reading_blocks b ON q.block_id = b.id
               WHERE b.test_id = ?1
               ORDER BY q.question_number"#,
        )
        .bind(test_id)
        .fetch_all(&self.pool)
        .await?;

        let outcome = grading::grade(&keys, &request.answers);

        let mut tx = self.pool.begin().await?;
        let now = Utc::now();
        for detail in &outcome.details {
            sqlx::query(
                r#"INSERT INTO reading_answers
                       (user_id, question_id, submitted_answer, is_correct, submitted_at)
                   VALUES (?1, ?2, ?3, ?4, ?5)"#,
            )
            .bind(user_id)
            .bind(detail.question_id)
            .bind(&detail.submitted_answer)
            .bind(detail.is_correct)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        Ok(SubmitTestResponse {
            test_id,
            score: outcome.score,
            total_questions: outcome.total_questions,
            detailed_results: outcome
                .details
                .into_iter()
                .map(|d| QuestionResult {
                    question_number: d.question_number,
                    question_text: d.question_text,
                    submitted_answer: d.submitted_answer,
                    correct_answer: d.correct_answer,
                    is_correct: d.is_correct,
                })
                .collect(),
        })
    }
}

/// Reading substitutes blanks for any block that carries prose.
fn render_block(block: &QuestionBlock, questions: &[&Question]) -> RenderedBlock {
    let rendered_questions: Vec<RenderedQuestion> = questions
        .iter()
        .map(|q| RenderedQuestion {
            id: q.id,
            question_number: q.question_number,
            question_text: q.question_text.clone(),
            choices: grading::split_delimited(&q.choices),
        })
        .collect();

    let prose_with_inputs = if block.prose_content.is_empty() {
        String::new()
    } else {
        let numbered: Vec<(i64, i64)> = rendered_questions
            .iter()
            .map(|q| (q.question_number, q.id))
            .collect();
        grading::substitute_blanks(&format_text(&block.prose_content), &numbered)
    };

    RenderedBlock {
        instructions: format_text(&block.instructions),
        question_type: block.question_type,
        options_list: grading::split_delimited(&block.options_list),
        questions: rendered_questions,
        prose_with_inputs,
    }
}
