use std::collections::{HashMap, HashSet};

use chrono::Utc;
use sqlx::SqlitePool;
use validator::Validate;

use crate::dto::listening_dto::{
    CreateListeningTestPayload, ListeningTestDetail, RenderedGroup, RenderedPart,
};
use crate::dto::reading_dto::{
    QuestionResult, RenderedQuestion, SubmitTestRequest, SubmitTestResponse,
};
use crate::error::{Error, Result};
use crate::models::listening::{ListeningPart, ListeningQuestion, ListeningTest, QuestionGroup};
use crate::models::question_kind::QuestionKind;
use crate::services::grading::{self, AnswerKey};
use crate::utils::format::format_text;

#[derive(Clone)]
pub struct ListeningService {
    pool: SqlitePool,
}

impl ListeningService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_tests(&self) -> Result<Vec<ListeningTest>> {
        let tests = sqlx::query_as::<_, ListeningTest>(
            r#"SELECT * FROM listening_tests ORDER BY created_at DESC, id DESC"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(tests)
    }

    pub async fn get_test(&self, test_id: i64) -> Result<ListeningTest> {
        let test =
            sqlx::query_as::<_, ListeningTest>(r#"SELECT * FROM listening_tests WHERE id = ?1"#)
                .bind(test_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(test)
    }

    /// Create a test with its parts, groups and questions in one
    /// transaction. Question numbers must be unique within the test (not
    /// across the whole table).
    pub async fn create_test(&self, payload: CreateListeningTestPayload) -> Result<i64> {
        payload.validate()?;
        let mut seen = HashSet::new();
        for part in &payload.parts {
            part.validate()?;
            for group in &part.groups {
                group.validate()?;
                for question in &group.questions {
                    question.validate()?;
                    if !seen.insert(question.question_number) {
                        return Err(Error::BadRequest(format!(
                            "Duplicate question number {} in test",
                            question.question_number
                        )));
                    }
                }
            }
        }

        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        let test_id = sqlx::query(
            r#"INSERT INTO listening_tests (title, created_at) VALUES (?1, ?2)"#,
        )
        .bind(&payload.title)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        for part in &payload.parts {
            let part_id = sqlx::query(
                r#"INSERT INTO listening_parts (test_id, part_number, audio_url)
                   VALUES (?1, ?2, ?3)"#,
            )
            .bind(test_id)
            .bind(part.part_number)
            .bind(&part.audio_url)
            .execute(&mut *tx)
            .await?
            .last_insert_rowid();

            for group in &part.groups {
                let group_id = sqlx::query(
                    r#"INSERT INTO listening_groups
                           (part_id, question_range, group_type, instructions, image_url, prose_content, options_list)
                       VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"#,
                )
                .bind(part_id)
                .bind(&group.question_range)
                .bind(group.group_type)
                .bind(&group.instructions)
                .bind(&group.image_url)
                .bind(&group.prose_content)
                .bind(&group.options_list)
                .execute(&mut *tx)
                .await?
                .last_insert_rowid();

                for question in &group.questions {
                    sqlx::query(
                        r#"INSERT INTO listening_questions
                               (group_id, question_number, question_text, choices, correct_answer)
                           VALUES (?1, ?2, ?3, ?4, ?5)"#,
                    )
                    .bind(group_id)
                    .bind(question.question_number)
                    .bind(&question.question_text)
                    .bind(&question.choices)
                    .bind(&question.correct_answer)
                    .execute(&mut *tx)
                    .await?;
                }
            }
        }

        tx.commit().await?;
        Ok(test_id)
    }

    /// Load the whole hierarchy (one query per level) and produce the
    /// render-ready per-part structure.
    pub async fn test_detail(&self, test_id: i64) -> Result<ListeningTestDetail> {
        let test = self.get_test(test_id).await?;

        let parts = sqlx::query_as::<_, ListeningPart>(
            r#"SELECT * FROM listening_parts WHERE test_id = ?1 ORDER BY part_number"#,
        )
        .bind(test_id)
        .fetch_all(&self.pool)
        .await?;

        let groups = sqlx::query_as::<_, QuestionGroup>(
            r#"SELECT g.* FROM listening_groups g
               JOIN listening_parts p ON g.part_id = p.id
               WHERE p.test_id = ?1
               ORDER BY g.id"#,
        )
        .bind(test_id)
        .fetch_all(&self.pool)
        .await?;

        let questions = sqlx::query_as::<_, ListeningQuestion>(
            r#"SELECT q.* FROM listening_questions q
               JOIN listening_groups g ON q.group_id = g.id
               JOIN listening_parts p ON g.part_id = p.id
               WHERE p.test_id = ?1
               ORDER BY q.question_number"#,
        )
        .bind(test_id)
        .fetch_all(&self.pool)
        .await?;

        let mut questions_by_group: HashMap<i64, Vec<&ListeningQuestion>> = HashMap::new();
        for question in &questions {
            questions_by_group
                .entry(question.group_id)
                .or_default()
                .push(question);
        }
        let mut groups_by_part: HashMap<i64, Vec<&QuestionGroup>> = HashMap::new();
        for group in &groups {
            groups_by_part.entry(group.part_id).or_default().push(group);
        }

        let rendered_parts = parts
            .iter()
            .map(|part| RenderedPart {
                part_number: part.part_number,
                audio_url: part.audio_url.clone(),
                groups: groups_by_part
                    .get(&part.id)
                    .map(|part_groups| {
                        part_groups
                            .iter()
                            .map(|group| {
                                render_group(
                                    group,
                                    questions_by_group
                                        .get(&group.id)
                                        .map(Vec::as_slice)
                                        .unwrap_or_default(),
                                )
                            })
                            .collect()
                    })
                    .unwrap_or_default(),
            })
            .collect();

        Ok(ListeningTestDetail {
            id: test.id,
            title: test.title,
            parts: rendered_parts,
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
               FROM listening_questions q
               JOIN listening_groups g ON q.group_id = g.id
               JOIN listening_parts p ON g.part_id = p.id
               WHERE p.test_id = ?1
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
                r#"INSERT INTO listening_answers
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

/// Listening only substitutes blanks for note-completion groups; other
/// group types keep their prose untouched in the instructions.
fn render_group(group: &QuestionGroup, questions: &[&ListeningQuestion]) -> RenderedGroup {
    let rendered_questions: Vec<RenderedQuestion> = questions
        .iter()
        .map(|q| RenderedQuestion {
            id: q.id,
            question_number: q.question_number,
            question_text: q.question_text.clone(),
            choices: grading::split_delimited(&q.choices),
        })
        .collect();

    let prose_with_inputs = match group.group_type {
        QuestionKind::NoteCompletion if !group.prose_content.is_empty() => {
            let numbered: Vec<(i64, i64)> = rendered_questions
                .iter()
                .map(|q| (q.question_number, q.id))
                .collect();
            grading::substitute_blanks(&format_text(&group.prose_content), &numbered)
        }
        QuestionKind::ShortAnswer
        | QuestionKind::MultipleChoice
        | QuestionKind::TrueFalseNotGiven
        | QuestionKind::Matching
        | QuestionKind::NoteCompletion
        | QuestionKind::MapLabelling => String::new(),
    };

    RenderedGroup {
        question_range: group.question_range.clone(),
        group_type: group.group_type,
        instructions: format_text(&group.instructions),
        image_url: group.image_url.clone(),
        options_list: grading::split_delimited(&group.options_list),
        questions: rendered_questions,
        prose_with_inputs,
    }
}
