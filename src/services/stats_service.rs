use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::dto::stats_dto::{AnswerHistory, TestHistory, UserDetailResponse, UserStatisticsRow};
use crate::error::Result;
use crate::models::user::User;
use crate::services::profile_service::ProfileService;

#[derive(Clone)]
pub struct StatsService {
    pool: SqlitePool,
    profiles: ProfileService,
}

impl StatsService {
    pub fn new(pool: SqlitePool) -> Self {
        let profiles = ProfileService::new(pool.clone());
        Self { pool, profiles }
    }

    /// Per-user aggregates for every non-staff account. A user with no
    /// answers in a module reports 0 tests and a 0 average, never null.
    pub async fn overview(&self) -> Result<Vec<UserStatisticsRow>> {
        let users =
            sqlx::query_as::<_, User>(r#"SELECT * FROM users WHERE is_staff = FALSE ORDER BY id"#)
                .fetch_all(&self.pool)
                .await?;

        let mut rows = Vec::with_capacity(users.len());
        for user in users {
            let is_blocked = self.profiles.is_blocked(user.id).await?;

            let reading_tests: i64 = sqlx::query_scalar(
                r#"SELECT COUNT(DISTINCT b.test_id)
                   FROM reading_answers a
                   JOIN reading_questions q ON a.question_id = q.id
                   JOIN reading_blocks b ON q.block_id = b.id
                   WHERE a.user_id = ?1"#,
            )
            .bind(user.id)
            .fetch_one(&self.pool)
            .await?;

            let reading_avg: Option<f64> = sqlx::query_scalar(
                r#"SELECT AVG(CASE WHEN a.is_correct THEN 1.0 ELSE 0.0 END)
                   FROM reading_answers a
                   WHERE a.user_id = ?1"#,
            )
            .bind(user.id)
            .fetch_one(&self.pool)
            .await?;

            let listening_tests: i64 = sqlx::query_scalar(
                r#"SELECT COUNT(DISTINCT p.test_id)
                   FROM listening_answers a
                   JOIN listening_questions q ON a.question_id = q.id
                   JOIN listening_groups g ON q.group_id = g.id
                   JOIN listening_parts p ON g.part_id = p.id
                   WHERE a.user_id = ?1"#,
            )
            .bind(user.id)
            .fetch_one(&self.pool)
            .await?;

            let listening_avg: Option<f64> = sqlx::query_scalar(
                r#"SELECT AVG(CASE WHEN a.is_correct THEN 1.0 ELSE 0.0 END)
                   FROM listening_answers a
                   WHERE a.user_id = ?1"#,
            )
            .bind(user.id)
            .fetch_one(&self.pool)
            .await?;

            rows.push(UserStatisticsRow {
                id: user.id,
                username: user.username,
                is_blocked,
                reading_tests,
                reading_avg: to_percent(reading_avg),
                listening_tests,
                listening_avg: to_percent(listening_avg),
            });
        }
        Ok(rows)
    }

    /// Full answer history for one user, grouped by owning test with
    /// running correct/total counts.
    pub async fn user_detail(&self, user_id: i64) -> Result<UserDetailResponse> {
        let user = sqlx::query_as::<_, User>(r#"SELECT * FROM users WHERE id = ?1"#)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        let reading_rows = sqlx::query_as::<_, HistoryRow>(
            r#"SELECT t.id AS test_id, t.title AS test_title,
                      q.question_number, q.question_text, q.correct_answer,
                      a.submitted_answer, a.is_correct, a.submitted_at
               FROM reading_answers a
               JOIN reading_questions q ON a.question_id = q.id
               JOIN reading_blocks b ON q.block_id = b.id
               JOIN reading_tests t ON b.test_id = t.id
               WHERE a.user_id = ?1
               ORDER BY t.id, q.question_number, a.id"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let listening_rows = sqlx::query_as::<_, HistoryRow>(
            r#"SELECT t.id AS test_id, t.title AS test_title,
                      q.question_number, q.question_text, q.correct_answer,
                      a.submitted_answer, a.is_correct, a.submitted_at
               FROM listening_answers a
               JOIN listening_questions q ON a.question_id = q.id
               JOIN listening_groups g ON q.group_id = g.id
               JOIN listening_parts p ON g.part_id = p.id
               JOIN listening_tests t ON p.test_id = t.id
               WHERE a.user_id = ?1
               ORDER BY t.id, q.question_number, a.id"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(UserDetailResponse {
            id: user.id,
            username: user.username,
            reading_tests_data: group_by_test(reading_rows),
            listening_tests_data: group_by_test(listening_rows),
        })
    }
}

fn to_percent(avg: Option<f64>) -> i64 {
    avg.map(|v| (v * 100.0).round() as i64).unwrap_or(0)
}

/// Rows arrive ordered by test id, so a running fold is enough.
fn group_by_test(rows: Vec<HistoryRow>) -> Vec<TestHistory> {
    let mut grouped: Vec<TestHistory> = Vec::new();
    for row in rows {
        if grouped.last().map(|t| t.test_id) != Some(row.test_id) {
            grouped.push(TestHistory {
                test_id: row.test_id,
                test_title: row.test_title.clone(),
                correct: 0,
                total: 0,
                answers: Vec::new(),
            });
        }
        let entry = grouped.last_mut().expect("just pushed");
        entry.total += 1;
        if row.is_correct {
            entry.correct += 1;
        }
        entry.answers.push(AnswerHistory {
            question_number: row.question_number,
            question_text: row.question_text,
            submitted_answer: row.submitted_answer,
            correct_answer: row.correct_answer,
            is_correct: row.is_correct,
            submitted_at: row.submitted_at,
        });
    }
    grouped
}

#[derive(Debug, sqlx::FromRow)]
struct HistoryRow {
    test_id: i64,
    test_title: String,
    question_number: i64,
    question_text: String,
    correct_answer: String,
    submitted_answer: String,
    is_correct: bool,
    submitted_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_defaults_to_zero_without_answers() {
        assert_eq!(to_percent(None), 0);
    }

    #[test]
    fn percent_rounds_to_nearest_integer() {
        assert_eq!(to_percent(Some(2.0 / 3.0)), 67);
        assert_eq!(to_percent(Some(1.0 / 3.0)), 33);
        assert_eq!(to_percent(Some(1.0)), 100);
    }

    #[test]
    fn grouping_folds_rows_into_per_test_totals() {
        let now = Utc::now();
        let row = |test_id: i64, number: i64, correct: bool| HistoryRow {
            test_id,
            test_title: format!("Test {}", test_id),
            question_number: number,
            question_text: String::new(),
            correct_answer: "x".into(),
            submitted_answer: if correct { "x".into() } else { "y".into() },
            is_correct: correct,
            submitted_at: now,
        };
        let grouped = group_by_test(vec![
            row(1, 1, true),
            row(1, 2, false),
            row(2, 1, true),
        ]);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].total, 2);
        assert_eq!(grouped[0].correct, 1);
        assert_eq!(grouped[1].total, 1);
        assert_eq!(grouped[1].correct, 1);
    }
}
