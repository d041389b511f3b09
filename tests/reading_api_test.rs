mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{bearer_token, expect_json, seed_user, send, setup};

fn sample_test_payload() -> serde_json::Value {
    json!({
        "title": "Sample Reading 1",
        "passage_1": "The history of Paris stretches back two millennia.",
        "passage_2": "",
        "passage_3": "",
        "blocks": [
            {
                "passage_number": 1,
                "instructions": "Complete the notes below.",
                "question_type": "short_answer",
                "prose_content": "Capital of France: {{1}}.",
                "questions": [
                    {
                        "question_number": 1,
                        "question_text": "",
                        "correct_answer": "Paris"
                    }
                ]
            },
            {
                "passage_number": 1,
                "instructions": "Choose the correct letter.",
                "question_type": "multiple_choice",
                "questions": [
                    {
                        "question_number": 2,
                        "question_text": "The passage is mainly about",
                        "choices": "history; geography; cuisine",
                        "correct_answer": "history"
                    }
                ]
            }
        ]
    })
}

#[tokio::test]
async fn reading_flow_end_to_end() {
    let (app, pool) = setup().await;
    let staff_id = seed_user(&pool, "admin", true).await;
    let student_id = seed_user(&pool, "alice", false).await;
    let staff = bearer_token(staff_id, true);
    let student = bearer_token(student_id, false);

    let created = expect_json(
        &app,
        "POST",
        "/api/reading/add",
        Some(&staff),
        Some(sample_test_payload()),
        StatusCode::CREATED,
    )
    .await;
    let test_id = created["id"].as_i64().unwrap();

    let listed = expect_json(&app, "GET", "/api/reading", None, None, StatusCode::OK).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["title"], "Sample Reading 1");

    let detail = expect_json(
        &app,
        "GET",
        &format!("/api/reading/{}", test_id),
        None,
        None,
        StatusCode::OK,
    )
    .await;
    let blocks = detail["passage_1_blocks"].as_array().unwrap();
    assert_eq!(blocks.len(), 2);

    let cloze_question_id = blocks[0]["questions"][0]["id"].as_i64().unwrap();
    let prose = blocks[0]["prose_with_inputs"].as_str().unwrap();
    assert!(prose.contains(&format!("name=\"question_{}\"", cloze_question_id)));
    assert!(!prose.contains("{{1}}"));
    assert!(prose.starts_with("Capital of France: "));

    let mcq_question_id = blocks[1]["questions"][0]["id"].as_i64().unwrap();
    assert_eq!(
        blocks[1]["questions"][0]["choices"],
        json!(["history", "geography", "cuisine"])
    );

    // Grading runs only for authenticated users
    let response = send(
        &app,
        "POST",
        &format!("/api/reading/{}/submit", test_id),
        None,
        Some(json!({ "answers": {} })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let answers = json!({
        "answers": {
            format!("question_{}", cloze_question_id): "paris",
            format!("question_{}", mcq_question_id): "HISTORY"
        }
    });
    let result = expect_json(
        &app,
        "POST",
        &format!("/api/reading/{}/submit", test_id),
        Some(&student),
        Some(answers.clone()),
        StatusCode::OK,
    )
    .await;
    assert_eq!(result["score"], 2);
    assert_eq!(result["total_questions"], 2);
    let details = result["detailed_results"].as_array().unwrap();
    assert_eq!(details.len(), 2);
    assert_eq!(details[0]["question_number"], 1);
    assert_eq!(details[0]["submitted_answer"], "paris");
    assert_eq!(details[0]["correct_answer"], "Paris");
    assert_eq!(details[0]["is_correct"], true);

    // Resubmission appends history but the score stays put
    let again = expect_json(
        &app,
        "POST",
        &format!("/api/reading/{}/submit", test_id),
        Some(&student),
        Some(answers),
        StatusCode::OK,
    )
    .await;
    assert_eq!(again["score"], 2);

    let row_count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM reading_answers"#)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(row_count, 4);

    // Empty submission still records one row per question, all incorrect
    let empty = expect_json(
        &app,
        "POST",
        &format!("/api/reading/{}/submit", test_id),
        Some(&student),
        Some(json!({ "answers": {} })),
        StatusCode::OK,
    )
    .await;
    assert_eq!(empty["score"], 0);
    assert_eq!(empty["total_questions"], 2);
    assert_eq!(empty["detailed_results"][0]["submitted_answer"], "");

    let row_count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM reading_answers"#)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(row_count, 6);
}

#[tokio::test]
async fn creating_tests_is_staff_only() {
    let (app, pool) = setup().await;
    let student_id = seed_user(&pool, "bob", false).await;
    let student = bearer_token(student_id, false);

    let response = send(&app, "POST", "/api/reading/add", None, Some(sample_test_payload())).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(
        &app,
        "POST",
        "/api/reading/add",
        Some(&student),
        Some(sample_test_payload()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn duplicate_question_numbers_are_rejected() {
    let (app, pool) = setup().await;
    let staff_id = seed_user(&pool, "admin2", true).await;
    let staff = bearer_token(staff_id, true);

    let payload = json!({
        "title": "Broken Test",
        "blocks": [
            {
                "passage_number": 1,
                "instructions": "",
                "question_type": "short_answer",
                "questions": [
                    { "question_number": 1, "correct_answer": "a" },
                    { "question_number": 1, "correct_answer": "b" }
                ]
            }
        ]
    });
    let response = send(&app, "POST", "/api/reading/add", Some(&staff), Some(payload)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM reading_tests"#)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0, "no partial persistence on validation failure");
}

#[tokio::test]
async fn unknown_test_id_is_not_found() {
    let (app, _pool) = setup().await;
    let response = send(&app, "GET", "/api/reading/4242", None, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
