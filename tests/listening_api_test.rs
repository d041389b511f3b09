mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{bearer_token, expect_json, seed_user, send, setup};

fn sample_test_payload() -> serde_json::Value {
    json!({
        "title": "IELTS Listening Test 1",
        "parts": [
            {
                "part_number": 1,
                "audio_url": "https://media.example.com/listening/part1.mp3",
                "groups": [
                    {
                        "question_range": "Questions 1-2",
                        "group_type": "note_completion",
                        "instructions": "Complete the form below.",
                        "prose_content": "Area: {{1}} hectares\nOpened: {{2}}",
                        "questions": [
                            { "question_number": 1, "correct_answer": "500" },
                            { "question_number": 2, "correct_answer": "1987" }
                        ]
                    },
                    {
                        "question_range": "Question 3",
                        "group_type": "map_labelling",
                        "instructions": "Label the map.",
                        "image_url": "https://media.example.com/listening/map.png",
                        "prose_content": "Not a cloze: {{3}} stays literal here.",
                        "questions": [
                            { "question_number": 3, "question_text": "Car park", "correct_answer": "B" }
                        ]
                    }
                ]
            }
        ]
    })
}

#[tokio::test]
async fn listening_flow_end_to_end() {
    let (app, pool) = setup().await;
    let staff_id = seed_user(&pool, "admin", true).await;
    let student_id = seed_user(&pool, "carol", false).await;
    let staff = bearer_token(staff_id, true);
    let student = bearer_token(student_id, false);

    let created = expect_json(
        &app,
        "POST",
        "/api/listening/add",
        Some(&staff),
        Some(sample_test_payload()),
        StatusCode::CREATED,
    )
    .await;
    let test_id = created["id"].as_i64().unwrap();

    let listed = expect_json(&app, "GET", "/api/listening", None, None, StatusCode::OK).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let detail = expect_json(
        &app,
        "GET",
        &format!("/api/listening/{}", test_id),
        None,
        None,
        StatusCode::OK,
    )
    .await;
    let parts = detail["parts"].as_array().unwrap();
    assert_eq!(parts.len(), 1);
    assert_eq!(
        parts[0]["audio_url"],
        "https://media.example.com/listening/part1.mp3"
    );

    let groups = parts[0]["groups"].as_array().unwrap();
    assert_eq!(groups.len(), 2);

    // Note-completion groups get their blanks rewritten into inputs
    let q1_id = groups[0]["questions"][0]["id"].as_i64().unwrap();
    let q2_id = groups[0]["questions"][1]["id"].as_i64().unwrap();
    let prose = groups[0]["prose_with_inputs"].as_str().unwrap();
    assert!(prose.contains(&format!("name=\"question_{}\"", q1_id)));
    assert!(prose.contains(&format!("name=\"question_{}\"", q2_id)));
    assert!(!prose.contains("{{1}}"));

    // Other group types keep their prose out of the cloze pipeline
    assert_eq!(groups[1]["prose_with_inputs"], "");
    assert_eq!(
        groups[1]["image_url"],
        "https://media.example.com/listening/map.png"
    );
    let q3_id = groups[1]["questions"][0]["id"].as_i64().unwrap();

    let answers = json!({
        "answers": {
            format!("question_{}", q1_id): "500",
            format!("question_{}", q2_id): "1990",
            format!("question_{}", q3_id): "b"
        }
    });
    let result = expect_json(
        &app,
        "POST",
        &format!("/api/listening/{}/submit", test_id),
        Some(&student),
        Some(answers.clone()),
        StatusCode::OK,
    )
    .await;
    assert_eq!(result["score"], 2);
    assert_eq!(result["total_questions"], 3);
    let details = result["detailed_results"].as_array().unwrap();
    assert_eq!(details[1]["is_correct"], false);
    assert_eq!(details[1]["submitted_answer"], "1990");
    assert_eq!(details[2]["is_correct"], true);

    let again = expect_json(
        &app,
        "POST",
        &format!("/api/listening/{}/submit", test_id),
        Some(&student),
        Some(answers),
        StatusCode::OK,
    )
    .await;
    assert_eq!(again["score"], 2);

    let row_count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM listening_answers"#)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(row_count, 6);
}

#[tokio::test]
async fn question_numbers_are_unique_per_test_not_globally() {
    let (app, pool) = setup().await;
    let staff_id = seed_user(&pool, "admin3", true).await;
    let staff = bearer_token(staff_id, true);

    // Two tests can reuse the same question numbers
    for title in ["Listening A", "Listening B"] {
        let payload = json!({
            "title": title,
            "parts": [
                {
                    "part_number": 1,
                    "audio_url": "https://media.example.com/a.mp3",
                    "groups": [
                        {
                            "group_type": "multiple_choice",
                            "instructions": "",
                            "questions": [
                                { "question_number": 1, "question_text": "Q", "choices": "A;B", "correct_answer": "A" }
                            ]
                        }
                    ]
                }
            ]
        });
        expect_json(
            &app,
            "POST",
            "/api/listening/add",
            Some(&staff),
            Some(payload),
            StatusCode::CREATED,
        )
        .await;
    }

    // But a duplicate inside one test is rejected
    let payload = json!({
        "title": "Listening C",
        "parts": [
            {
                "part_number": 1,
                "audio_url": "https://media.example.com/a.mp3",
                "groups": [
                    {
                        "group_type": "matching",
                        "instructions": "",
                        "options_list": "X;Y",
                        "questions": [
                            { "question_number": 5, "correct_answer": "X" },
                            { "question_number": 5, "correct_answer": "Y" }
                        ]
                    }
                ]
            }
        ]
    });
    let response = send(&app, "POST", "/api/listening/add", Some(&staff), Some(payload)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM listening_tests"#)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 2);
}
