use std::collections::HashMap;

/// Form field name for one question's input, shared by the renderer and
/// the grader so submissions key back to the right row.
pub fn answer_field_name(question_id: i64) -> String {
    format!("question_{}", question_id)
}

fn input_marker(question_id: i64) -> String {
    format!(
        "<input type=\"text\" name=\"question_{}\" class=\"form-control-sm d-inline-block\" style=\"width: 150px;\">",
        question_id
    )
}

/// Split a semicolon-delimited author field into trimmed entries.
pub fn split_delimited(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(';').map(|part| part.trim().to_string()).collect()
}

/// Replace every `{{n}}` placeholder with an input marker tagged with the
/// matching question's id. Literal replacement: prose that happens to
/// contain `{{n}}` for an existing question number is rewritten too, so
/// authors must not reuse numeral patterns in prose.
pub fn substitute_blanks(prose: &str, questions: &[(i64, i64)]) -> String {
    let mut rendered = prose.to_string();
    for (question_number, question_id) in questions {
        let placeholder = format!("{{{{{}}}}}", question_number);
        rendered = rendered.replace(&placeholder, &input_marker(*question_id));
    }
    rendered
}

/// Case-insensitive exact comparison. Trimming happens when the submission
/// is read out of the form, not here.
pub fn answers_match(submitted: &str, correct: &str) -> bool {
    submitted.to_lowercase() == correct.to_lowercase()
}

/// Everything the grader needs to know about one question.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AnswerKey {
    pub question_id: i64,
    pub question_number: i64,
    pub question_text: String,
    pub correct_answer: String,
}

#[derive(Debug, Clone)]
pub struct GradedAnswer {
    pub question_id: i64,
    pub question_number: i64,
    pub question_text: String,
    pub submitted_answer: String,
    pub correct_answer: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone)]
pub struct GradeOutcome {
    pub score: i64,
    pub total_questions: i64,
    pub details: Vec<GradedAnswer>,
}

/// Grade a full submission against the answer keys, in key order. A missing
/// form field counts as an empty submission.
pub fn grade(keys: &[AnswerKey], submitted: &HashMap<String, String>) -> GradeOutcome {
    let mut score = 0;
    let mut details = Vec::with_capacity(keys.len());

    for key in keys {
        let submitted_answer = submitted
            .get(&answer_field_name(key.question_id))
            .map(|raw| raw.trim().to_string())
            .unwrap_or_default();
        let is_correct = answers_match(&submitted_answer, &key.correct_answer);
        if is_correct {
            score += 1;
        }
        details.push(GradedAnswer {
            question_id: key.question_id,
            question_number: key.question_number,
            question_text: key.question_text.clone(),
            submitted_answer,
            correct_answer: key.correct_answer.clone(),
            is_correct,
        });
    }

    GradeOutcome {
        score,
        total_questions: keys.len() as i64,
        details,
    }
}
