use serde::{Deserialize, Serialize};

/// Closed set of block/group types. Rendering matches on this exhaustively,
/// so a new type is a compile-time-checked change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum QuestionKind {
    ShortAnswer,
    MultipleChoice,
    TrueFalseNotGiven,
    Matching,
    NoteCompletion,
    MapLabelling,
}
