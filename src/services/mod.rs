pub mod bot_service;
pub mod grading;
pub mod listening_service;
pub mod notification_service;
pub mod profile_service;
pub mod reading_service;
pub mod stats_service;
pub mod user_service;
