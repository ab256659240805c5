pub mod ai_exchange;
pub mod email;
pub mod email_db;
pub mod user_session;
