pub mod chat_handler;
pub mod email_handler;
pub mod oauth_handler;
pub mod outlook_handler;
