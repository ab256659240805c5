pub mod chat_service;
pub mod email_service;
pub mod llm_service;
pub mod oauth_service;
pub mod outlook_service;
pub mod prompt_service;
