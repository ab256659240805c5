use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::config::TOAST_DURATION_SECS;

pub const MSG_EMPTY_INPUT: &str = "Please enter email content first";
pub const MSG_AI_SUCCESS: &str = "AI response generated successfully!";
pub const MSG_AI_FAILURE: &str = "Failed to generate AI response";
pub const MSG_NO_REPLY: &str = "Please generate a reply first";
pub const MSG_INSERTED: &str = "Reply inserted into Outlook!";
pub const MSG_INSERT_FAILED: &str = "Failed to insert reply into Outlook";
pub const MSG_LATEST_LOADED: &str = "Loaded the latest email";
pub const MSG_LATEST_EMPTY: &str = "No emails found in Outlook";
pub const MSG_LATEST_FAILED: &str = "Failed to get current email";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Read,
    Compose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Hindi,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "EN",
            Language::Hindi => "HI",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Toast {
    pub message: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("an AI request is already in progress")]
    Busy,
    #[error("no AI request is in progress")]
    Idle,
}

/// Everything the sidebar renders. Mutated only through the methods below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ViewState {
    mode: DisplayMode,
    language: Language,
    thinking: bool,
    read_input: String,
    compose_input: String,
    last_response: Option<String>,
    toast: Option<Toast>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn is_thinking(&self) -> bool {
        self.thinking
    }

    pub fn read_input(&self) -> &str {
        &self.read_input
    }

    pub fn compose_input(&self) -> &str {
        &self.compose_input
    }

    /// The text box belonging to the current display mode.
    pub fn active_input(&self) -> &str {
        match self.mode {
            DisplayMode::Read => &self.read_input,
            DisplayMode::Compose => &self.compose_input,
        }
    }

    pub fn last_response(&self) -> Option<&str> {
        self.last_response.as_deref()
    }

    pub fn set_mode(&mut self, mode: DisplayMode) {
        self.mode = mode;
    }

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            DisplayMode::Read => DisplayMode::Compose,
            DisplayMode::Compose => DisplayMode::Read,
        };
    }

    pub fn toggle_language(&mut self) {
        self.language = match self.language {
            Language::English => Language::Hindi,
            Language::Hindi => Language::English,
        };
    }

    pub fn set_read_input(&mut self, text: impl Into<String>) {
        self.read_input = text.into();
    }

    pub fn set_compose_input(&mut self, text: impl Into<String>) {
        self.compose_input = text.into();
    }

    /// idle -> thinking. A second request while one is pending is refused.
    pub fn begin_request(&mut self) -> Result<(), TransitionError> {
        if self.thinking {
            return Err(TransitionError::Busy);
        }
        self.thinking = true;
        Ok(())
    }

    /// thinking -> idle, recording the outcome and announcing it.
    pub fn complete_request<E>(
        &mut self,
        outcome: Result<String, E>,
        now: DateTime<Utc>,
    ) -> Result<(), TransitionError> {
        if !self.thinking {
            return Err(TransitionError::Idle);
        }
        self.thinking = false;
        match outcome {
            Ok(response) => {
                self.last_response = Some(response);
                self.show_toast(MSG_AI_SUCCESS, now);
            }
            Err(_) => self.show_toast(MSG_AI_FAILURE, now),
        }
        Ok(())
    }

    /// thinking -> idle without touching the response, for abandoned requests.
    pub fn cancel_request(&mut self) {
        self.thinking = false;
    }

    pub fn show_toast(&mut self, message: impl Into<String>, now: DateTime<Utc>) {
        self.toast = Some(Toast {
            message: message.into(),
            expires_at: now + Duration::seconds(TOAST_DURATION_SECS),
        });
    }

    pub fn dismiss_toast(&mut self) {
        self.toast = None;
    }

    pub fn visible_toast(&self, now: DateTime<Utc>) -> Option<&Toast> {
        self.toast.as_ref().filter(|t| now < t.expires_at)
    }
}
