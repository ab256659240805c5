use chrono::Utc;
use log::{error, info};

use crate::sidebar::client::AssistantApi;
use crate::sidebar::view_state::{
    DisplayMode, TransitionError, ViewState, MSG_EMPTY_INPUT, MSG_INSERTED, MSG_INSERT_FAILED,
    MSG_LATEST_EMPTY, MSG_LATEST_FAILED, MSG_LATEST_LOADED, MSG_NO_REPLY,
};

/// Buttons the sidebar offers across both display modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarAction {
    Regenerate,
    Summarize,
    Translate,
    Compose,
    MakePolite,
    Shorten,
}

impl SidebarAction {
    /// The mode tag sent to `/api/ai`. Only reply, compose and summarize have dedicated instructions.
    pub fn mode_tag(&self) -> &'static str {
        match self {
            SidebarAction::Regenerate => "reply",
            SidebarAction::Summarize => "summarize",
            SidebarAction::Translate => "translate",
            SidebarAction::Compose => "compose",
            SidebarAction::MakePolite => "make polite",
            SidebarAction::Shorten => "shorten",
        }
    }
}

/// What became of a user command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Failed,
    /// Refused locally; nothing was sent.
    Skipped,
}

pub struct SidebarController<A: AssistantApi> {
    state: ViewState,
    api: A,
}

impl<A: AssistantApi> SidebarController<A> {
    pub fn new(api: A) -> Self {
        SidebarController {
            state: ViewState::new(),
            api,
        }
    }

    pub fn with_state(api: A, state: ViewState) -> Self {
        SidebarController { state, api }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ViewState {
        &mut self.state
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn set_mode(&mut self, mode: DisplayMode) {
        self.state.set_mode(mode);
    }

    pub fn toggle_mode(&mut self) {
        self.state.toggle_mode();
    }

    pub fn toggle_language(&mut self) {
        self.state.toggle_language();
    }

    /// Sends the current mode's input to the assistant. Thinking is set for the duration of the call.
    pub async fn trigger(&mut self, action: SidebarAction) -> Result<Outcome, TransitionError> {
        let content = self.state.active_input().to_string();
        if content.trim().is_empty() {
            self.state.show_toast(MSG_EMPTY_INPUT, Utc::now());
            return Ok(Outcome::Skipped);
        }

        self.state.begin_request()?;
        let result = self.api.generate(&content, action.mode_tag()).await;
        let outcome = match &result {
            Ok(_) => Outcome::Completed,
            Err(e) => {
                error!("AI request error: {}", e);
                Outcome::Failed
            }
        };
        self.state.complete_request(result, Utc::now())?;
        Ok(outcome)
    }

    /// Pushes the last generated response into the user's Outlook mailbox.
    pub async fn insert_reply(&mut self) -> Outcome {
        let Some(response) = self.state.last_response().map(str::to_string) else {
            self.state.show_toast(MSG_NO_REPLY, Utc::now());
            return Outcome::Skipped;
        };

        match self.api.insert_into_outlook(&response).await {
            Ok(()) => {
                self.state.show_toast(MSG_INSERTED, Utc::now());
                Outcome::Completed
            }
            Err(e) => {
                error!("Failed to insert reply: {}", e);
                self.state.show_toast(MSG_INSERT_FAILED, Utc::now());
                Outcome::Failed
            }
        }
    }

    /// Fills the read-mode input with the newest received message as plain text.
    pub async fn load_latest_email(&mut self) -> Outcome {
        match self.api.latest_email().await {
            Ok(Some(message)) => {
                info!("Loaded latest email {}", message.id);
                self.state.set_read_input(message.plain_text());
                self.state.show_toast(MSG_LATEST_LOADED, Utc::now());
                Outcome::Completed
            }
            Ok(None) => {
                self.state.show_toast(MSG_LATEST_EMPTY, Utc::now());
                Outcome::Completed
            }
            Err(e) => {
                error!("Failed to load latest email: {}", e);
                self.state.show_toast(MSG_LATEST_FAILED, Utc::now());
                Outcome::Failed
            }
        }
    }
}
