//! Client-side orchestration for the assistant sidebar: view state, its transitions,
//! and the calls it makes back to the server.

pub mod client;
pub mod controller;
pub mod view_state;

pub use client::{AssistantApi, ClientError, HttpAssistantClient};
pub use controller::{Outcome, SidebarAction, SidebarController};
pub use view_state::{DisplayMode, Language, Toast, TransitionError, ViewState};
