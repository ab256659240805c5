/// Selects which fixed system instruction governs a generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Reply,
    Compose,
    Summarize,
    Other(String),
}

impl From<&str> for Mode {
    fn from(tag: &str) -> Self {
        match tag {
            "reply" => Mode::Reply,
            "compose" => Mode::Compose,
            "summarize" => Mode::Summarize,
            other => Mode::Other(other.to_string()),
        }
    }
}

impl Mode {
    pub fn tag(&self) -> &str {
        match self {
            Mode::Reply => "reply",
            Mode::Compose => "compose",
            Mode::Summarize => "summarize",
            Mode::Other(tag) => tag,
        }
    }

    pub fn system_prompt(&self) -> &'static str {
        match self {
            Mode::Reply => "You are an email assistant. Generate a professional and concise email reply.",
            Mode::Compose => "You are an email assistant. Generate a professional email based on the given points.",
            Mode::Summarize => "You are an email assistant. Summarize the given email content concisely.",
            Mode::Other(_) => "You are an email assistant. Help with the given task.",
        }
    }
}
