use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmailStatus {
    #[default]
    Draft,
    Sent,
    Archived,
}

impl EmailStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmailStatus::Draft => "draft",
            EmailStatus::Sent => "sent",
            EmailStatus::Archived => "archived",
        }
    }
}

impl FromStr for EmailStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(EmailStatus::Draft),
            "sent" => Ok(EmailStatus::Sent),
            "archived" => Ok(EmailStatus::Archived),
            other => Err(format!("unknown email status '{}'", other)),
        }
    }
}

/// A stored email owned by a single user.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmailRecord {
    pub id: String,
    pub subject: String,
    pub content: String,
    pub from: String,
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub bcc: Vec<String>,
    pub status: EmailStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user_id: String,
}

/// Client-supplied fields for `POST /api/emails`.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct NewEmail {
    pub subject: String,
    pub content: String,
    pub from: String,
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub bcc: Vec<String>,
    pub status: EmailStatus,
}

impl fmt::Display for EmailRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Email {} ({}):", self.id, self.status.as_str())?;
        writeln!(f, "  From: {}", self.from)?;
        if !self.to.is_empty() {
            writeln!(f, "  To: {}", self.to.join(", "))?;
        }
        if !self.cc.is_empty() {
            writeln!(f, "  Cc: {}", self.cc.join(", "))?;
        }
        writeln!(f, "  Subject: {}", self.subject)?;
        write!(f, "  Created: {}", self.created_at.to_rfc3339())
    }
}
