use serde::{Deserialize, Serialize};
use std::fmt;

/// Pipeline stage of a lead. The server creates every lead as `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    #[default]
    Pending,
    Contacted,
    Recontact,
    Won,
    Lost,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 5] = [
        LeadStatus::Pending,
        LeadStatus::Contacted,
        LeadStatus::Recontact,
        LeadStatus::Won,
        LeadStatus::Lost,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LeadStatus::Pending => "pending",
            LeadStatus::Contacted => "contacted",
            LeadStatus::Recontact => "recontact",
            LeadStatus::Won => "won",
            LeadStatus::Lost => "lost",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LeadStatus::Pending => "Pending",
            LeadStatus::Contacted => "Contacted",
            LeadStatus::Recontact => "Re-contact",
            LeadStatus::Won => "Won (Client)",
            LeadStatus::Lost => "Lost",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }

    /// Position in [`LeadStatus::ALL`], used by the row selector.
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One contact submission as returned by `GET /messages/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub status: LeadStatus,
}

impl Lead {
    /// The phone number, if the lead left a non-blank one.
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref().map(str::trim).filter(|p| !p.is_empty())
    }

    /// Calendar date part of the server timestamp.
    pub fn created_on(&self) -> &str {
        self.created_at
            .split(['T', ' '])
            .next()
            .unwrap_or_default()
    }
}

/// Body of `POST /contact/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct StatusUpdate {
    pub status: LeadStatus,
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}

/// Error body in the `{ "detail": ... }` shape. Only string details are kept.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    pub fn message(&self) -> Option<String> {
        self.detail
            .as_ref()
            .and_then(|d| d.as_str())
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string)
    }
}
