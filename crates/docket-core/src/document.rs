use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Incoming,
    Outgoing,
}

impl DocumentKind {
    pub const ALL: &[DocumentKind] = &[DocumentKind::Incoming, DocumentKind::Outgoing];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Incoming => "incoming",
            DocumentKind::Outgoing => "outgoing",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DocumentKind::Incoming => "Incoming",
            DocumentKind::Outgoing => "Outgoing",
        }
    }

    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "incoming" => Some(DocumentKind::Incoming),
            "outgoing" => Some(DocumentKind::Outgoing),
            _ => None,
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Processing status of a document.
///
/// `Overdue` exists as a stored value for wire compatibility with older
/// registers; whether a document is actually overdue is always derived from
/// its deadline (see [`crate::deadline`]), never read from this field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Draft,
    Processing,
    Completed,
    Overdue,
    Sent,
}

impl Status {
    pub const ALL: &[Status] = &[
        Status::Draft,
        Status::Processing,
        Status::Completed,
        Status::Overdue,
        Status::Sent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Draft => "draft",
            Status::Processing => "processing",
            Status::Completed => "completed",
            Status::Overdue => "overdue",
            Status::Sent => "sent",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Status::Draft => "Draft",
            Status::Processing => "Processing",
            Status::Completed => "Completed",
            Status::Overdue => "Overdue",
            Status::Sent => "Sent",
        }
    }

    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(Status::Draft),
            "processing" => Some(Status::Processing),
            "completed" => Some(Status::Completed),
            "overdue" => Some(Status::Overdue),
            "sent" => Some(Status::Sent),
            _ => None,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    Normal,
    Medium,
    High,
    Urgent,
    VeryUrgent,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Normal => "normal",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
            Priority::VeryUrgent => "very-urgent",
            Priority::Low => "low",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Priority::Normal => "Normal",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Urgent => "Urgent",
            Priority::VeryUrgent => "Very urgent",
            Priority::Low => "Low",
        }
    }

    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "normal" => Some(Priority::Normal),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            "urgent" => Some(Priority::Urgent),
            "very-urgent" => Some(Priority::VeryUrgent),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Normal
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Reference to a stored upload: display name, relative storage path, size.
/// Name and path travel together; a record either has a full reference or
/// none at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentRef {
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub size: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: DocumentKind,
    pub number: String,
    pub date: NaiveDate,
    pub summary: String,
    pub document_type: String,
    pub priority: Priority,
    pub status: Status,
    pub sender_department: Option<String>,
    pub receiver_department: Option<String>,
    pub main_responsible: Option<String>,
    pub processing_deadline: Option<NaiveDate>,
    pub signer: Option<String>,
    pub tags: Vec<String>,
    pub notes: Option<String>,
    pub attachment: Option<AttachmentRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for create and update. Updates replace the full record, so the
/// two operations share one shape. The required fields are `Option` here so
/// validation can report every missing field at once instead of failing on
/// the first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentInput {
    #[serde(rename = "type")]
    pub kind: Option<DocumentKind>,
    pub number: Option<String>,
    pub date: Option<NaiveDate>,
    pub summary: Option<String>,
    #[serde(default)]
    pub document_type: Option<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub status: Option<Status>,
    #[serde(default)]
    pub sender_department: Option<String>,
    #[serde(default)]
    pub receiver_department: Option<String>,
    #[serde(default)]
    pub main_responsible: Option<String>,
    #[serde(default)]
    pub processing_deadline: Option<NaiveDate>,
    #[serde(default)]
    pub signer: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub attachment: Option<AttachmentRef>,
}

impl DocumentInput {
    /// Check required-field presence and apply defaults, producing the
    /// concrete record the storage layer works with. On failure, returns the
    /// wire names of every missing or blank required field.
    pub fn validate(self) -> Result<NewDocument, Vec<&'static str>> {
        fn blank(s: &Option<String>) -> bool {
            s.as_deref().map_or(true, |s| s.trim().is_empty())
        }

        let mut missing = Vec::new();
        if self.kind.is_none() {
            missing.push("type");
        }
        if blank(&self.number) {
            missing.push("number");
        }
        if self.date.is_none() {
            missing.push("date");
        }
        if blank(&self.summary) {
            missing.push("summary");
        }

        let (Some(kind), Some(number), Some(date), Some(summary)) =
            (self.kind, self.number, self.date, self.summary)
        else {
            return Err(missing);
        };
        if !missing.is_empty() {
            // present but blank
            return Err(missing);
        }

        Ok(NewDocument {
            kind,
            number,
            date,
            summary,
            document_type: self
                .document_type
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| "other".to_string()),
            priority: self.priority.unwrap_or_default(),
            status: self.status.unwrap_or(Status::Draft),
            sender_department: self.sender_department,
            receiver_department: self.receiver_department,
            main_responsible: self.main_responsible,
            processing_deadline: self.processing_deadline,
            signer: self.signer,
            tags: self.tags,
            notes: self.notes,
            attachment: self.attachment,
        })
    }
}

/// A validated document payload: required fields are guaranteed present and
/// defaults applied. Produced by [`DocumentInput::validate`].
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub kind: DocumentKind,
    pub number: String,
    pub date: NaiveDate,
    pub summary: String,
    pub document_type: String,
    pub priority: Priority,
    pub status: Status,
    pub sender_department: Option<String>,
    pub receiver_department: Option<String>,
    pub main_responsible: Option<String>,
    pub processing_deadline: Option<NaiveDate>,
    pub signer: Option<String>,
    pub tags: Vec<String>,
    pub notes: Option<String>,
    pub attachment: Option<AttachmentRef>,
}

/// Search criteria for the document register. Absent fields impose no
/// constraint; supplied fields are combined with logical AND.
#[derive(Debug, Clone, Default)]
pub struct SearchCriteria {
    pub keyword: Option<String>,
    pub kind: Option<DocumentKind>,
    pub status: Option<Status>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub organization: Option<String>,
}
