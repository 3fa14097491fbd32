//! In-memory attachment store for analysis sessions.
//!
//! Uploaded text-like files are decoded once and kept per session. When the
//! session later runs an analysis, their text is appended to the request notes.
//! Extracted text per session is capped at `max_session_bytes`, and once more
//! than `max_sessions` sessions are held the least recently used one is dropped.

use async_trait::async_trait;
use chrono::Utc;
use indexmap::IndexMap;
use tokio::sync::RwLock;
use tracing::info;

use super::simple_scraper::SimpleScraper;
use super::{AttachmentError, AttachmentSummary, BaseAttachmentProcessor, Upload};
use crate::common::truncate_chars;

pub const MAX_ATTACHMENT_BYTES: usize = 10 * 1024 * 1024;

/// Extracted text kept for one session across all its uploads.
pub const MAX_SESSION_BYTES: usize = 20 * 1024 * 1024;

pub const MAX_SESSIONS: usize = 200;

/// Characters of attachment text handed to one analysis.
pub const MAX_CONTEXT_CHARS: usize = 8_000;

const PREVIEW_CHARS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttachmentKind {
    PlainText,
    Markdown,
    Csv,
    Json,
    Html,
}

impl AttachmentKind {
    fn detect(filename: &str, content_type: Option<&str>) -> Option<Self> {
        let extension = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("txt") | Some("text") => return Some(Self::PlainText),
            Some("md") | Some("markdown") => return Some(Self::Markdown),
            Some("csv") => return Some(Self::Csv),
            Some("json") => return Some(Self::Json),
            Some("html") | Some("htm") => return Some(Self::Html),
            _ => {}
        }

        let mime = content_type?.split(';').next()?.trim().to_ascii_lowercase();
        match mime.as_str() {
            "text/plain" => Some(Self::PlainText),
            "text/markdown" => Some(Self::Markdown),
            "text/csv" => Some(Self::Csv),
            "application/json" => Some(Self::Json),
            "text/html" => Some(Self::Html),
            _ => None,
        }
    }

    fn mime(self) -> &'static str {
        match self {
            Self::PlainText => "text/plain",
            Self::Markdown => "text/markdown",
            Self::Csv => "text/csv",
            Self::Json => "application/json",
            Self::Html => "text/html",
        }
    }

    fn extract(self, bytes: &[u8]) -> String {
        let raw = String::from_utf8_lossy(bytes);
        match self {
            Self::Html => SimpleScraper::extract_from_html(&raw).1,
            Self::Json => serde_json::from_str::<serde_json::Value>(&raw)
                .ok()
                .and_then(|v| serde_json::to_string_pretty(&v).ok())
                .unwrap_or_else(|| raw.into_owned()),
            _ => raw.trim().to_string(),
        }
    }
}

struct StoredAttachment {
    filename: String,
    text: String,
}

#[derive(Default)]
struct SessionAttachments {
    files: Vec<StoredAttachment>,
    bytes: usize,
}

pub struct TextAttachmentProcessor {
    /// Least recently used session first.
    sessions: RwLock<IndexMap<String, SessionAttachments>>,
    max_session_bytes: usize,
    max_sessions: usize,
}

impl Default for TextAttachmentProcessor {
    fn default() -> Self {
        Self::with_limits(MAX_SESSION_BYTES, MAX_SESSIONS)
    }
}

impl TextAttachmentProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(max_session_bytes: usize, max_sessions: usize) -> Self {
        Self {
            sessions: RwLock::new(IndexMap::new()),
            max_session_bytes,
            max_sessions: max_sessions.max(1),
        }
    }
}


#[async_trait]
impl BaseAttachmentProcessor for TextAttachmentProcessor {
    async fn process(
        &self,
        session_id: &str,
        upload: Upload,
    ) -> Result<AttachmentSummary, AttachmentError> {
        if upload.bytes.is_empty() {
            return Err(AttachmentError::Empty);
        }
        if upload.bytes.len() > MAX_ATTACHMENT_BYTES {
            return Err(AttachmentError::TooLarge {
                limit: MAX_ATTACHMENT_BYTES,
            });
        }

        let kind = AttachmentKind::detect(&upload.filename, upload.content_type.as_deref())
            .ok_or_else(|| AttachmentError::Unsupported(upload.filename.clone()))?;

        let text = kind.extract(&upload.bytes);

        let mut sessions = self.sessions.write().await;
        let held = sessions.get(session_id).map_or(0, |s| s.bytes);
        if held + text.len() > self.max_session_bytes {
            return Err(AttachmentError::SessionFull {
                limit: self.max_session_bytes,
            });
        }

        let summary = AttachmentSummary {
            session_id: session_id.to_string(),
            filename: upload.filename.clone(),
            content_type: kind.mime().to_string(),
            size_bytes: upload.bytes.len(),
            extracted_chars: text.chars().count(),
            preview: truncate_chars(&text, PREVIEW_CHARS).to_string(),
            uploaded_at: Utc::now(),
        };

        info!(
            session_id,
            filename = %summary.filename,
            bytes = summary.size_bytes,
            chars = summary.extracted_chars,
            "Attachment processed"
        );

        let mut session = sessions.shift_remove(session_id).unwrap_or_default();
        session.bytes += text.len();
        session.files.push(StoredAttachment {
            filename: upload.filename,
            text,
        });
        sessions.insert(session_id.to_string(), session);
        while sessions.len() > self.max_sessions {
            sessions.shift_remove_index(0);
        }

        Ok(summary)
    }

    async fn session_context(&self, session_id: &str) -> Option<String> {
        let sessions = self.sessions.read().await;
        let attachments = sessions.get(session_id).filter(|s| !s.files.is_empty())?;

        let joined = attachments
            .files
            .iter()
            .map(|a| format!("=== Anexo: {} ===\n{}", a.filename, a.text))
            .collect::<Vec<_>>()
            .join("\n\n");

        Some(truncate_chars(&joined, MAX_CONTEXT_CHARS).to_string())
    }
}
