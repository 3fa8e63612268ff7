use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

pub type ResumeId = i64;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileExperience {
    pub company: String,
    pub title: String,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileEducation {
    pub institution: String,
    pub degree: String,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub graduation_year: Option<i32>,
}

/// Structured data extracted from a resume, when available.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeProfile {
    pub full_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub experience: Vec<ProfileExperience>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub education: Vec<ProfileEducation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resume {
    pub id: ResumeId,
    pub user_id: Uuid,
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
    /// Object-store key of the uploaded file.
    pub file_ref: String,
    pub is_default: bool,
    pub profile: Option<ResumeProfile>,
}

/// Metadata for a file that has already been uploaded to the object store.
#[derive(Debug, Clone, Deserialize)]
pub struct NewResume {
    pub user_id: Uuid,
    pub filename: String,
    pub file_ref: String,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub profile: Option<ResumeProfile>,
}

impl NewResume {
    pub fn validate(&self) -> Result<(), String> {
        if self.filename.trim().is_empty() {
            return Err("filename cannot be empty".to_string());
        }
        if self.file_ref.trim().is_empty() {
            return Err("file_ref cannot be empty".to_string());
        }
        Ok(())
    }
}

/// A downloadable resume document.
#[derive(Debug, Clone)]
pub struct ResumeFile {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Bytes,
}

impl ResumeFile {
    pub fn new(resume: &Resume, bytes: Bytes) -> Self {
        ResumeFile {
            filename: download_filename(&resume.filename),
            content_type: "application/pdf",
            bytes,
        }
    }
}

fn download_filename(filename: &str) -> String {
    if filename.to_ascii_lowercase().ends_with(".pdf") {
        filename.to_string()
    } else {
        format!("{filename}.pdf")
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct ResumeRow {
    pub id: i64,
    pub user_id: Uuid,
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
    pub file_ref: String,
    pub is_default: bool,
    pub profile: Option<Json<ResumeProfile>>,
}

impl From<ResumeRow> for Resume {
    fn from(row: ResumeRow) -> Self {
        Resume {
            id: row.id,
            user_id: row.user_id,
            filename: row.filename,
            uploaded_at: row.uploaded_at,
            file_ref: row.file_ref,
            is_default: row.is_default,
            profile: row.profile.map(|Json(profile)| profile),
        }
    }
}
