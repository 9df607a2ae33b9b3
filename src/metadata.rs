use chrono::{DateTime, Local};

#[derive(serde::Serialize, Debug, Clone, PartialEq)]
pub(crate) struct Post {
    pub title: String,
    pub tags: Vec<String>,
    pub path: std::path::PathBuf,
    pub created_at: DateTime<Local>,
}
