use chrono::{DateTime, Utc};
use cinegen_core::{Error, SceneSpec};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Status value of a finished movie; anything else counts as in progress.
pub const STATUS_COMPLETED: &str = "completed";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoInfo {
    pub duration_seconds: f64,
    pub file_size_bytes: u64,
    #[serde(default)]
    pub resolution: Option<String>,
}

/// One entry of the movie history listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub style: String,
    #[serde(default)]
    pub status: String,
    /// Unix seconds
    pub created_at: f64,
    #[serde(default)]
    pub num_scenes: u32,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub video_info: Option<VideoInfo>,
}

impl MovieSummary {
    pub fn is_completed(&self) -> bool {
        self.status == STATUS_COMPLETED
    }

    pub fn created(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.created_at.trunc() as i64, 0)
    }

    pub fn duration_label(&self) -> String {
        self.video_info
            .as_ref()
            .map(|info| format_duration(info.duration_seconds))
            .unwrap_or_else(|| "Unknown".to_string())
    }

    pub fn size_label(&self) -> String {
        self.video_info
            .as_ref()
            .map(|info| format_file_size(info.file_size_bytes))
            .unwrap_or_else(|| "Unknown".to_string())
    }
}

/// Full record of one movie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    #[serde(flatten)]
    pub summary: MovieSummary,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub scenes: Vec<SceneSpec>,
}

/// Status filter applied to the history listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HistoryFilter {
    #[default]
    All,
    Completed,
    InProgress,
}

impl HistoryFilter {
    pub fn matches(self, movie: &MovieSummary) -> bool {
        match self {
            HistoryFilter::All => true,
            HistoryFilter::Completed => movie.is_completed(),
            HistoryFilter::InProgress => !movie.is_completed(),
        }
    }
}

impl fmt::Display for HistoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HistoryFilter::All => "all",
            HistoryFilter::Completed => "completed",
            HistoryFilter::InProgress => "in-progress",
        })
    }
}

impl FromStr for HistoryFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(HistoryFilter::All),
            "completed" => Ok(HistoryFilter::Completed),
            "in-progress" | "in_progress" => Ok(HistoryFilter::InProgress),
            _ => Err(Error::validation(
                "filter",
                format!("Unknown filter '{}' (expected all, completed or in-progress)", s),
            )),
        }
    }
}

/// Movies whose title, genre or style contain `search` (case-insensitive)
/// and whose status passes `filter`. Order is preserved.
pub fn filter_movies<'a>(
    movies: &'a [MovieSummary],
    search: &str,
    filter: HistoryFilter,
) -> Vec<&'a MovieSummary> {
    let needle = search.trim().to_lowercase();
    movies
        .iter()
        .filter(|movie| {
            needle.is_empty()
                || [&movie.title, &movie.genre, &movie.style]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
        })
        .filter(|movie| filter.matches(movie))
        .collect()
}

/// `m:ss`
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0).floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Human readable size in 1024 steps, one decimal place at most.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{:.1}", value);
    let rounded = rounded.strip_suffix(".0").unwrap_or(&rounded);
    format!("{} {}", rounded, UNITS[unit])
}
