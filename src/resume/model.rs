use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Resume shipped with the binary
const EMBEDDED_RESUME: &str = include_str!("../../data/resume.json");

/// A resume in JSON Resume style, plus a list of badges
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resume {
    pub basics: Basics,
    #[serde(default)]
    pub skills: Vec<SkillGroup>,
    #[serde(default)]
    pub work: Vec<Work>,
    #[serde(default)]
    pub projects: Vec<Project>,
    /// Profile flair and similar linked badges
    #[serde(default)]
    pub badges: Vec<Badge>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub languages: Vec<Language>,
    #[serde(default)]
    pub interests: Vec<Interest>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Basics {
    pub name: String,
    pub label: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub profiles: Vec<Profile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub city: String,
    pub region: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub network: String,
    pub username: String,
    pub url: String,
    /// Only meaningful on screen; dropped from exports
    #[serde(default)]
    pub interactive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillGroup {
    pub group: String,
    pub items: Vec<Skill>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    /// Proficiency in percent
    pub level: u8,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Work {
    pub company: String,
    pub position: String,
    #[serde(default)]
    pub website: Option<String>,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Badge {
    pub network: String,
    pub url: String,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default = "default_true")]
    pub interactive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub institution: String,
    pub area: String,
    pub study_type: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub gpa: Option<String>,
    #[serde(default)]
    pub courses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Language {
    pub language: String,
    pub fluency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interest {
    pub name: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

fn default_true() -> bool {
    true
}

impl Resume {
    /// The resume compiled into the binary
    pub fn embedded() -> Result<Self> {
        serde_json::from_str(EMBEDDED_RESUME).context("Failed to parse embedded resume")
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read resume file {:?}", path))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse resume file {:?}", path))
    }

    /// Load `path` if given, otherwise the embedded resume
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_json_file(path),
            None => Self::embedded(),
        }
    }

    /// Copy of the resume without entries that only work on screen
    pub fn without_interactive(&self) -> Self {
        let mut resume = self.clone();
        resume.basics.profiles.retain(|p| !p.interactive);
        resume.badges.retain(|b| !b.interactive);
        resume
    }
}

/// `2019-03` -> `Mar 2019`; anything else (e.g. `Present`) is kept as is
pub fn format_month(date: &str) -> String {
    const MONTHS: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];

    let Some((year, month)) = date.split_once('-') else {
        return date.to_string();
    };
    match month.parse::<usize>() {
        Ok(m) if (1..=12).contains(&m) && year.len() == 4 => format!("{} {}", MONTHS[m - 1], year),
        _ => date.to_string(),
    }
}

/// Year part of a `YYYY-MM` date
pub fn format_year(date: &str) -> &str {
    date.split('-').next().unwrap_or(date)
}
