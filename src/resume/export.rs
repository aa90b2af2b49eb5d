//! Plain renderings of the resume for applicant tracking systems.

use anyhow::{Context, Result};
use clap::ValueEnum;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use super::model::Resume;
use super::sections::{blocks, Block, Headings};

/// Directory the export lands in unless told otherwise
pub const EXPORT_DIR: &str = "public";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Text,
    Markdown,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Text => "txt",
            ExportFormat::Markdown => "md",
        }
    }

    /// `public/resume.txt` or `public/resume.md`
    pub fn default_path(&self) -> PathBuf {
        Path::new(EXPORT_DIR).join(format!("resume.{}", self.extension()))
    }
}

/// What was written by [`export`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub path: PathBuf,
    /// Content height, in lines
    pub lines: usize,
    pub bytes: usize,
}

/// Render the resume with ATS headings and without interactive-only entries
pub fn render(resume: &Resume, format: ExportFormat) -> String {
    let plain = resume.without_interactive();
    let mut lines: Vec<String> = blocks(&plain)
        .iter()
        .map(|block| match format {
            ExportFormat::Text => text_line(block),
            ExportFormat::Markdown => markdown_line(block),
        })
        .collect();

    // Collapse runs of blank lines left by skipped content
    lines.dedup_by(|a, b| a.is_empty() && b.is_empty());

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Render and write the resume to `output`, creating parent directories
pub fn export(resume: &Resume, format: ExportFormat, output: &Path) -> Result<ExportReport> {
    let rendered = render(resume, format);

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create export directory {:?}", parent))?;
    }
    fs::write(output, &rendered)
        .with_context(|| format!("Failed to write resume export {:?}", output))?;

    let report = ExportReport {
        path: output.to_path_buf(),
        lines: rendered.lines().count(),
        bytes: rendered.len(),
    };
    info!(
        "Exported resume to {:?} ({} lines, {} bytes)",
        report.path, report.lines, report.bytes
    );

    Ok(report)
}

fn text_line(block: &Block) -> String {
    match block {
        Block::Name(name) => name.to_uppercase(),
        Block::Label(label) => label.clone(),
        Block::Paragraph(text) | Block::Subheading(text) | Block::Meta(text) => text.clone(),
        Block::Field { label, value } => format!("{}: {}", label, value),
        Block::Heading(section) => {
            let title = Headings::Ats.for_section(*section).to_uppercase();
            let rule = "-".repeat(title.chars().count());
            format!("{}\n{}", title, rule)
        }
        Block::Bullet(text) => format!("  - {}", text),
        Block::Skill { name, level } => format!("  {} ({}%)", name, level),
        Block::Entry { name, detail } => format!("{}: {}", name, detail),
        Block::Tags { label: Some(label), items } => format!("{}: {}", label, items.join(", ")),
        Block::Tags { label: None, items } => format!("    {}", items.join(", ")),
        Block::Link { label, url } => format!("{}: {}", label, url),
        Block::Blank => String::new(),
    }
}

fn markdown_line(block: &Block) -> String {
    match block {
        Block::Name(name) => format!("# {}", name),
        Block::Label(label) => format!("**{}**", label),
        Block::Paragraph(text) => text.clone(),
        Block::Field { label, value } => format!("- **{}:** {}", label, value),
        Block::Heading(section) => format!("## {}", Headings::Ats.for_section(*section)),
        Block::Subheading(text) => format!("\n### {}", text),
        Block::Meta(text) => format!("*{}*", text),
        Block::Bullet(text) => format!("- {}", text),
        Block::Skill { name, level } => format!("- {} ({}%)", name, level),
        Block::Entry { name, detail } => format!("- {}: {}", name, detail),
        Block::Tags { label: Some(label), items } => format!("\n{}: {}", label, items.join(", ")),
        Block::Tags { label: None, items } => format!("  - {}", items.join(", ")),
        Block::Link { label, url } => format!("- [{}]({})", label, url),
        Block::Blank => String::new(),
    }
}
