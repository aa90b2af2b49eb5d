//! Resume sections and the flat block list both the panel and the export
//! are drawn from.

use super::model::{format_month, format_year, Resume};

/// A titled resume section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Skills,
    Experience,
    Projects,
    Badges,
    Education,
    Languages,
    Interests,
}

impl Section {
    /// Order in which sections appear
    pub const ALL: [Section; 7] = [
        Section::Skills,
        Section::Experience,
        Section::Projects,
        Section::Badges,
        Section::Education,
        Section::Languages,
        Section::Interests,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Section::Skills => "Skills",
            Section::Experience => "Experience",
            Section::Projects => "Projects",
            Section::Badges => "Community",
            Section::Education => "Education",
            Section::Languages => "Languages",
            Section::Interests => "Interests",
        }
    }

    /// Game-flavoured heading shown on screen
    pub fn retro_title(&self) -> &'static str {
        match self {
            Section::Experience => "[JOB DUNGEONS]",
            Section::Skills => "[POWER UPS]",
            Section::Projects => "[PROJECT LOGS]",
            Section::Education => "[EDU QUEST]",
            Section::Languages => "[SPELL BOOK]",
            Section::Interests => "[SIDE QUESTS]",
            Section::Badges => self.title(),
        }
    }

    /// Heading applicant tracking systems recognise
    pub fn ats_title(&self) -> &'static str {
        match self {
            Section::Experience => "Work Experience",
            Section::Skills => "Technical Skills",
            other => other.title(),
        }
    }
}

/// Which heading set to use when laying out blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Headings {
    Retro,
    Ats,
}

impl Headings {
    pub fn for_section(&self, section: Section) -> &'static str {
        match self {
            Headings::Retro => section.retro_title(),
            Headings::Ats => section.ats_title(),
        }
    }
}

/// One piece of resume content, independent of how it is drawn
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Name(String),
    Label(String),
    Paragraph(String),
    Field { label: &'static str, value: String },
    Heading(Section),
    Subheading(String),
    /// Secondary line such as a date range
    Meta(String),
    Bullet(String),
    Skill { name: String, level: u8 },
    /// Name with a short qualifier, e.g. a language and its fluency
    Entry { name: String, detail: String },
    Tags { label: Option<&'static str>, items: Vec<String> },
    Link { label: String, url: String },
    Blank,
}

/// Lay the resume out as blocks. Sections with no content are skipped.
pub fn blocks(resume: &Resume) -> Vec<Block> {
    let basics = &resume.basics;
    let mut out = vec![
        Block::Name(basics.name.clone()),
        Block::Label(basics.label.clone()),
        Block::Blank,
    ];

    if !basics.summary.is_empty() {
        out.push(Block::Paragraph(basics.summary.clone()));
        out.push(Block::Blank);
    }

    out.push(Block::Field {
        label: "Email",
        value: basics.email.clone(),
    });
    if let Some(phone) = &basics.phone {
        out.push(Block::Field {
            label: "Phone",
            value: phone.clone(),
        });
    }
    if let Some(location) = &basics.location {
        out.push(Block::Field {
            label: "Location",
            value: format!("{}, {}", location.city, location.region),
        });
    }
    if let Some(url) = &basics.url {
        out.push(Block::Field {
            label: "Website",
            value: url.clone(),
        });
    }
    for profile in &basics.profiles {
        out.push(Block::Link {
            label: profile.network.clone(),
            url: profile.url.clone(),
        });
    }

    for section in Section::ALL {
        let body = section_blocks(resume, section);
        if body.is_empty() {
            continue;
        }
        out.push(Block::Blank);
        out.push(Block::Heading(section));
        out.extend(body);
    }

    out
}

fn section_blocks(resume: &Resume, section: Section) -> Vec<Block> {
    let mut out = Vec::new();

    match section {
        Section::Skills => {
            for group in &resume.skills {
                out.push(Block::Subheading(group.group.clone()));
                for skill in &group.items {
                    out.push(Block::Skill {
                        name: skill.name.clone(),
                        level: skill.level,
                    });
                    if !skill.keywords.is_empty() {
                        out.push(Block::Tags {
                            label: None,
                            items: skill.keywords.clone(),
                        });
                    }
                }
            }
        }
        Section::Experience => {
            for job in &resume.work {
                out.push(Block::Subheading(format!("{} - {}", job.position, job.company)));
                out.push(Block::Meta(format!(
                    "{} - {}",
                    format_month(&job.start_date),
                    format_month(&job.end_date)
                )));
                if !job.summary.is_empty() {
                    out.push(Block::Paragraph(job.summary.clone()));
                }
                out.extend(job.highlights.iter().cloned().map(Block::Bullet));
                if !job.technologies.is_empty() {
                    out.push(Block::Tags {
                        label: Some("Technologies"),
                        items: job.technologies.clone(),
                    });
                }
            }
        }
        Section::Projects => {
            for project in &resume.projects {
                out.push(Block::Subheading(project.name.clone()));
                out.push(Block::Paragraph(project.description.clone()));
                out.extend(project.highlights.iter().cloned().map(Block::Bullet));
                if let Some(url) = &project.url {
                    out.push(Block::Link {
                        label: "Demo".to_string(),
                        url: url.clone(),
                    });
                }
                if let Some(url) = &project.github_url {
                    out.push(Block::Link {
                        label: "Code".to_string(),
                        url: url.clone(),
                    });
                }
                if !project.technologies.is_empty() {
                    out.push(Block::Tags {
                        label: Some("Technologies"),
                        items: project.technologies.clone(),
                    });
                }
            }
        }
        Section::Badges => {
            for badge in &resume.badges {
                out.push(Block::Link {
                    label: badge.network.clone(),
                    url: badge.url.clone(),
                });
                if let Some(caption) = &badge.caption {
                    out.push(Block::Meta(caption.clone()));
                }
            }
        }
        Section::Education => {
            for edu in &resume.education {
                out.push(Block::Subheading(edu.institution.clone()));
                out.push(Block::Meta(format!(
                    "{} - {}",
                    format_year(&edu.start_date),
                    format_year(&edu.end_date)
                )));
                let degree = match &edu.gpa {
                    Some(gpa) => format!("{} in {} (GPA: {})", edu.study_type, edu.area, gpa),
                    None => format!("{} in {}", edu.study_type, edu.area),
                };
                out.push(Block::Paragraph(degree));
                if !edu.courses.is_empty() {
                    out.push(Block::Tags {
                        label: Some("Relevant Courses"),
                        items: edu.courses.clone(),
                    });
                }
            }
        }
        Section::Languages => {
            for lang in &resume.languages {
                out.push(Block::Entry {
                    name: lang.language.clone(),
                    detail: lang.fluency.clone(),
                });
            }
        }
        Section::Interests => {
            for interest in &resume.interests {
                out.push(Block::Subheading(interest.name.clone()));
                if !interest.keywords.is_empty() {
                    out.push(Block::Tags {
                        label: None,
                        items: interest.keywords.clone(),
                    });
                }
            }
        }
    }

    out
}
