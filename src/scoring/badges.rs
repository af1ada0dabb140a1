use serde::{Deserialize, Serialize};

use crate::models::RawRecord;

/// Lab-free course titles. Any badge with one of these exact titles counts
/// as a lab-free course rather than a skill badge.
pub const LAB_FREE_COURSES: [&str; 18] = [
    "Digital Transformation with Google Cloud",
    "Exploring Data Transformation with Google Cloud",
    "Infrastructure and Application Modernization with Google Cloud",
    "Scaling with Google Cloud Operations",
    "Innovating with Google Cloud Artificial Intelligence",
    "Trust and Security with Google Cloud",
    "Google Drive",
    "Google Docs",
    "Google Slides",
    "Google Meet",
    "Google Sheets",
    "Google Calendar",
    "Responsible AI: Applying AI Principles with Google Cloud",
    "Responsible AI for Digital Leaders with Google Cloud",
    "Customer Experience with Google AI Architecture",
    "Machine Learning Operations (MLOps) with Vertex AI: Model Evaluation",
    "Conversational AI on Vertex AI and Dialogflow CX",
    "Building Complex End to End Self-Service Experiences in Dialogflow CX",
];

pub const SPECIAL_ARCADE_GAME: &str = "Arcade TechCare";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BadgeKind {
    ArcadeGame,
    SpecialArcadeGame,
    Trivia,
    SkillBadge,
    LabFreeCourse,
}

impl BadgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BadgeKind::ArcadeGame => "arcade game",
            BadgeKind::SpecialArcadeGame => "special arcade game",
            BadgeKind::Trivia => "trivia",
            BadgeKind::SkillBadge => "skill badge",
            BadgeKind::LabFreeCourse => "lab-free course",
        }
    }
}

/// Trivia badges end in "Week" followed by exactly two characters, as in
/// "Skills Trivia July Week 3".
fn has_week_marker(title: &str) -> bool {
    let chars: Vec<char> = title.chars().collect();
    let end = chars.len().saturating_sub(2);
    let start = chars.len().saturating_sub(6).min(end);
    chars[start..end].iter().collect::<String>() == "Week"
}

/// Classifies a badge by its title. Rules are checked in order; titles
/// matching nothing are skill badges.
pub fn classify(title: &str) -> BadgeKind {
    if has_week_marker(title) {
        BadgeKind::Trivia
    } else if title.starts_with("Level ") || title.contains("Base Camp") {
        BadgeKind::ArcadeGame
    } else if title == SPECIAL_ARCADE_GAME {
        BadgeKind::SpecialArcadeGame
    } else if LAB_FREE_COURSES.contains(&title) {
        BadgeKind::LabFreeCourse
    } else {
        BadgeKind::SkillBadge
    }
}

/// Counts badge titles per kind into a record for `name`.
pub fn tally<'a, I>(name: &str, titles: I) -> RawRecord
where
    I: IntoIterator<Item = &'a str>,
{
    let mut record = RawRecord::new(name);
    for title in titles {
        let count = match classify(title) {
            BadgeKind::ArcadeGame => &mut record.arcade_games,
            BadgeKind::SpecialArcadeGame => &mut record.special_arcade_games,
            BadgeKind::Trivia => &mut record.trivia_games,
            BadgeKind::SkillBadge => &mut record.skill_badges,
            BadgeKind::LabFreeCourse => &mut record.lab_free_courses,
        };
        *count = count.saturating_add(1);
    }
    record
}
