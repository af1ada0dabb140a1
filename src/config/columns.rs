use serde::{Deserialize, Serialize};

/// Header-name aliases for each record field of a tabular payload.
///
/// Header names have changed between exports of the program's progress
/// report, so every field accepts several aliases. Matching ignores
/// surrounding whitespace and case; the first alias found wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub name: Vec<String>,
    pub arcade_games: Vec<String>,
    pub special_arcade_games: Vec<String>,
    pub trivia_games: Vec<String>,
    pub skill_badges: Vec<String>,
    pub lab_free_courses: Vec<String>,
    pub profile_url: Vec<String>,
    /// Pre-computed score column. Rows with it are taken as authoritative.
    pub score: Vec<String>,
    pub milestone: Vec<String>,
}

fn aliases(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            name: aliases(&["Name", "User Name", "name"]),
            arcade_games: aliases(&["# of Arcade Games Completed", "game_badges"]),
            special_arcade_games: aliases(&[
                "# of Special Arcade Games Completed",
                "special_game_badges",
            ]),
            trivia_games: aliases(&["# of Trivia Games Completed", "trivia_badges"]),
            skill_badges: aliases(&["# of Skill Badges Completed", "skill_badges"]),
            lab_free_courses: aliases(&["# of Lab-free Courses Completed", "lab_badges"]),
            profile_url: aliases(&["Google Cloud Skills Boost Profile URL", "profile_url"]),
            score: aliases(&["total_points"]),
            milestone: aliases(&["milestone"]),
        }
    }
}

/// Column positions resolved against one concrete header row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnIndex {
    pub name: Option<usize>,
    pub arcade_games: Option<usize>,
    pub special_arcade_games: Option<usize>,
    pub trivia_games: Option<usize>,
    pub skill_badges: Option<usize>,
    pub lab_free_courses: Option<usize>,
    pub profile_url: Option<usize>,
    pub score: Option<usize>,
    pub milestone: Option<usize>,
}

impl ColumnIndex {
    /// True when the header row matched none of the badge count columns.
    pub fn has_no_counts(&self) -> bool {
        self.arcade_games.is_none()
            && self.trivia_games.is_none()
            && self.skill_badges.is_none()
            && self.lab_free_courses.is_none()
    }
}

impl ColumnMapping {
    pub fn resolve<'a, I>(&self, headers: I) -> ColumnIndex
    where
        I: IntoIterator<Item = &'a str>,
    {
        let headers: Vec<String> = headers
            .into_iter()
            .map(|h| h.trim().to_lowercase())
            .collect();

        let find = |candidates: &[String]| -> Option<usize> {
            candidates.iter().find_map(|alias| {
                let alias = alias.trim().to_lowercase();
                headers.iter().position(|h| *h == alias)
            })
        };

        ColumnIndex {
            name: find(&self.name),
            arcade_games: find(&self.arcade_games),
            special_arcade_games: find(&self.special_arcade_games),
            trivia_games: find(&self.trivia_games),
            skill_badges: find(&self.skill_badges),
            lab_free_courses: find(&self.lab_free_courses),
            profile_url: find(&self.profile_url),
            score: find(&self.score),
            milestone: find(&self.milestone),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        let required = [
            ("name", &self.name),
            ("arcade_games", &self.arcade_games),
            ("trivia_games", &self.trivia_games),
            ("skill_badges", &self.skill_badges),
            ("lab_free_courses", &self.lab_free_courses),
        ];
        for (field, list) in required {
            if list.iter().all(|alias| alias.trim().is_empty()) {
                return Err(format!("Column mapping for {} has no header names", field));
            }
        }
        Ok(())
    }
}
