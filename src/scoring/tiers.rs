use crate::models::{Milestone, RawRecord};

/// Minimum badge counts and bonus points for one milestone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MilestoneTier {
    pub milestone: Milestone,
    pub arcade_games: u32,
    pub trivia_games: u32,
    pub skill_badges: u32,
    pub lab_free_courses: u32,
    pub bonus: u32,
}

/// Tiers in evaluation order, highest first.
pub const TIERS: [MilestoneTier; 4] = [
    MilestoneTier {
        milestone: Milestone::M4,
        arcade_games: 10,
        trivia_games: 8,
        skill_badges: 44,
        lab_free_courses: 16,
        bonus: 25,
    },
    MilestoneTier {
        milestone: Milestone::M3,
        arcade_games: 8,
        trivia_games: 7,
        skill_badges: 30,
        lab_free_courses: 12,
        bonus: 15,
    },
    MilestoneTier {
        milestone: Milestone::M2,
        arcade_games: 6,
        trivia_games: 6,
        skill_badges: 20,
        lab_free_courses: 8,
        bonus: 8,
    },
    MilestoneTier {
        milestone: Milestone::M1,
        arcade_games: 4,
        trivia_games: 4,
        skill_badges: 10,
        lab_free_courses: 4,
        bonus: 2,
    },
];

impl MilestoneTier {
    pub fn for_milestone(milestone: Milestone) -> Option<&'static MilestoneTier> {
        TIERS.iter().find(|t| t.milestone == milestone)
    }

    pub fn is_met_by(&self, record: &RawRecord) -> bool {
        record.arcade_games >= self.arcade_games
            && record.trivia_games >= self.trivia_games
            && record.skill_badges >= self.skill_badges
            && record.lab_free_courses >= self.lab_free_courses
    }

    /// Badges still missing in each category to reach this tier.
    pub fn shortfall(&self, record: &RawRecord) -> Shortfall {
        Shortfall {
            arcade_games: self.arcade_games.saturating_sub(record.arcade_games),
            trivia_games: self.trivia_games.saturating_sub(record.trivia_games),
            skill_badges: self.skill_badges.saturating_sub(record.skill_badges),
            lab_free_courses: self.lab_free_courses.saturating_sub(record.lab_free_courses),
        }
    }
}

/// The tier above `milestone` and what `record` still lacks to reach it.
/// `None` once the top tier is reached.
pub fn next_tier(milestone: Milestone, record: &RawRecord) -> Option<(&'static MilestoneTier, Shortfall)> {
    let tier = MilestoneTier::for_milestone(milestone.next()?)?;
    Some((tier, tier.shortfall(record)))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Shortfall {
    pub arcade_games: u32,
    pub trivia_games: u32,
    pub skill_badges: u32,
    pub lab_free_courses: u32,
}

impl Shortfall {
    pub fn is_empty(&self) -> bool {
        *self == Shortfall::default()
    }
}
