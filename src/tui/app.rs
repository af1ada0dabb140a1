use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::models::RankedParticipant;
use crate::refresh::Snapshot;
use crate::scoring::{next_tier, MilestoneTier, Shortfall};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Board,
    Detail,
}

/// Work the event loop must do on behalf of the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Refresh,
}

pub struct App {
    pub screen: Screen,
    pub snapshot: Snapshot,
    pub selected: usize,
    pub should_quit: bool,
}

impl Default for App {
    fn default() -> Self {
        Self {
            screen: Screen::Board,
            snapshot: Snapshot::default(),
            selected: 0,
            should_quit: false,
        }
    }
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes a fresh snapshot from the state container, keeping the
    /// selection in range.
    pub fn update(&mut self, snapshot: Snapshot) {
        self.snapshot = snapshot;
        let len = self.snapshot.participants.len();
        if len == 0 {
            self.selected = 0;
            self.screen = Screen::Board;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    pub fn participants(&self) -> &[RankedParticipant] {
        &self.snapshot.participants
    }

    pub fn selected_participant(&self) -> Option<&RankedParticipant> {
        self.snapshot.participants.get(self.selected)
    }

    /// Next tier for the selected participant and the badges still missing.
    pub fn selected_progress(&self) -> Option<(&'static MilestoneTier, Shortfall)> {
        let participant = &self.selected_participant()?.participant;
        next_tier(participant.milestone, &participant.counts())
    }

    pub fn move_selection_up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    pub fn move_selection_down(&mut self) {
        if self.selected < self.snapshot.participants.len().saturating_sub(1) {
            self.selected += 1;
        }
    }

    pub fn open_detail(&mut self) {
        if self.selected_participant().is_some() {
            self.screen = Screen::Detail;
        }
    }

    pub fn close_detail(&mut self) {
        self.screen = Screen::Board;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return None;
        }

        match (self.screen, key.code) {
            (Screen::Detail, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) => {
                self.close_detail();
            }
            (Screen::Board, KeyCode::Esc | KeyCode::Char('q')) => {
                self.should_quit = true;
            }
            (Screen::Board, KeyCode::Up | KeyCode::Char('k')) => self.move_selection_up(),
            (Screen::Board, KeyCode::Down | KeyCode::Char('j')) => self.move_selection_down(),
            (Screen::Board, KeyCode::Enter) => self.open_detail(),
            (_, KeyCode::Char('r')) => return Some(Action::Refresh),
            _ => {}
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Milestone, RawRecord, ScoredParticipant};

    fn snapshot(counts: &[(&str, u32)]) -> Snapshot {
        let participants = counts
            .iter()
            .enumerate()
            .map(|(i, (name, arcade))| RankedParticipant {
                rank: i + 1,
                participant: ScoredParticipant::from_record(
                    RawRecord::new(name).with_counts(*arcade, 4, 10, 4),
                    *arcade,
                    Milestone::M1,
                ),
            })
            .collect();

        Snapshot {
            participants,
            generation: 1,
            ..Default::default()
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_selection_bounds() {
        let mut app = App::new();
        app.update(snapshot(&[("a", 9), ("b", 5)]));

        app.handle_key(key(KeyCode::Up));
        assert_eq!(app.selected, 0);
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.selected, 1);

        app.update(snapshot(&[("a", 9)]));
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn test_detail_popup() {
        let mut app = App::new();
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.screen, Screen::Board);

        app.update(snapshot(&[("a", 4)]));
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.screen, Screen::Detail);

        let (tier, missing) = app.selected_progress().unwrap();
        assert_eq!(tier.milestone, Milestone::M2);
        assert_eq!(missing.arcade_games, 2);

        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.screen, Screen::Board);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_keys() {
        let mut app = App::new();
        assert_eq!(app.handle_key(key(KeyCode::Char('r'))), Some(Action::Refresh));
        app.handle_key(key(KeyCode::Char('q')));
        assert!(app.should_quit);

        let mut app = App::new();
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }
}
