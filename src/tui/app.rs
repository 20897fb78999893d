use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use ratatui::widgets::ListState;

use crate::content;
use crate::domain::FeedItem;
use crate::tui::event::SelectorAction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectMode {
    Single,
    Multi,
}

/// Outcome of an interactive prompt. Aborting is a normal way out, not an
/// error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<T> {
    Chosen(T),
    Aborted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorStep {
    Continue,
    Accept,
    Abort,
}

/// One row of the filtered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Position in the underlying collection.
    pub index: usize,
    pub score: i64,
    /// Char positions in the label that matched the query.
    pub positions: Vec<usize>,
}

/// Rank `labels` against `query`, best first.
///
/// Ties keep collection order. An empty query matches everything.
pub fn rank(matcher: &SkimMatcherV2, labels: &[String], query: &str) -> Vec<Candidate> {
    if query.is_empty() {
        return (0..labels.len())
            .map(|index| Candidate {
                index,
                score: 0,
                positions: Vec::new(),
            })
            .collect();
    }

    let mut candidates: Vec<Candidate> = labels
        .iter()
        .enumerate()
        .filter_map(|(index, label)| {
            matcher
                .fuzzy_indices(label, query)
                .map(|(score, positions)| Candidate {
                    index,
                    score,
                    positions,
                })
        })
        .collect();

    candidates.sort_by(|a, b| b.score.cmp(&a.score).then(a.index.cmp(&b.index)));
    candidates
}

pub struct SelectorState<'a> {
    items: &'a [FeedItem],
    labels: Vec<String>,
    now: DateTime<Utc>,
    mode: SelectMode,
    matcher: SkimMatcherV2,
    pub query: String,
    pub matches: Vec<Candidate>,
    pub cursor: usize,
    pub marked: BTreeSet<usize>,
    pub list_state: ListState,
    pub status_message: Option<String>,
    preview: Option<(usize, String)>,
}

impl<'a> SelectorState<'a> {
    pub fn new(items: &'a [FeedItem], mode: SelectMode, now: DateTime<Utc>) -> Self {
        let labels = items.iter().map(|item| content::label(item, now)).collect();
        let mut state = Self {
            items,
            labels,
            now,
            mode,
            matcher: SkimMatcherV2::default().smart_case(),
            query: String::new(),
            matches: Vec::new(),
            cursor: 0,
            marked: BTreeSet::new(),
            list_state: ListState::default(),
            status_message: None,
            preview: None,
        };
        state.refilter();
        state
    }

    pub fn mode(&self) -> SelectMode {
        self.mode
    }

    pub fn total(&self) -> usize {
        self.items.len()
    }

    /// Time the labels and previews are measured from.
    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// List label of the item at `index` in the collection.
    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    /// Collection index under the cursor.
    pub fn highlighted(&self) -> Option<usize> {
        self.matches.get(self.cursor).map(|c| c.index)
    }

    /// Preview text of the highlighted item.
    pub fn preview(&self) -> Option<&str> {
        self.preview.as_ref().map(|(_, text)| text.as_str())
    }

    pub fn is_marked(&self, index: usize) -> bool {
        self.marked.contains(&index)
    }

    /// What Enter commits: the marked set in multi mode, the highlighted
    /// item otherwise.
    pub fn selection(&self) -> Vec<usize> {
        if self.mode == SelectMode::Multi && !self.marked.is_empty() {
            return self.marked.iter().copied().collect();
        }
        self.highlighted().into_iter().collect()
    }

    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn handle_action(&mut self, action: SelectorAction) -> SelectorStep {
        if action == SelectorAction::Abort {
            return SelectorStep::Abort;
        }
        if action != SelectorAction::None {
            self.clear_status();
        }

        match action {
            SelectorAction::Accept => {
                if !self.selection().is_empty() {
                    return SelectorStep::Accept;
                }
            }
            SelectorAction::Up => self.move_up(),
            SelectorAction::Down => self.move_down(),
            SelectorAction::ToggleMark => self.toggle_mark(),
            SelectorAction::ClearQuery => {
                if !self.query.is_empty() {
                    self.query.clear();
                    self.refilter();
                }
            }
            SelectorAction::DeleteChar => {
                if self.query.pop().is_some() {
                    self.refilter();
                }
            }
            SelectorAction::Insert(c) => {
                self.query.push(c);
                self.refilter();
            }
            SelectorAction::Abort | SelectorAction::None => {}
        }

        SelectorStep::Continue
    }

    pub fn move_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.sync_cursor();
        }
    }

    pub fn move_down(&mut self) {
        if !self.matches.is_empty() && self.cursor < self.matches.len() - 1 {
            self.cursor += 1;
            self.sync_cursor();
        }
    }

    fn toggle_mark(&mut self) {
        if self.mode != SelectMode::Multi {
            return;
        }
        if let Some(index) = self.highlighted() {
            if !self.marked.remove(&index) {
                self.marked.insert(index);
            }
            self.move_down();
        }
    }

    fn refilter(&mut self) {
        self.matches = rank(&self.matcher, &self.labels, &self.query);
        self.cursor = 0;
        tracing::trace!(
            query = %self.query,
            matched = self.matches.len(),
            total = self.labels.len(),
            "selector filter applied"
        );
        self.sync_cursor();
    }

    fn sync_cursor(&mut self) {
        let highlighted = self.highlighted();
        self.list_state.select(highlighted.map(|_| self.cursor));

        let current = self.preview.as_ref().map(|(index, _)| *index);
        if highlighted != current {
            self.preview = highlighted.map(|index| {
                (index, content::preview(&self.items[index], self.now))
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn items(titles: &[&str]) -> Vec<FeedItem> {
        titles.iter().map(|t| FeedItem::new(*t)).collect()
    }

    fn type_query(state: &mut SelectorState<'_>, query: &str) {
        for c in query.chars() {
            state.handle_action(SelectorAction::Insert(c));
        }
    }

    fn ranked_titles(state: &SelectorState<'_>) -> Vec<String> {
        state
            .matches
            .iter()
            .map(|c| state.label(c.index).unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_rank_prefers_contiguous_prefix() {
        let labels: Vec<String> = ["Go Weekly", "Python Weekly", "Golang News"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let matcher = SkimMatcherV2::default().smart_case();

        let ranked = rank(&matcher, &labels, "Go");
        let indices: Vec<usize> = ranked.iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![0, 2]);
        assert!(ranked[0].score >= ranked[1].score);
    }

    #[test]
    fn test_rank_contiguous_beats_scattered() {
        let labels: Vec<String> = ["g x x o", "go"].iter().map(|s| s.to_string()).collect();
        let matcher = SkimMatcherV2::default().smart_case();

        let ranked = rank(&matcher, &labels, "go");
        assert_eq!(ranked[0].index, 1);
        assert_eq!(ranked.len(), 2);
    }

    #[test]
    fn test_empty_query_keeps_collection_order() {
        let list = items(&["b", "a", "c"]);
        let state = SelectorState::new(&list, SelectMode::Single, now());
        assert_eq!(ranked_titles(&state), vec!["b", "a", "c"]);
        assert_eq!(state.highlighted(), Some(0));
    }

    #[test]
    fn test_typing_filters_and_resets_cursor() {
        let list = items(&["Go Weekly", "Python Weekly", "Golang News"]);
        let mut state = SelectorState::new(&list, SelectMode::Single, now());
        state.handle_action(SelectorAction::Down);
        assert_eq!(state.cursor, 1);

        type_query(&mut state, "Go");
        assert_eq!(ranked_titles(&state), vec!["Go Weekly", "Golang News"]);
        assert_eq!(state.cursor, 0);

        state.handle_action(SelectorAction::DeleteChar);
        state.handle_action(SelectorAction::DeleteChar);
        assert_eq!(state.matches.len(), 3);
    }

    #[test]
    fn test_no_matches_cannot_accept() {
        let list = items(&["alpha", "beta"]);
        let mut state = SelectorState::new(&list, SelectMode::Single, now());
        type_query(&mut state, "zzz");

        assert!(state.matches.is_empty());
        assert_eq!(state.highlighted(), None);
        assert_eq!(state.preview(), None);
        assert_eq!(state.handle_action(SelectorAction::Accept), SelectorStep::Continue);
        assert_eq!(state.handle_action(SelectorAction::Abort), SelectorStep::Abort);
    }

    #[test]
    fn test_empty_collection_only_aborts() {
        let list: Vec<FeedItem> = Vec::new();
        let mut state = SelectorState::new(&list, SelectMode::Single, now());

        assert_eq!(state.handle_action(SelectorAction::Down), SelectorStep::Continue);
        assert_eq!(state.handle_action(SelectorAction::Up), SelectorStep::Continue);
        assert_eq!(state.handle_action(SelectorAction::Accept), SelectorStep::Continue);
        assert_eq!(state.handle_action(SelectorAction::Abort), SelectorStep::Abort);
    }

    #[test]
    fn test_cursor_bounds() {
        let list = items(&["a", "b"]);
        let mut state = SelectorState::new(&list, SelectMode::Single, now());
        state.handle_action(SelectorAction::Up);
        assert_eq!(state.cursor, 0);
        state.handle_action(SelectorAction::Down);
        state.handle_action(SelectorAction::Down);
        assert_eq!(state.cursor, 1);
        assert_eq!(state.list_state.selected(), Some(1));
    }

    #[test]
    fn test_preview_follows_highlight() {
        let list = items(&["first", "second"]);
        let mut state = SelectorState::new(&list, SelectMode::Single, now());
        assert!(state.preview().unwrap().starts_with("■ first"));

        state.handle_action(SelectorAction::Down);
        assert!(state.preview().unwrap().starts_with("■ second"));
    }

    #[test]
    fn test_single_mode_ignores_marks() {
        let list = items(&["a", "b"]);
        let mut state = SelectorState::new(&list, SelectMode::Single, now());
        state.handle_action(SelectorAction::ToggleMark);
        assert!(state.marked.is_empty());
        assert_eq!(state.selection(), vec![0]);
    }

    #[test]
    fn test_multi_mode_marks() {
        let list = items(&["a", "b", "c"]);
        let mut state = SelectorState::new(&list, SelectMode::Multi, now());
        assert_eq!(state.selection(), vec![0]);

        state.handle_action(SelectorAction::ToggleMark);
        state.handle_action(SelectorAction::Down);
        state.handle_action(SelectorAction::ToggleMark);
        assert_eq!(state.selection(), vec![0, 2]);

        state.handle_action(SelectorAction::Up);
        state.handle_action(SelectorAction::Up);
        state.handle_action(SelectorAction::ToggleMark);
        assert_eq!(state.selection(), vec![2]);
    }

    #[test]
    fn test_marks_survive_filtering() {
        let list = items(&["apple", "banana"]);
        let mut state = SelectorState::new(&list, SelectMode::Multi, now());
        state.handle_action(SelectorAction::ToggleMark);
        type_query(&mut state, "ban");

        assert_eq!(state.highlighted(), Some(1));
        assert_eq!(state.selection(), vec![0]);
        assert_eq!(state.handle_action(SelectorAction::Accept), SelectorStep::Accept);
    }

    #[test]
    fn test_label_out_of_range_is_none() {
        let list = items(&["only"]);
        let state = SelectorState::new(&list, SelectMode::Single, now());
        assert_eq!(state.label(0), Some("only"));
        assert_eq!(state.label(1), None);
        assert_eq!(state.now(), now());
    }

    #[test]
    fn test_status_cleared_by_next_action() {
        let list = items(&["a"]);
        let mut state = SelectorState::new(&list, SelectMode::Single, now());
        state.set_status("pager failed".into());
        state.handle_action(SelectorAction::None);
        assert!(state.status_message.is_some());
        state.handle_action(SelectorAction::Insert('a'));
        assert!(state.status_message.is_none());

        state.set_status("pager failed".into());
        assert_eq!(state.handle_action(SelectorAction::Abort), SelectorStep::Abort);
        assert!(state.status_message.is_some());
    }
}
