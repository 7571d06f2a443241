use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::FestivalRecord;
use crate::search::SearchEngine;

/// Part of a suggestion name, emphasised where it matches the typed text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub text: String,
    pub emphasized: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub name: String,
    pub season: String,
    pub segments: Vec<Segment>,
}

impl Suggestion {
    fn new(record: &FestivalRecord, typed: &str) -> Self {
        Self {
            name: record.name.clone(),
            season: record.season.clone(),
            segments: highlight(&record.name, typed),
        }
    }
}

/// Splits `name` around every occurrence of `typed`.
#[must_use]
pub fn highlight(name: &str, typed: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    if typed.is_empty() {
        segments.push(Segment {
            text: name.to_owned(),
            emphasized: false,
        });
        return segments;
    }
    let mut rest = name;
    while let Some(start) = rest.find(typed) {
        if start > 0 {
            segments.push(Segment {
                text: rest[..start].to_owned(),
                emphasized: false,
            });
        }
        segments.push(Segment {
            text: typed.to_owned(),
            emphasized: true,
        });
        rest = &rest[start + typed.len()..];
    }
    if !rest.is_empty() {
        segments.push(Segment {
            text: rest.to_owned(),
            emphasized: false,
        });
    }
    segments
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Key {
    Up,
    Down,
    Enter,
}

/// What the search box has to do after a key press or click.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Action {
    None,
    /// The active item moved, nothing else changes.
    Moved(usize),
    /// Put `name` into the search box and run the search protocol with it.
    Select(String),
    /// Run the search protocol on whatever is in the search box.
    Search,
}

/// Live suggestion list under the search box.
#[derive(Debug, Default, Clone)]
pub struct SuggestionController {
    items: Vec<Suggestion>,
    active: Option<usize>,
    visible: bool,
}

impl SuggestionController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn items(&self) -> &[Suggestion] {
        if self.visible {
            &self.items
        } else {
            &[]
        }
    }

    #[must_use]
    pub const fn active(&self) -> Option<usize> {
        self.active
    }

    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// The search box changed.
    pub fn input(&mut self, engine: &SearchEngine<'_>, value: &str) -> &[Suggestion] {
        let typed = value.trim();
        self.active = None;
        self.items = if typed.is_empty() {
            Vec::new()
        } else {
            engine
                .substring_match(typed)
                .into_iter()
                .map(|record| Suggestion::new(record, typed))
                .collect()
        };
        self.visible = !self.items.is_empty();
        debug!("{} suggestions for {typed:?}", self.items.len());
        self.items()
    }

    pub fn key(&mut self, key: Key) -> Action {
        match key {
            Key::Enter => match self.active {
                Some(index) => self.click(index),
                None => Action::Search,
            },
            Key::Down | Key::Up if !self.visible => Action::None,
            Key::Down => {
                let next = match self.active {
                    Some(index) if index + 1 < self.items.len() => index + 1,
                    _ => 0,
                };
                self.active = Some(next);
                Action::Moved(next)
            }
            Key::Up => {
                let last = self.items.len() - 1;
                let previous = match self.active {
                    Some(index) if index > 0 => index - 1,
                    _ => last,
                };
                self.active = Some(previous);
                Action::Moved(previous)
            }
        }
    }

    /// The pointer moved over item `index`.
    pub fn hover(&mut self, index: usize) -> Action {
        if !self.visible || index >= self.items.len() {
            return Action::None;
        }
        self.active = Some(index);
        Action::Moved(index)
    }

    /// Pointer click on item `index`.
    pub fn click(&mut self, index: usize) -> Action {
        if !self.visible {
            return Action::None;
        }
        let Some(item) = self.items.get(index) else {
            return Action::None;
        };
        let name = item.name.clone();
        self.dismiss();
        Action::Select(name)
    }

    /// A click outside of the search box and the list.
    pub fn dismiss(&mut self) {
        self.items.clear();
        self.active = None;
        self.visible = false;
    }
}
