//! Search over client records.
//!
//! A query is a literal, case-insensitive substring. It is matched against a
//! client's business name, contact details, and problem description; any one
//! field matching is enough.

use std::borrow::Cow;

use crate::client::{Client, ClientKind};
use crate::folder::Folder;

/// A search string, case-folded once up front.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    raw: String,
    needle: Vec<char>,
}

impl SearchQuery {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let needle = raw.chars().flat_map(char::to_lowercase).collect();
        Self { raw, needle }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Only the zero-length query is empty; whitespace is a real pattern.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Uses the same per-character folding as [`highlight`], so a text
    /// matches exactly when highlighting it yields a match segment.
    pub fn matches_text(&self, text: &str) -> bool {
        if self.needle.is_empty() {
            return true;
        }
        text.char_indices()
            .any(|(i, _)| match_len_at(&text[i..], &self.needle).is_some())
    }

    pub fn matches(&self, client: &Client) -> bool {
        self.is_empty()
            || self.matches_text(&client.business_name)
            || self.matches_text(&client.contact_details)
            || self.matches_text(&client.problem_description)
    }
}

impl From<&str> for SearchQuery {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// Filter a client list, preserving order.
///
/// With an empty query the input slice comes back borrowed and untouched.
pub fn filter_clients<'a>(clients: &'a [Client], query: &SearchQuery) -> Cow<'a, [Client]> {
    if query.is_empty() {
        return Cow::Borrowed(clients);
    }
    Cow::Owned(clients.iter().filter(|c| query.matches(c)).cloned().collect())
}

/// A folder together with its filtered lists.
#[derive(Debug, Clone)]
pub struct FolderView<'a> {
    pub folder: &'a Folder,
    pub active: Cow<'a, [Client]>,
    pub potential: Cow<'a, [Client]>,
}

impl FolderView<'_> {
    pub fn clients(&self, kind: ClientKind) -> &[Client] {
        match kind {
            ClientKind::Active => &self.active,
            ClientKind::Potential => &self.potential,
        }
    }

    pub fn match_count(&self) -> usize {
        self.active.len() + self.potential.len()
    }
}

/// Apply the query to both lists of one folder independently.
pub fn filter_folder<'a>(folder: &'a Folder, query: &SearchQuery) -> FolderView<'a> {
    FolderView {
        folder,
        active: filter_clients(&folder.active_clients, query),
        potential: filter_clients(&folder.potential_clients, query),
    }
}

/// One view per folder, in collection order. Folders without matches are kept.
pub fn search<'a>(folders: &'a [Folder], query: &SearchQuery) -> Vec<FolderView<'a>> {
    folders.iter().map(|f| filter_folder(f, query)).collect()
}

/// A piece of highlighted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Plain(&'a str),
    Match(&'a str),
}

impl<'a> Segment<'a> {
    pub fn text(&self) -> &'a str {
        match self {
            Segment::Plain(s) | Segment::Match(s) => *s,
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, Segment::Match(_))
    }
}

/// Split `text` into plain and matched runs for display.
///
/// The query is taken literally, so characters like `(` or `*` are ordinary
/// text. Concatenating the segments reproduces `text` exactly.
pub fn highlight<'a>(text: &'a str, query: &SearchQuery) -> Vec<Segment<'a>> {
    let needle = &query.needle;
    let mut segments = Vec::new();
    if needle.is_empty() {
        if !text.is_empty() {
            segments.push(Segment::Plain(text));
        }
        return segments;
    }

    let mut plain_start = 0;
    let mut pos = 0;
    while pos < text.len() {
        match match_len_at(&text[pos..], needle) {
            Some(len) => {
                if plain_start < pos {
                    segments.push(Segment::Plain(&text[plain_start..pos]));
                }
                segments.push(Segment::Match(&text[pos..pos + len]));
                pos += len;
                plain_start = pos;
            }
            None => {
                pos += text[pos..].chars().next().map_or(1, char::len_utf8);
            }
        }
    }
    if plain_start < text.len() {
        segments.push(Segment::Plain(&text[plain_start..]));
    }
    segments
}

/// Byte length of the prefix of `hay` that case-insensitively equals `needle`.
fn match_len_at(hay: &str, needle: &[char]) -> Option<usize> {
    let mut matched = 0;
    for (i, c) in hay.char_indices() {
        for lc in c.to_lowercase() {
            if matched == needle.len() || lc != needle[matched] {
                return None;
            }
            matched += 1;
        }
        if matched == needle.len() {
            return Some(i + c.len_utf8());
        }
    }
    None
}
