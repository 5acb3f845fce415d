//! Clause anchors and splice primitives
//!
//! Query text is never parsed. Instead the builder locates the first
//! occurrence of a small, fixed set of anchor keywords and splices new
//! fragments around them. Anchors appear in this relative order when present:
//! SELECT < FROM < JOIN < WHERE < GROUP BY < ORDER BY < paging.
//! A keyword only counts when it starts a word, so identifiers such as
//! `ELSEWHERE` never act as anchors.

use std::sync::LazyLock;

use regex::Regex;

/// Anchor keywords recognized in partially built query text
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Anchor {
    Select,
    From,
    Join,
    Where,
    GroupBy,
    OrderBy,
    Paging,
}

static ANCHOR_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    Anchor::ALL
        .iter()
        .map(|anchor| Regex::new(anchor.pattern()).expect("anchor pattern is valid"))
        .collect()
});

impl Anchor {
    /// Every anchor, in clause order
    pub const ALL: [Anchor; 7] = [
        Anchor::Select,
        Anchor::From,
        Anchor::Join,
        Anchor::Where,
        Anchor::GroupBy,
        Anchor::OrderBy,
        Anchor::Paging,
    ];

    /// The keyword text this anchor stands for
    pub fn keyword(self) -> &'static str {
        match self {
            Anchor::Select => "SELECT",
            Anchor::From => "FROM ",
            Anchor::Join => "JOIN ",
            Anchor::Where => "WHERE",
            Anchor::GroupBy => "GROUP BY ",
            Anchor::OrderBy => "ORDER BY ",
            Anchor::Paging => "OFFSET ",
        }
    }

    fn pattern(self) -> &'static str {
        match self {
            Anchor::Select => r"\bSELECT\b",
            Anchor::From => r"\bFROM ",
            Anchor::Join => r"\bJOIN ",
            Anchor::Where => r"\bWHERE\b",
            Anchor::GroupBy => r"\bGROUP BY ",
            Anchor::OrderBy => r"\bORDER BY ",
            Anchor::Paging => r"\bOFFSET ",
        }
    }

    fn regex(self) -> &'static Regex {
        &ANCHOR_PATTERNS[self as usize]
    }
}

/// Read-only view over query text that finds anchors and builds spliced copies
#[derive(Debug, Clone, Copy)]
pub struct ClauseCursor<'q> {
    query: &'q str,
    separator: &'q str,
}

impl<'q> ClauseCursor<'q> {
    pub fn new(query: &'q str, separator: &'q str) -> Self {
        Self { query, separator }
    }

    /// Byte offset of the first occurrence of `anchor`
    pub fn position(&self, anchor: Anchor) -> Option<usize> {
        anchor.regex().find(self.query).map(|m| m.start())
    }

    pub fn contains(&self, anchor: Anchor) -> bool {
        self.position(anchor).is_some()
    }

    /// Text from the first occurrence of `anchor` to the end, anchor included
    pub fn tail_from(&self, anchor: Anchor) -> Option<&'q str> {
        self.position(anchor).map(|idx| &self.query[idx..])
    }

    /// Copy of the text with `fragment` spliced immediately before `anchor`
    ///
    /// A separator is placed in front of the fragment when the preceding text
    /// does not already end in whitespace. The fragment itself is expected to
    /// end with whatever separates it from the anchor.
    pub fn insert_before(&self, anchor: Anchor, fragment: &str) -> Option<String> {
        let idx = self.position(anchor)?;
        let (head, tail) = self.query.split_at(idx);

        let mut out = String::with_capacity(self.query.len() + fragment.len() + 1);
        out.push_str(head);
        if needs_separator(head) {
            out.push_str(self.separator);
        }
        out.push_str(fragment);
        out.push_str(tail);

        tracing::trace!(anchor = ?anchor, at = idx, "spliced fragment");
        Some(out)
    }

    /// Splice before the first of `anchors` that is present, tried in order
    pub fn insert_before_first(&self, anchors: &[Anchor], fragment: &str) -> Option<String> {
        anchors
            .iter()
            .find_map(|anchor| self.insert_before(*anchor, fragment))
    }

    /// Copy of the text with `clause` appended after a separator
    pub fn append(&self, clause: &str) -> String {
        let mut out = String::with_capacity(self.query.len() + clause.len() + 1);
        out.push_str(self.query);
        if needs_separator(self.query) {
            out.push_str(self.separator);
        }
        out.push_str(clause);
        out
    }
}

fn needs_separator(text: &str) -> bool {
    text.chars().last().is_some_and(|c| !c.is_whitespace())
}
