use serde::{Deserialize, Serialize};

use super::{Comment, Entry, Preamble, StringEntry};

/// Everything found in a bibliography, by kind, each in source order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Entries {
    pub entries: Vec<Entry>,
    pub strings: Vec<StringEntry>,
    pub preambles: Vec<Preamble>,
    pub comment_entries: Vec<Comment>,
    /// Free text between entries.
    pub comments: Vec<String>,
}

/// A borrowed item of [`Entries`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Item<'a> {
    String(&'a StringEntry),
    Preamble(&'a Preamble),
    CommentEntry(&'a Comment),
    Entry(&'a Entry),
    Comment(&'a str),
}

impl Entries {
    /// All items: strings, preambles, comment entries, regular entries and finally free
    /// comments.
    pub fn all(&self) -> impl Iterator<Item = Item<'_>> {
        self.strings
            .iter()
            .map(Item::String)
            .chain(self.preambles.iter().map(Item::Preamble))
            .chain(self.comment_entries.iter().map(Item::CommentEntry))
            .chain(self.entries.iter().map(Item::Entry))
            .chain(self.comments.iter().map(|c| Item::Comment(c.as_str())))
    }

    /// Total number of items.
    pub fn len(&self) -> usize {
        self.entries.len()
            + self.strings.len()
            + self.preambles.len()
            + self.comment_entries.len()
            + self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The regular entry with key `key`.
    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.bibkey() == key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Entry> {
        self.entries.iter_mut().find(|entry| entry.bibkey() == key)
    }

    /// The value of the `@string` variable `variable`, matched case-insensitively. Of several
    /// definitions the last one counts.
    pub fn string(&self, variable: &str) -> Option<&str> {
        self.strings
            .iter()
            .rev()
            .find(|s| s.variable.eq_ignore_ascii_case(variable))
            .map(|s| s.value.as_str())
    }
}

impl<'a> IntoIterator for &'a Entries {
    type Item = Item<'a>;
    type IntoIter = Box<dyn Iterator<Item = Item<'a>> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.all())
    }
}
