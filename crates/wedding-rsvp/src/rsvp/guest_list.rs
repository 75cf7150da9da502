use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::normalizer::normalize_name;

/// Authoritative set of invitee names. Populated at setup time and
/// read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct GuestList {
    entries: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum GuestListError {
    #[error("failed to read guest list: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse guest list: {0}")]
    Csv(#[from] csv::Error),
    #[error("guest list has no usable entries")]
    Empty,
    #[error("no guest list configured; set RSVP_GUEST_LIST")]
    MissingSource,
}

#[derive(Debug, Deserialize)]
struct GuestRow {
    guest_name: String,
}

impl GuestList {
    /// Build a list from literal names. Entries that normalize to the empty
    /// string are dropped: a blank entry would substring-match every
    /// candidate.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = names
            .into_iter()
            .map(Into::into)
            .filter(|name| !normalize_name(name).is_empty())
            .collect();
        Self { entries }
    }

    /// Read a `guest_list` table export: a CSV with a `guest_name` column.
    /// Extra columns (the export carries `max_guests`) are ignored.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, GuestListError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut names = Vec::new();
        for row in csv_reader.deserialize::<GuestRow>() {
            names.push(row?.guest_name);
        }

        let list = Self::from_names(names);
        if list.is_empty() {
            return Err(GuestListError::Empty);
        }
        Ok(list)
    }

    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self, GuestListError> {
        Self::from_csv_reader(File::open(path)?)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// First entry admitting the candidate, in list order. Admission is
    /// normalized equality or containment in either direction, so partial
    /// names ("the Smiths" vs "John Smith") get through, as do short
    /// candidates against unrelated longer entries ("Jo" matches
    /// "John Smith"). That recall/precision trade-off is accepted for an
    /// invitation list this size.
    ///
    /// A candidate that normalizes to the empty string never matches.
    pub fn lookup(&self, candidate: &str) -> Option<&str> {
        let needle = normalize_name(candidate);
        if needle.is_empty() {
            return None;
        }

        self.entries.iter().map(String::as_str).find(|entry| {
            let invited = normalize_name(entry);
            invited == needle || invited.contains(needle.as_str()) || needle.contains(invited.as_str())
        })
    }
}
