//! The ordered list of titles to schedule.
//!
//! Order is meaningful: the first title lands in the starting month and is
//! ranked #1. At most [`MAX_TITLES`] titles are ever scheduled.

use std::path::Path;

use tracing::debug;

use crate::error::{ScheduleError, ScheduleResult};

/// Upper bound on the number of months scheduled in one run.
pub const MAX_TITLES: usize = 100;

/// Built-in list, from the New York Times Top 100 Films of the 21st Century.
pub const DEFAULT_TITLES: &[&str] = &[
    "Parasite",
    "Mulholland Drive",
    "There Will Be Blood",
    "In the Mood for Love",
    "Moonlight",
    "No Country for Old Men",
    "Eternal Sunshine of the Spotless Mind",
    "Get Out",
    "Spirited Away",
    "The Social Network",
    "Mad Max: Fury Road",
    "The Zone of Interest",
    "Children of Men",
    "Inglourious Basterds",
    "City of God",
    "Crouching Tiger, Hidden Dragon",
    "Brokeback Mountain",
    "Y Tu Mamá También",
    "Zodiac",
    "The Wolf of Wall Street",
    "The Royal Tenenbaums",
    "The Grand Budapest Hotel",
    "Boyhood",
    "Her",
    "Phantom Thread",
];

/// An ordered list of titles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleList {
    titles: Vec<String>,
}

impl TitleList {
    /// Creates a list from titles in processing order.
    pub fn new(titles: Vec<String>) -> Self {
        Self { titles }
    }

    /// The built-in film list.
    pub fn builtin() -> Self {
        Self::new(DEFAULT_TITLES.iter().map(|t| t.to_string()).collect())
    }

    /// Parses one title per line. Blank lines and `#` comments are skipped.
    pub fn parse(content: &str) -> Self {
        let titles = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(String::from)
            .collect();
        Self::new(titles)
    }

    /// Reads a titles file (see [`TitleList::parse`]).
    pub fn from_file(path: impl AsRef<Path>) -> ScheduleResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ScheduleError::TitlesFile {
            path: path.to_path_buf(),
            source,
        })?;
        let list = Self::parse(&content);
        debug!("loaded {} titles from {}", list.len(), path.display());
        Ok(list)
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    /// Returns true when the list fills every slot.
    pub fn is_complete(&self) -> bool {
        self.titles.len() >= MAX_TITLES
    }

    /// Number of slots left unfilled.
    pub fn missing(&self) -> usize {
        MAX_TITLES.saturating_sub(self.titles.len())
    }

    /// The titles that will be scheduled: the first `min(len, MAX_TITLES)`.
    pub fn schedulable(&self) -> &[String] {
        &self.titles[..self.titles.len().min(MAX_TITLES)]
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.titles.iter().map(String::as_str)
    }
}

impl Default for TitleList {
    fn default() -> Self {
        Self::builtin()
    }
}

impl From<Vec<&str>> for TitleList {
    fn from(titles: Vec<&str>) -> Self {
        Self::new(titles.into_iter().map(String::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_list_is_short() {
        let list = TitleList::builtin();
        assert_eq!(list.len(), 25);
        assert!(!list.is_complete());
        assert_eq!(list.missing(), 75);
        assert_eq!(list.iter().next(), Some("Parasite"));
    }

    #[test]
    fn schedulable_caps_at_max() {
        let titles: Vec<String> = (1..=130).map(|i| format!("Film {}", i)).collect();
        let list = TitleList::new(titles);
        assert!(list.is_complete());
        assert_eq!(list.missing(), 0);
        assert_eq!(list.schedulable().len(), MAX_TITLES);
        assert_eq!(list.schedulable()[99], "Film 100");
    }

    #[test]
    fn parse_skips_blanks_and_comments() {
        let list = TitleList::parse("# favourites\nParasite\n\n  Her  \n#skip\nZodiac\n");
        assert_eq!(list, TitleList::from(vec!["Parasite", "Her", "Zodiac"]));
    }

    #[test]
    fn from_file_reads_titles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("films.txt");
        std::fs::write(&path, "Get Out\nSpirited Away\n").unwrap();

        let list = TitleList::from_file(&path).unwrap();
        assert_eq!(list.schedulable(), &["Get Out".to_string(), "Spirited Away".to_string()]);
    }

    #[test]
    fn from_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = TitleList::from_file(dir.path().join("nope.txt")).unwrap_err();
        assert!(matches!(err, ScheduleError::TitlesFile { .. }));
    }
}
