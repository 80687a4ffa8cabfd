use std::fmt;
use std::ops::Range;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::sort::sort_suffixes_plain;

/// A lexicographically sorted list of all suffixes of a byte text.
///
/// Construction runs in linear time through the induced-sorting core.
/// The table only stores the text and the sorted start positions; queries
/// answer substring existence and occurrence positions by binary search.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SuffixTable {
    text: Box<[u8]>,
    table: Box<[usize]>,
}

impl SuffixTable {
    /// Builds the suffix table of `text` in `O(n)` time and `O(n)` space.
    pub fn new<S>(text: S) -> SuffixTable
    where
        S: Into<Box<[u8]>>,
    {
        let text = text.into();
        let mut suftab = sort_suffixes_plain(&text, false, false, None);
        suftab.truncate(text.len());
        SuffixTable {
            text,
            table: suftab.into(),
        }
    }

    /// Wraps an existing sorted position list. The sortedness invariant
    /// is not checked; a wrong table makes queries misbehave.
    pub fn from_parts<S, T>(text: S, table: T) -> SuffixTable
    where
        S: Into<Box<[u8]>>,
        T: Into<Box<[usize]>>,
    {
        let (text, table) = (text.into(), table.into());
        assert_eq!(text.len(), table.len());
        SuffixTable { text, table }
    }

    pub fn into_parts(self) -> (Box<[u8]>, Box<[usize]>) {
        (self.text, self.table)
    }

    #[inline]
    pub fn table(&self) -> &[usize] {
        &self.table
    }

    #[inline]
    pub fn text(&self) -> &[u8] {
        &self.text
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the suffix at rank `i`.
    #[inline]
    pub fn suffix(&self, i: usize) -> &[u8] {
        &self.text[self.table[i]..]
    }

    /// Checks the sortedness invariant in `O(n^2)`; meant for tests and
    /// sanity checks, not hot paths.
    pub fn is_sorted(&self) -> bool {
        self.table
            .windows(2)
            .all(|pair| self.text[pair[0]..] < self.text[pair[1]..])
    }

    /// Returns true if and only if `query` occurs in the text.
    ///
    /// Runs in `O(m log n)` time for a query of length `m`. Prefer this
    /// over [`positions`](SuffixTable::positions) when only existence
    /// matters.
    pub fn contains(&self, query: &[u8]) -> bool {
        !self.suffix_range(query).is_empty()
    }

    /// Returns all positions where `query` starts, in suffix-rank order.
    ///
    /// Runs in `O(m log n)` time for a query of length `m`.
    pub fn positions(&self, query: &[u8]) -> &[usize] {
        &self.table[self.suffix_range(query)]
    }

    /// Brackets the run of ranks whose suffixes begin with `query`.
    ///
    /// The table is sorted, so every suffix with `query` as a prefix sits
    /// in one contiguous run: it starts at the first suffix that is not
    /// below `query` and extends for as long as the prefix test holds.
    /// An empty query matches nothing, mirroring the occurrence queries.
    fn suffix_range(&self, query: &[u8]) -> Range<usize> {
        if query.is_empty() {
            return 0..0;
        }
        let run_start = self
            .table
            .partition_point(|&sufstart| &self.text[sufstart..] < query);
        let run_len = self.table[run_start..]
            .partition_point(|&sufstart| self.text[sufstart..].starts_with(query));
        run_start..run_start + run_len
    }

    /// Serializes the table to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = bincode::serialize(self).context("serializing suffix table")?;
        std::fs::write(&path, bytes)
            .with_context(|| format!("writing {}", path.as_ref().display()))?;
        Ok(())
    }

    /// Reads a table back from a file written by [`save`](SuffixTable::save).
    pub fn load<P: AsRef<Path>>(path: P) -> Result<SuffixTable> {
        let bytes = std::fs::read(&path)
            .with_context(|| format!("reading {}", path.as_ref().display()))?;
        let table = bincode::deserialize(&bytes).context("deserializing suffix table")?;
        Ok(table)
    }
}

impl fmt::Display for SuffixTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "suffix table of {} positions", self.len())?;
        for (rank, &sufstart) in self.table.iter().enumerate() {
            writeln!(f, "suffix[{}] {}", rank, sufstart)?;
        }
        Ok(())
    }
}
