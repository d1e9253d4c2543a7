//! Changelog file merging
//!
//! A changelog file is an optional preamble followed by entries, newest
//! first. Each entry starts with a heading line at the entry anchor level
//! (`# ` without a preamble, `## ` with one). Merging puts the new entry on
//! top and keeps every older entry whose heading differs from the new one.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use logsmith_core::error::ChangelogError;

use crate::markdown::{lift_headings, shift_headings};

/// Entry anchor for files without a preamble
pub const ENTRY_ANCHOR: &str = "# ";

/// Entry anchor for files with a preamble
pub const PREAMBLE_ENTRY_ANCHOR: &str = "## ";

/// A new changelog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangelogEntry {
    /// Level-1 heading line, e.g. `# [Release v1.2.3](...) (01/02/24)`
    pub title: String,
    /// Lines between the title and the body; may be empty
    pub header: String,
    /// Rendered changes
    pub body: String,
}

impl ChangelogEntry {
    pub fn new(
        title: impl Into<String>,
        header: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            header: header.into(),
            body: body.into(),
        }
    }

    /// Entry text with body headings pushed down by `heading_shift`
    pub fn compose(&self, heading_shift: usize) -> String {
        let mut parts = vec![self.title.trim().to_string()];
        if !self.header.trim().is_empty() {
            parts.push(self.header.trim().to_string());
        }
        let body = shift_headings(self.body.trim(), heading_shift);
        if !body.is_empty() {
            parts.push(body);
        }
        parts.join("\n\n")
    }
}

/// One entry of an existing changelog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentEntry {
    /// Heading line without the line break
    pub heading: String,
    /// Full entry text including the heading
    pub text: String,
}

/// An existing changelog split into its head and entries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangelogDocument {
    head: String,
    entries: Vec<DocumentEntry>,
}

impl ChangelogDocument {
    /// Split `text` at every line starting with `anchor`
    pub fn parse(text: &str, anchor: &str) -> Self {
        let mut document = Self::default();

        for line in text.split_inclusive('\n') {
            if line.starts_with(anchor) {
                document.entries.push(DocumentEntry {
                    heading: line.trim_end().to_string(),
                    text: String::new(),
                });
            }
            match document.entries.last_mut() {
                Some(entry) => entry.text.push_str(line),
                None => document.head.push_str(line),
            }
        }
        document
    }

    /// Text before the first entry
    pub fn head(&self) -> &str {
        &self.head
    }

    /// Entries in file order
    pub fn entries(&self) -> &[DocumentEntry] {
        &self.entries
    }

    /// Heading lines in file order
    pub fn headings(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.heading.as_str())
    }
}

/// Whether `line` is an entry title (`# [Release ...`) at the `anchor` level
fn is_entry_title(line: &str, anchor: &str) -> bool {
    line.strip_prefix(anchor).is_some_and(|rest| rest.starts_with('['))
}

/// Entries of an existing changelog, re-levelled for the current layout.
///
/// With a preamble everything before the first entry title is the old
/// preamble and is dropped; entries written before a preamble existed are
/// pushed down one level. Without a preamble, entries written under an old
/// preamble are pulled up one level.
fn old_entries(text: &str, with_preamble: bool) -> ChangelogDocument {
    let mut offset = 0;
    let first_title = text.split_inclusive('\n').find_map(|line| {
        let start = offset;
        offset += line.len();
        if is_entry_title(line, ENTRY_ANCHOR) {
            Some((start, ENTRY_ANCHOR))
        } else if is_entry_title(line, PREAMBLE_ENTRY_ANCHOR) {
            Some((start, PREAMBLE_ENTRY_ANCHOR))
        } else {
            None
        }
    });

    match (with_preamble, first_title) {
        (true, Some((start, PREAMBLE_ENTRY_ANCHOR))) => {
            ChangelogDocument::parse(&text[start..], PREAMBLE_ENTRY_ANCHOR)
        }
        (true, Some((start, _))) => {
            debug!("moving entries under the preamble");
            let shifted = shift_headings(&text[start..], 1);
            ChangelogDocument::parse(&shifted, PREAMBLE_ENTRY_ANCHOR)
        }
        (true, None) => ChangelogDocument::default(),
        (false, Some((start, PREAMBLE_ENTRY_ANCHOR))) => {
            debug!("moving entries out from under the old preamble");
            ChangelogDocument::parse(&lift_headings(&text[start..]), ENTRY_ANCHOR)
        }
        (false, _) => ChangelogDocument::parse(text, ENTRY_ANCHOR),
    }
}

/// Merge `entry` into `existing` changelog text.
///
/// With a preamble the composed entry is pushed down one more level and the
/// preamble is written first. Text before the first entry of the old file is
/// replaced; old entries with the new entry's heading are dropped. Every other
/// old entry is copied unchanged, line endings included.
pub fn merge_changelog(
    existing: Option<&str>,
    entry: &ChangelogEntry,
    preamble: Option<&str>,
    heading_shift: usize,
) -> String {
    let preamble = preamble.map(str::trim).filter(|p| !p.is_empty());
    let composed = entry.compose(heading_shift);

    let composed = match preamble {
        Some(_) => shift_headings(&composed, 1),
        None => composed,
    };
    let title = composed.lines().next().unwrap_or_default().trim_end();

    let old = existing.map(|text| old_entries(text, preamble.is_some()));

    let mut output = String::new();
    if let Some(p) = preamble {
        output.push_str(p);
        output.push_str("\n\n");
    }
    output.push_str(&composed);
    output.push('\n');

    let mut kept = 0usize;
    for old_entry in old.iter().flat_map(|d| d.entries()) {
        if old_entry.heading == title {
            debug!(heading = %old_entry.heading, "replacing entry with the same heading");
            continue;
        }
        if kept == 0 {
            output.push('\n');
        }
        output.push_str(&old_entry.text);
        kept += 1;
    }

    debug!(kept, "changelog merged");
    output
}

/// A changelog file on disk, updated through a temporary sibling file
#[derive(Debug, Clone)]
pub struct ChangelogFile {
    path: PathBuf,
}

impl ChangelogFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `<file>.tmp` next to the changelog
    pub fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Finish an interrupted update: a leftover temp file with no changelog
    /// next to it becomes the changelog. Returns whether anything was moved.
    pub fn recover(&self) -> Result<bool, ChangelogError> {
        let temp = self.temp_path();
        if temp.exists() && !self.path.exists() {
            warn!(temp = %temp.display(), "recovering changelog from interrupted update");
            std::fs::rename(&temp, &self.path)
                .map_err(|e| ChangelogError::write_failed(&self.path, e))?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Current contents, `None` when the file does not exist
    pub fn read(&self) -> Result<Option<String>, ChangelogError> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Merge `entry` into the file.
    ///
    /// The result is written to the temp file and renamed over the
    /// changelog, so a failed write leaves the original untouched.
    #[instrument(skip(self, entry, preamble), fields(path = %self.path.display()))]
    pub fn merge(
        &self,
        entry: &ChangelogEntry,
        preamble: Option<&str>,
        heading_shift: usize,
    ) -> Result<(), ChangelogError> {
        self.recover()?;

        let existing = self.read()?;
        let merged = merge_changelog(existing.as_deref(), entry, preamble, heading_shift);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| ChangelogError::write_failed(parent, e))?;
        }

        let temp = self.temp_path();
        if let Err(e) = std::fs::write(&temp, &merged) {
            let _ = std::fs::remove_file(&temp);
            return Err(ChangelogError::write_failed(&temp, e));
        }
        std::fs::rename(&temp, &self.path).map_err(|e| ChangelogError::write_failed(&self.path, e))?;

        info!(
            created = existing.is_none(),
            bytes = merged.len(),
            "changelog updated"
        );
        Ok(())
    }
}
