use crate::pdf::toc::OutlineEntry;
use regex::{Regex, RegexBuilder};

pub const UNTITLED_SECTION: &str = "Untitled Section";

/// A named, inclusive, zero-based page interval that becomes one output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRange {
    pub name: String,
    pub start: u32,
    pub end: u32,
}

impl PageRange {
    pub fn page_count(&self) -> u32 {
        self.end.saturating_sub(self.start) + 1
    }
}

/// Keep the entries at `depth` or shallower.
pub fn get_n_levels(entries: &[OutlineEntry], depth: u32) -> Vec<&OutlineEntry> {
    entries.iter().filter(|e| e.level <= depth).collect()
}

/// Compute one page range per outline entry at exactly `depth`.
///
/// Each range ends right before the next entry of depth `depth` or shallower
/// (on that entry's page in overlap mode). The last one runs to the end of
/// the document.
pub fn build_page_ranges(
    entries: &[OutlineEntry],
    depth: u32,
    overlap: bool,
    page_count: u32,
) -> Vec<PageRange> {
    let filtered = get_n_levels(entries, depth);
    let last_page = page_count.saturating_sub(1);
    let mut ranges: Vec<PageRange> = Vec::new();

    for (i, entry) in filtered.iter().enumerate() {
        if entry.level != depth {
            continue;
        }

        let end = match filtered.get(i + 1) {
            Some(next) if overlap => next.page.max(entry.page),
            Some(next) if next.page > entry.page => next.page - 1,
            Some(_) => entry.page,
            None => last_page,
        };

        let name = unique_name(&entry.name, &ranges);
        ranges.push(PageRange {
            name,
            start: entry.page,
            end,
        });
    }

    ranges
}

/// Pick a display name that does not clash with an already emitted range.
fn unique_name(raw: &str, emitted: &[PageRange]) -> String {
    let base = if raw.is_empty() { UNTITLED_SECTION } else { raw };

    if !emitted.iter().any(|r| r.name == base) {
        return base.to_string();
    }

    let n = emitted.iter().filter(|r| r.name.contains(base)).count() + 1;
    format!("{} {}", base, n)
}

pub fn compile_filter(pattern: &str, case_insensitive: bool) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .build()
}

/// Keep the ranges whose name contains a match for `regex`.
pub fn filter_by_regex(ranges: Vec<PageRange>, regex: &Regex) -> Vec<PageRange> {
    ranges.into_iter().filter(|r| regex.is_match(&r.name)).collect()
}
