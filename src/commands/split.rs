use crate::config::SplitConfig;
use crate::error::{Result, SplitError};
use crate::filename::safe_filename;
use crate::page_range::{build_page_ranges, filter_by_regex, PageRange, UNTITLED_SECTION};
use crate::pdf::PdfDocument;
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;

/// One output file, with 1-based inclusive page numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedFile {
    pub name: String,
    pub filename: String,
    pub first_page: u32,
    pub last_page: u32,
}

impl PlannedFile {
    fn new(range: &PageRange, filename: String) -> Self {
        PlannedFile {
            name: range.name.clone(),
            filename,
            first_page: range.start + 1,
            last_page: range.end + 1,
        }
    }

    /// Listing line used in dry-run mode.
    pub fn describe(&self) -> String {
        if self.first_page == self.last_page {
            format!("{} (contains page {})", self.filename, self.first_page)
        } else {
            format!(
                "{} (contains pages {}–{})",
                self.filename, self.first_page, self.last_page
            )
        }
    }
}

/// File stem for a section: the sanitized name, or `Untitled Section` when
/// nothing is left of it, behind the prefix.
pub fn output_stem(name: &str, prefix: Option<&str>) -> String {
    let safe = safe_filename(name);
    let stem: &str = if safe.is_empty() { UNTITLED_SECTION } else { &safe };
    format!("{}{}", prefix.unwrap_or_default(), stem)
}

/// Page ranges selected by the depth and regex options.
pub fn select_ranges(doc: &PdfDocument, config: &SplitConfig) -> Result<Vec<PageRange>> {
    let entries = doc.outline_entries()?;
    log::debug!("outline has {} entries", entries.len());

    let mut ranges = build_page_ranges(&entries, config.depth, config.overlap, doc.page_count());
    log::debug!("depth {} gives {} ranges", config.depth, ranges.len());

    if let Some(regex) = &config.filter {
        ranges = filter_by_regex(ranges, regex);
        log::debug!("{} ranges match {}", ranges.len(), regex.as_str());
    }

    Ok(ranges)
}

pub fn empty_selection_message(config: &SplitConfig) -> &'static str {
    if config.filter.is_none() {
        "No outline items match the current depth."
    } else {
        "No outline items match the current depth or RegEx."
    }
}

/// Dry-run output: a header, a blank line, then one bullet per file.
pub fn listing(planned: &[PlannedFile]) -> Vec<String> {
    let mut lines = vec![
        "With current options, the following PDF files would be created.".to_string(),
        String::new(),
    ];
    lines.extend(planned.iter().map(|file| format!("– {}", file.describe())));
    lines
}

pub fn run(config: &SplitConfig) -> Result<()> {
    let doc = PdfDocument::open(&config.file)?;
    let ranges = select_ranges(&doc, config)?;

    if ranges.is_empty() {
        println!("{}", empty_selection_message(config));
        return Ok(());
    }

    if config.dry_run {
        let planned = plan(&ranges, config);
        if config.json {
            print_json(&planned);
        } else {
            for line in listing(&planned) {
                println!("{}", line);
            }
        }
        return Ok(());
    }

    let created = write_parts(&doc, &ranges, config)?;
    if config.json {
        print_json(&created);
    }

    Ok(())
}

/// Assign each range a file name. Names that sanitize to the same file
/// (ignoring case) get " 2", " 3", ... appended to the stem.
pub fn plan(ranges: &[PageRange], config: &SplitConfig) -> Vec<PlannedFile> {
    let mut used = HashSet::new();
    ranges
        .iter()
        .map(|range| {
            let stem = output_stem(&range.name, config.prefix.as_deref());
            let mut filename = format!("{}.pdf", stem);
            let mut n = 2;
            while !used.insert(filename.to_lowercase()) {
                filename = format!("{} {}.pdf", stem, n);
                n += 1;
            }
            PlannedFile::new(range, filename)
        })
        .collect()
}

/// Write every range to its own file in the output directory. Stops at the
/// first file that cannot be written.
pub fn write_parts(
    doc: &PdfDocument,
    ranges: &[PageRange],
    config: &SplitConfig,
) -> Result<Vec<PlannedFile>> {
    let output_dir: &Path = &config.output_dir;
    std::fs::create_dir_all(output_dir).map_err(|source| SplitError::CreateDir {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let planned = plan(ranges, config);
    let mut created = Vec::with_capacity(planned.len());
    for (range, file) in ranges.iter().zip(planned) {
        let output_path = output_dir.join(&file.filename);

        log::info!(
            "writing {} ({} page(s))",
            output_path.display(),
            range.page_count()
        );
        let mut part = doc.extract_range(range.start, range.end)?;
        PdfDocument::save(&mut part, &output_path)?;

        if !config.json {
            println!("Created file '{}'", file.filename);
        }
        created.push(file);
    }

    Ok(created)
}

fn print_json(files: &[PlannedFile]) {
    match serde_json::to_string_pretty(files) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("failed to serialize report: {}", e),
    }
}
