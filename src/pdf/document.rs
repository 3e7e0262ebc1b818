use crate::error::{Result, SplitError};
use crate::pdf::toc::{flatten_outline, read_outline, OutlineEntry};
use lopdf::{Document, Object};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

pub struct PdfDocument {
    pub doc: Document,
    pub path: PathBuf,
}

impl PdfDocument {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SplitError::FileNotFound(path.to_path_buf()));
        }
        let doc = Document::load(path).map_err(|e| SplitError::InvalidDocument {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        log::debug!("opened {} ({} pages)", path.display(), doc.get_pages().len());
        Ok(PdfDocument {
            doc,
            path: path.to_path_buf(),
        })
    }

    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Flattened outline, sorted by (page, level).
    ///
    /// Fails with `NoOutline` when the document has no bookmarks at all, and
    /// with `NoUsableOutlineEntries` when none of them has a title and a page.
    pub fn outline_entries(&self) -> Result<Vec<OutlineEntry>> {
        let tree = read_outline(&self.doc);
        if tree.is_empty() {
            return Err(SplitError::NoOutline);
        }
        let entries = flatten_outline(&tree);
        if entries.is_empty() {
            return Err(SplitError::NoUsableOutlineEntries);
        }
        Ok(entries)
    }

    /// Copy zero-based pages `start..=end` into a new document.
    ///
    /// Annotations on the kept pages survive. The outline is dropped, since
    /// most of its entries would point at pages that are gone.
    pub fn extract_range(&self, start: u32, end: u32) -> Result<Document> {
        let total = self.page_count();
        if start > end || end >= total {
            return Err(SplitError::PageOutOfRange {
                start,
                end,
                page_count: total,
            });
        }

        log::debug!(
            "extracting pages {}-{} of {}",
            start + 1,
            end + 1,
            self.path.display()
        );
        let mut new_doc = self.doc.clone();

        // get_pages numbers pages from 1
        let pages_to_delete: Vec<u32> = (1..=total)
            .filter(|num| !(start + 1..=end + 1).contains(num))
            .collect();
        if !pages_to_delete.is_empty() {
            new_doc.delete_pages(&pages_to_delete);
        }

        if let Ok(root_id) = new_doc.trailer.get(b"Root").and_then(Object::as_reference) {
            if let Ok(catalog) = new_doc.get_dictionary_mut(root_id) {
                catalog.remove(b"Outlines");
            }
        }

        new_doc.prune_objects();
        new_doc.compress();
        Ok(new_doc)
    }

    /// Write `doc` to `path`. The file is written under a temporary name and
    /// renamed into place, so `path` never holds a partial PDF.
    pub fn save(doc: &mut Document, path: &Path) -> Result<()> {
        let part = part_path(path);
        write_to(doc, &part)
            .and_then(|_| fs::rename(&part, path))
            .map_err(|source| {
                let _ = fs::remove_file(&part);
                SplitError::Write {
                    path: path.to_path_buf(),
                    source,
                }
            })
    }
}

fn part_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    path.with_file_name(name)
}

fn write_to(doc: &mut Document, path: &Path) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    doc.save_to(&mut writer)
        .map_err(|e| io::Error::other(e.to_string()))?;
    writer.flush()?;
    writer.get_ref().sync_all()
}
