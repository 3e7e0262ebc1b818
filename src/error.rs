use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SplitError {
    #[error("File '{}' does not exist.", .0.display())]
    FileNotFound(PathBuf),

    #[error("File '{}' is not a valid PDF ({}).", .path.display(), .reason)]
    InvalidDocument { path: PathBuf, reason: String },

    #[error("File does not contain an outline.")]
    NoOutline,

    #[error("Outline has no entries with both a title and a page.")]
    NoUsableOutlineEntries,

    #[error("Split depth must be at least 1 (got {0})")]
    InvalidDepth(u32),

    #[error("Invalid regular expression")]
    Regex(#[from] regex::Error),

    /// Pages are zero-based here.
    #[error("Pages {start}-{end} are outside the document ({page_count} pages)")]
    PageOutOfRange {
        start: u32,
        end: u32,
        page_count: u32,
    },

    #[error("Failed to create directory: {}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write PDF: {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SplitError {
    /// Problems with the input file itself. These are reported on a single
    /// line and the program exits normally.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            SplitError::FileNotFound(_)
                | SplitError::InvalidDocument { .. }
                | SplitError::NoOutline
                | SplitError::NoUsableOutlineEntries
        )
    }
}

pub type Result<T> = std::result::Result<T, SplitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_errors() {
        assert!(SplitError::FileNotFound(PathBuf::from("a.pdf")).is_user_error());
        assert!(SplitError::NoOutline.is_user_error());
        assert!(SplitError::NoUsableOutlineEntries.is_user_error());
        assert!(!SplitError::InvalidDepth(0).is_user_error());
    }

    #[test]
    fn test_messages() {
        let err = SplitError::FileNotFound(PathBuf::from("missing.pdf"));
        assert_eq!(err.to_string(), "File 'missing.pdf' does not exist.");
        assert_eq!(
            SplitError::NoOutline.to_string(),
            "File does not contain an outline."
        );
    }
}
