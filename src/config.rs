use crate::cli::Cli;
use crate::error::SplitError;
use crate::filename::strip_unsafe_chars;
use crate::page_range::compile_filter;
use regex::Regex;
use std::path::PathBuf;

/// Everything a split run needs, validated once up front.
#[derive(Debug, Clone)]
pub struct SplitConfig {
    pub file: PathBuf,
    pub depth: u32,
    pub filter: Option<Regex>,
    pub overlap: bool,
    pub dry_run: bool,
    /// Already sanitized.
    pub prefix: Option<String>,
    pub output_dir: PathBuf,
    pub json: bool,
}

impl TryFrom<Cli> for SplitConfig {
    type Error = SplitError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        if cli.depth == 0 {
            return Err(SplitError::InvalidDepth(cli.depth));
        }

        let filter = cli
            .regex
            .as_deref()
            .map(|pattern| compile_filter(pattern, cli.ignore_case))
            .transpose()?;

        Ok(SplitConfig {
            file: cli.file,
            depth: cli.depth,
            filter,
            overlap: cli.overlap,
            dry_run: cli.dry_run,
            prefix: cli.prefix.as_deref().map(strip_unsafe_chars),
            output_dir: cli.output_dir,
            json: cli.json,
        })
    }
}
