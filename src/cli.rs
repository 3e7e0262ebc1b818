use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tocsplit")]
#[command(about = "Split a PDF into smaller PDFs along its outline (bookmarks)")]
#[command(version)]
pub struct Cli {
    /// PDF file to split
    pub file: PathBuf,

    /// Outline level to split at (1 = top-level bookmarks)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub depth: u32,

    /// Only keep sections whose name matches this regular expression
    #[arg(long)]
    pub regex: Option<String>,

    /// Case insensitive --regex matching
    #[arg(short, long, requires = "regex")]
    pub ignore_case: bool,

    /// Also include the first page of the following section in each file
    #[arg(long)]
    pub overlap: bool,

    /// Show which files would be created without writing anything
    #[arg(long, visible_alias = "simulate")]
    pub dry_run: bool,

    /// Prefix for the created file names
    #[arg(long)]
    pub prefix: Option<String>,

    /// Directory to write the split files into
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Report the planned or created files as JSON
    #[arg(long)]
    pub json: bool,
}
