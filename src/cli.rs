use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::extractor::{ExtractOptions, NumberingMode};
use crate::naming::DEFAULT_MAX_NAME_LEN;

#[derive(Parser)]
#[command(name = "bookcut")]
#[command(about = "Split a book PDF into single-page files organized by part and chapter")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run as MCP server over stdio
    Mcp,

    /// Display PDF metadata and page count
    Info {
        /// PDF file to inspect
        path: PathBuf,

        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// Show which pages a range list resolves to, without writing anything
    Preview {
        /// PDF file the ranges refer to
        path: PathBuf,

        /// Page ranges (e.g., "1-5, 10, 15-20")
        pages: String,
    },

    /// Extract each selected page into its own file
    Extract {
        /// PDF file to extract from
        path: PathBuf,

        /// Page ranges (e.g., "1-5, 10, 15-20")
        pages: String,

        /// Destination folder, created if missing
        #[arg(short, long)]
        dest: PathBuf,

        /// Naming segment (project code, book, part, chapter...); repeat in hierarchy order
        #[arg(short, long = "name")]
        names: Vec<String>,

        /// Fail if any range is invalid instead of skipping it
        #[arg(long)]
        strict: bool,

        /// Number after existing page files in the destination instead of restarting at 1
        #[arg(long)]
        continue_numbering: bool,

        /// Maximum length of the sanitized naming base
        #[arg(long, default_value_t = DEFAULT_MAX_NAME_LEN)]
        max_name_len: usize,

        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Build extraction options from the flags of the `extract` subcommand.
pub fn extract_options(
    strict: bool,
    continue_numbering: bool,
    max_name_len: usize,
) -> ExtractOptions {
    ExtractOptions {
        numbering: if continue_numbering {
            NumberingMode::Continue
        } else {
            NumberingMode::Restart
        },
        strict,
        max_name_len,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_extract() {
        let cli = Cli::try_parse_from([
            "bookcut", "extract", "book.pdf", "1-3, 9", "--dest", "out", "-n", "AB1", "-n",
            "Atlas", "--continue-numbering",
        ])
        .unwrap();

        match cli.command {
            Commands::Extract {
                pages,
                names,
                continue_numbering,
                max_name_len,
                strict,
                ..
            } => {
                assert_eq!(pages, "1-3, 9");
                assert_eq!(names, vec!["AB1", "Atlas"]);
                assert!(continue_numbering);
                assert!(!strict);
                assert_eq!(max_name_len, 200);
            }
            _ => panic!("expected extract"),
        }
    }

    #[test]
    fn test_extract_requires_dest() {
        assert!(Cli::try_parse_from(["bookcut", "extract", "book.pdf", "1"]).is_err());
    }

    #[test]
    fn test_extract_options() {
        let options = extract_options(true, true, 50);
        assert_eq!(options.numbering, NumberingMode::Continue);
        assert!(options.strict);
        assert_eq!(options.max_name_len, 50);
        assert_eq!(extract_options(false, false, 200).numbering, NumberingMode::Restart);
    }
}
