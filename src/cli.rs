//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

/// Find and download game images from an EmuParadise-style catalog.
///
/// Without `--platform` the supported platforms are listed and one is
/// prompted for. Every game on the platform page is then inventoried and
/// the selected files are downloaded two at a time.
#[derive(Parser, Debug)]
#[command(name = "emudl")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Print the supported platforms with their numbers and exit
    #[arg(long)]
    pub list_platforms: bool,

    /// Platform number from `--list-platforms` (prompted for when omitted)
    #[arg(short, long)]
    pub platform: Option<usize>,

    /// Games to fetch from the platform page: `all`, `3`, `0,2,5-7`
    #[arg(short, long, default_value = "all")]
    pub games: String,

    /// Files to fetch from each game: `all`, `0`, `0-1`
    #[arg(short, long, default_value = "all")]
    pub files: String,

    /// Destination root (default: config `output_dir`, else `Games`)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Catalog host (default: config `base_url`, else the public site)
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Mirror directory for ISO title fallback
    #[arg(long, value_name = "URL")]
    pub mirror_base: Option<String>,

    /// Disable per-file progress bars
    #[arg(long)]
    pub no_progress: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_args_parses_successfully() {
        let args = Args::try_parse_from(["emudl"]).unwrap();
        assert_eq!(args.verbose, 0);
        assert!(!args.quiet);
        assert!(args.platform.is_none());
        assert_eq!(args.games, "all");
        assert_eq!(args.files, "all");
        assert!(args.output.is_none());
        assert!(!args.list_platforms);
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let args = Args::try_parse_from(["emudl", "-v"]).unwrap();
        assert_eq!(args.verbose, 1);

        let args = Args::try_parse_from(["emudl", "-vv"]).unwrap();
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_cli_quiet_flag_sets_quiet() {
        let args = Args::try_parse_from(["emudl", "--quiet"]).unwrap();
        assert!(args.quiet);
    }

    #[test]
    fn test_cli_selection_flags() {
        let args = Args::try_parse_from([
            "emudl", "-p", "19", "--games", "0,2", "--files", "1-3", "-o", "/tmp/roms",
        ])
        .unwrap();
        assert_eq!(args.platform, Some(19));
        assert_eq!(args.games, "0,2");
        assert_eq!(args.files, "1-3");
        assert_eq!(args.output, Some(PathBuf::from("/tmp/roms")));
    }

    #[test]
    fn test_cli_platform_must_be_a_number() {
        let result = Args::try_parse_from(["emudl", "--platform", "dreamcast"]);
        assert_eq!(
            result.unwrap_err().kind(),
            clap::error::ErrorKind::ValueValidation
        );
    }

    #[test]
    fn test_cli_site_overrides() {
        let args = Args::try_parse_from([
            "emudl",
            "--base-url",
            "http://127.0.0.1:8080",
            "--mirror-base",
            "http://127.0.0.1:8080/mirror/",
        ])
        .unwrap();
        assert_eq!(args.base_url.as_deref(), Some("http://127.0.0.1:8080"));
        assert_eq!(
            args.mirror_base.as_deref(),
            Some("http://127.0.0.1:8080/mirror/")
        );
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let result = Args::try_parse_from(["emudl", "--help"]);
        assert_eq!(
            result.unwrap_err().kind(),
            clap::error::ErrorKind::DisplayHelp
        );
    }

    #[test]
    fn test_cli_invalid_flag_returns_error() {
        let result = Args::try_parse_from(["emudl", "--concurrency", "4"]);
        assert_eq!(
            result.unwrap_err().kind(),
            clap::error::ErrorKind::UnknownArgument
        );
    }
}
