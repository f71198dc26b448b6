use clap::Parser;

use crate::config::{CarveOptions, DEFAULT_CONTEXT, DEFAULT_MAX_CANDIDATES, SearchOptions};
use crate::recovery::Codepage;
use crate::recovery::text::DEFAULT_MIN_RUN_LEN;

fn parse_codepage(name: &str) -> Result<Codepage, String> {
    Codepage::from_name(name).ok_or_else(|| {
        let known: Vec<_> = Codepage::ALL.iter().map(Codepage::name).collect();
        format!("unknown codepage '{}' (known: {})", name, known.join(", "))
    })
}

#[derive(Parser, Debug)]
#[command(name = "xmicarve")]
#[command(version)]
#[command(about = "Carve and recover ZIP entries from damaged or base64-wrapped dumps", long_about = None)]
#[command(after_help = "Examples:\n  \
  xmicarve -v dump.b64                 list carved entries with recovery details\n  \
  xmicarve -d out dump.b64 --json      write recovered entries and report.json to out/\n  \
  xmicarve -s FIRE USERID -- dump.b64  search recovered content for keywords\n  \
  xmicarve -x dump.b64                 list emails, user IDs and NETDATA headers\n  \
  xmicarve -p --raw capture.bin | less send recovered content via pipe")]
pub struct Cli {
    /// Dump file path or HTTP URL
    #[arg(value_name = "FILE")]
    pub file: String,

    /// List entries (short format)
    #[arg(short = 'l')]
    pub list: bool,

    /// List verbosely with boundaries and strategies
    #[arg(short = 'v')]
    pub verbose: bool,

    /// Write recovered entries into DIR
    #[arg(short = 'd', value_name = "DIR")]
    pub extract_dir: Option<String>,

    /// Send recovered content to stdout, no messages
    #[arg(short = 'p')]
    pub pipe: bool,

    /// Search recovered content for these terms
    #[arg(short = 's', value_name = "TERM", num_args = 1..)]
    pub search: Vec<String>,

    /// Report emails, user IDs and NETDATA headers in recovered content
    #[arg(short = 'x', long)]
    pub extract: bool,

    /// Bytes of context shown around each search hit
    #[arg(long, value_name = "N", default_value_t = DEFAULT_CONTEXT)]
    pub context: usize,

    /// Input is already binary; do not try to unwrap base64
    #[arg(long)]
    pub raw: bool,

    /// Also write report.json (with -d)
    #[arg(long)]
    pub json: bool,

    /// Also write raw payloads of unrecoverable entries (with -d)
    #[arg(long)]
    pub save_failed: bool,

    /// Shortest printable run kept by text recovery
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MIN_RUN_LEN)]
    pub min_run: usize,

    /// Stop scanning after N header candidates
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_CANDIDATES)]
    pub max_candidates: usize,

    /// Legacy codepages to try, in order
    #[arg(long, value_name = "CP", value_delimiter = ',', value_parser = parse_codepage)]
    pub codepages: Vec<Codepage>,

    /// Overwrite files WITHOUT prompting
    #[arg(short = 'o')]
    pub overwrite: bool,

    /// Quiet mode (-qq => quieter)
    #[arg(short = 'q', action = clap::ArgAction::Count)]
    pub quiet: u8,
}

impl Cli {
    pub fn is_quiet(&self) -> bool {
        self.quiet > 0 || self.pipe
    }

    pub fn is_very_quiet(&self) -> bool {
        self.quiet > 1
    }

    /// Default log filter when `RUST_LOG` is unset
    pub fn log_level(&self) -> &'static str {
        if self.is_very_quiet() {
            "error"
        } else if self.is_quiet() {
            "warn"
        } else if self.verbose {
            "info"
        } else {
            "warn"
        }
    }

    pub fn carve_options(&self) -> CarveOptions {
        let options = CarveOptions::default()
            .with_max_candidates(self.max_candidates)
            .with_min_run_len(self.min_run);
        if self.codepages.is_empty() {
            options
        } else {
            options.with_codepages(self.codepages.iter().copied())
        }
    }

    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            context: self.context,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_options() {
        let cli = Cli::try_parse_from(["xmicarve", "dump.b64"]).unwrap();
        assert_eq!(cli.carve_options(), CarveOptions::default());
        assert_eq!(cli.search_options(), SearchOptions::default());
        assert_eq!(cli.log_level(), "warn");
        assert!(!cli.extract);
    }

    #[test]
    fn extract_flag() {
        let cli = Cli::try_parse_from(["xmicarve", "-x", "dump.b64"]).unwrap();
        assert!(cli.extract);
        let cli = Cli::try_parse_from(["xmicarve", "--extract", "-v", "dump.b64"]).unwrap();
        assert!(cli.extract && cli.verbose);
    }

    #[test]
    fn flags_reach_options() {
        let cli = Cli::try_parse_from([
            "xmicarve",
            "--min-run",
            "8",
            "--max-candidates",
            "10",
            "--codepages",
            "cp500,cp1140",
            "-qq",
            "-s",
            "FIRE",
            "USERID",
            "--",
            "dump.b64",
        ])
        .unwrap();
        let options = cli.carve_options();
        assert_eq!(options.min_run_len, 8);
        assert_eq!(options.max_candidates, 10);
        assert_eq!(options.codepages, vec![Codepage::Cp500, Codepage::Cp1140]);
        assert_eq!(cli.search, vec!["FIRE", "USERID"]);
        assert_eq!(cli.file, "dump.b64");
        assert_eq!(cli.log_level(), "error");
    }

    #[test]
    fn unknown_codepage_is_rejected() {
        assert!(Cli::try_parse_from(["xmicarve", "--codepages", "cp999", "x"]).is_err());
    }
}
