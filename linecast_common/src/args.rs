//! Command-line arguments shared by the publisher and subscriber.
//!
//! Both binaries accept the same fixed flag set, so the CLI definition lives
//! here. Parsing has three terminal outcomes modeled by [`ParseOutcome`]:
//! run with a configuration, fail after printing usage, or exit cleanly after
//! printing help. The first problem encountered stops the scan; later flags
//! are never applied.

use std::ffi::OsString;
use std::num::ParseIntError;
use std::path::PathBuf;

use clap::Parser;
use clap::error::ErrorKind;

use crate::compression::CompressionId;
use crate::verbosity::Verbosity;

/// Parsed command-line arguments.
///
/// Constructed once per process invocation and immutable afterwards; the
/// middleware-facing session code only reads from it.
#[derive(Debug, Clone, Parser)]
#[command(name = "linecast", version)]
#[command(about = "Sample publish/subscribe application with payload compression")]
pub struct AppArgs {
    /// Domain id this application will publish/subscribe in
    #[arg(short = 'd', long = "domain", default_value_t = 0)]
    pub domain_id: u32,

    /// Number of samples to publish or receive before cleanly shutting down.
    /// Runs forever when omitted
    #[arg(short, long)]
    pub sample_count: Option<u64>,

    /// Max size of a single line read from the input file
    #[arg(short, long, default_value_t = 4096)]
    pub max_string_length: usize,

    /// Compression algorithm applied to sample payloads
    #[arg(
        short = 'c',
        long = "compression-id",
        value_enum,
        ignore_case = true,
        default_value_t = CompressionId::Lz4
    )]
    pub compression_id: CompressionId,

    /// Path to the file to publish, read line by line (each line is one
    /// sample). A 1K zero-filled payload is published when omitted
    #[arg(short, long)]
    pub input_file: Option<PathBuf>,

    /// How much debugging output to show, 0-3
    #[arg(short, long, default_value = "1", value_parser = parse_verbosity)]
    pub verbosity: Verbosity,
}

/// Terminal outcome of a parse attempt.
#[derive(Debug)]
pub enum ParseOutcome {
    /// Arguments are valid; proceed with this configuration.
    Run(AppArgs),
    /// Bad flag, unknown token, or missing/malformed value. Usage has been
    /// printed; the caller should exit non-zero.
    Failure,
    /// Help or version was requested and printed; the caller should exit
    /// zero.
    Exit,
}

/// Parse the process argument list (program name first).
///
/// Never panics and never terminates the process; invalid input and help
/// requests are reported through [`ParseOutcome`] after the usage text has
/// been printed.
pub fn parse_arguments<I, T>(argv: I) -> ParseOutcome
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match AppArgs::try_parse_from(argv) {
        Ok(args) => ParseOutcome::Run(args),
        Err(err) => {
            let outcome = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ParseOutcome::Exit,
                _ => ParseOutcome::Failure,
            };
            let _ = err.print();
            outcome
        }
    }
}

/// Verbosity values outside 0-3 are a documented fallback, not an error, so
/// only non-numeric input is rejected here.
fn parse_verbosity(raw: &str) -> Result<Verbosity, ParseIntError> {
    Ok(Verbosity::from_level(raw.parse::<i64>()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> ParseOutcome {
        parse_arguments(std::iter::once("linecast").chain(argv.iter().copied()))
    }

    fn expect_run(argv: &[&str]) -> AppArgs {
        match parse(argv) {
            ParseOutcome::Run(args) => args,
            other => panic!("expected Run for {argv:?}, got {other:?}"),
        }
    }

    #[test]
    fn no_arguments_yield_all_defaults() {
        let args = expect_run(&[]);
        assert_eq!(args.domain_id, 0);
        assert_eq!(args.sample_count, None);
        assert_eq!(args.max_string_length, 4096);
        assert_eq!(args.compression_id, CompressionId::Lz4);
        assert_eq!(args.input_file, None);
        assert_eq!(args.verbosity, Verbosity::ErrorsOnly);
    }

    #[test]
    fn all_flags_parse_in_any_order() {
        let args = expect_run(&[
            "--verbosity",
            "3",
            "-i",
            "lines.txt",
            "--domain",
            "7",
            "-c",
            "ZLIB",
            "--sample-count",
            "25",
            "-m",
            "512",
        ]);
        assert_eq!(args.domain_id, 7);
        assert_eq!(args.sample_count, Some(25));
        assert_eq!(args.max_string_length, 512);
        assert_eq!(args.compression_id, CompressionId::Zlib);
        assert_eq!(args.input_file, Some(PathBuf::from("lines.txt")));
        assert_eq!(args.verbosity, Verbosity::StatusAll);
    }

    #[test]
    fn short_and_long_forms_are_equivalent() {
        let short = expect_run(&["-d", "3", "-s", "10"]);
        let long = expect_run(&["--domain", "3", "--sample-count", "10"]);
        assert_eq!(short.domain_id, long.domain_id);
        assert_eq!(short.sample_count, long.sample_count);
    }

    #[test]
    fn unknown_token_is_a_failure() {
        assert!(matches!(parse(&["--frequency", "10"]), ParseOutcome::Failure));
        assert!(matches!(parse(&["bogus"]), ParseOutcome::Failure));
    }

    #[test]
    fn value_flag_as_last_token_is_a_failure() {
        assert!(matches!(parse(&["--domain"]), ParseOutcome::Failure));
        assert!(matches!(parse(&["-d", "1", "-i"]), ParseOutcome::Failure));
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        assert!(matches!(parse(&["--domain", "seven"]), ParseOutcome::Failure));
        assert!(matches!(parse(&["-v", "high"]), ParseOutcome::Failure));
    }

    #[test]
    fn help_requests_exit_even_after_valid_flags() {
        assert!(matches!(parse(&["--help"]), ParseOutcome::Exit));
        assert!(matches!(parse(&["-d", "5", "--help"]), ParseOutcome::Exit));
        assert!(matches!(parse(&["-h"]), ParseOutcome::Exit));
    }

    #[test]
    fn verbosity_integers_map_with_fallback() {
        assert_eq!(expect_run(&["-v", "0"]).verbosity, Verbosity::Silent);
        assert_eq!(expect_run(&["-v", "1"]).verbosity, Verbosity::ErrorsOnly);
        assert_eq!(expect_run(&["-v", "2"]).verbosity, Verbosity::Warnings);
        assert_eq!(expect_run(&["-v", "3"]).verbosity, Verbosity::StatusAll);
        assert_eq!(expect_run(&["-v", "9"]).verbosity, Verbosity::ErrorsOnly);
    }

    #[test]
    fn compression_identifiers_are_case_insensitive() {
        assert_eq!(
            expect_run(&["-c", "bzip2"]).compression_id,
            CompressionId::Bzip2
        );
        assert_eq!(
            expect_run(&["--compression-id", "NONE"]).compression_id,
            CompressionId::None
        );
        assert!(matches!(parse(&["-c", "SNAPPY"]), ParseOutcome::Failure));
    }
}
