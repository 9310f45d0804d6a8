// ABOUTME: Command line parsing for the tessera binary
// ABOUTME: Flags mirror the editor's: repeated -v for verbosity, -c for a config file

use anyhow::{Context, Result};
use std::path::PathBuf;

pub const USAGE: &str = "\
USAGE:
    tessera [FLAGS] [environment.dme] [maps.dmm]...

FLAGS:
    -h, --help               Prints help information
    -V, --version            Prints version information
    -c, --config <file>      Specifies a file to use for configuration
    -v                       Increases logging verbosity each use for up to 3 times
";

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Args {
    pub display_help: bool,
    pub display_version: bool,
    pub verbosity: u64,
    pub config_file: Option<PathBuf>,
    /// Environment to open at startup
    pub environment: Option<PathBuf>,
    /// Maps to open once the environment is loaded
    pub maps: Vec<PathBuf>,
}

impl Args {
    pub fn parse_args() -> Result<Args> {
        Self::parse(std::env::args().skip(1))
    }

    pub fn parse<I>(args: I) -> Result<Args>
    where
        I: IntoIterator<Item = String>,
    {
        let mut parsed = Args::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => parsed.display_help = true,
                "-V" | "--version" => parsed.display_version = true,
                "-c" | "--config" => {
                    let file = args.next().context("-c requires a file argument")?;
                    parsed.config_file = Some(PathBuf::from(file));
                }
                flag if flag.starts_with("-v") && flag[1..].chars().all(|c| c == 'v') => {
                    parsed.verbosity += (flag.len() - 1) as u64;
                }
                flag if flag.starts_with('-') && flag.len() > 1 => {
                    anyhow::bail!("unexpected argument: {flag}");
                }
                path if parsed.environment.is_none() => {
                    parsed.environment = Some(PathBuf::from(path));
                }
                path => parsed.maps.push(PathBuf::from(path)),
            }
        }

        Ok(parsed)
    }
}
