use clap::Parser;

/// Command line options shared by both bots.
#[derive(Debug, Parser)]
pub struct Args {
    /// Specify config file location
    #[arg(short = 'c', value_name = "path")]
    pub config: Option<std::path::PathBuf>,

    /// Enable verbose diagnostics
    #[arg(short = 'v')]
    pub verbose: bool,
}

impl Args {
    /// Parses the process arguments. `-h` prints the usage and exits 0,
    /// anything malformed prints an error and exits 1.
    pub fn parse_or_exit() -> Self {
        Self::try_parse().unwrap_or_else(|err| {
            let code = match err.kind() {
                clap::error::ErrorKind::DisplayHelp => 0,
                _ => 1,
            };
            let _ = err.print();
            std::process::exit(code);
        })
    }
}
