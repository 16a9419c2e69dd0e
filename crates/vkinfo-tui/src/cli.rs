use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// vkinfo - browse and search Vulkan diagnostic text.
#[derive(Parser, Debug)]
#[command(name = "vkinfo", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Program that prints the diagnostic text (default: vulkaninfo).
    #[arg(long, conflicts_with_all = ["file", "report"])]
    pub command: Option<String>,

    /// Argument passed to --command (repeatable).
    #[arg(long = "arg", allow_hyphen_values = true, requires = "command")]
    pub args: Vec<String>,

    /// Read the diagnostic text from a file.
    #[arg(long, conflicts_with = "report")]
    pub file: Option<PathBuf>,

    /// Render a JSON report snapshot.
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Search query to submit on start.
    #[arg(short, long)]
    pub query: Option<String>,

    /// Print the (highlighted) text to stdout instead of opening the viewer.
    #[arg(long)]
    pub print: bool,

    /// When to style printed output.
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Log filter override (e.g. debug, info, vkinfo_core=trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Write logs to this file.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    pub fn enabled(self, is_terminal: bool) -> bool {
        match self {
            Self::Auto => is_terminal,
            Self::Always => true,
            Self::Never => false,
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_with_query() {
        let args = Args::try_parse_from(["vkinfo", "--print", "-q", "adreno"]).unwrap();
        assert!(args.print);
        assert_eq!(args.query.as_deref(), Some("adreno"));
        assert_eq!(args.color, ColorChoice::Auto);
    }

    #[test]
    fn test_command_with_args() {
        let args = Args::try_parse_from([
            "vkinfo",
            "--command",
            "vulkaninfo",
            "--arg",
            "--summary",
        ])
        .unwrap();
        assert_eq!(args.command.as_deref(), Some("vulkaninfo"));
        assert_eq!(args.args, vec!["--summary".to_string()]);
    }

    #[test]
    fn test_sources_conflict() {
        assert!(Args::try_parse_from(["vkinfo", "--file", "a.txt", "--report", "b.json"]).is_err());
        assert!(Args::try_parse_from(["vkinfo", "--command", "x", "--file", "a.txt"]).is_err());
    }

    #[test]
    fn test_color_choice() {
        assert!(ColorChoice::Auto.enabled(true));
        assert!(!ColorChoice::Auto.enabled(false));
        assert!(ColorChoice::Always.enabled(false));
        assert!(!ColorChoice::Never.enabled(true));
    }
}
