// ABOUTME: CLI argument definitions for the imgcat binary
// ABOUTME: Defines the command-line interface structure using clap derive macros

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "imgcat")]
#[command(about = "Display images inline in your terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Paths to the image files; reads stdin when omitted or given "-"
    pub input: Vec<String>,

    /// The number of rows (in terminal) for displaying images
    #[arg(long)]
    pub height: Option<u32>,

    /// The number of columns (in terminal) for displaying images
    #[arg(long)]
    pub width: Option<u16>,

    /// Clear all existing graphics (only effective in kitty)
    #[arg(short, long)]
    pub clear: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_inputs_and_geometry() {
        let cli = Cli::try_parse_from(["imgcat", "a.png", "b.gif", "--height", "12"]).unwrap();
        assert_eq!(cli.input, vec!["a.png", "b.gif"]);
        assert_eq!(cli.height, Some(12));
        assert_eq!(cli.width, None);
        assert!(!cli.clear);
    }

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::try_parse_from(["imgcat"]).unwrap();
        assert!(cli.input.is_empty());
        assert_eq!(cli.height, None);
        assert_eq!(cli.width, None);
        assert!(!cli.clear);
    }

    #[test]
    fn test_parse_clear_short_form() {
        let cli = Cli::try_parse_from(["imgcat", "-c"]).unwrap();
        assert!(cli.clear);
    }

    #[test]
    fn test_stdin_placeholder_is_a_plain_input() {
        let cli = Cli::try_parse_from(["imgcat", "-"]).unwrap();
        assert_eq!(cli.input, vec!["-"]);
    }
}
