// ABOUTME: Main entry point for the imgcat binary
// ABOUTME: Reads image bytes from files or stdin and renders them inline

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use std::env;
use std::io::{self, IsTerminal, Read};
use std::path::Path;

use imgcat::cli::Cli;
use imgcat::{Imgcat, ImgcatOptions, ImageSource};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let term = env::var("TERM").unwrap_or_default();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let pipeline = Imgcat::new();
    if cli.clear {
        pipeline.clear(&term, &mut out)?;
    }

    let mut options = ImgcatOptions::new();
    options.height = cli.height;
    options.width = cli.width;
    options.term = term;

    // Piped input takes over when no paths (or only "-") are given.
    let stdin = io::stdin();
    if !stdin.is_terminal() && (cli.input.is_empty() || cli.input == ["-"]) {
        let mut buf = Vec::new();
        stdin.lock().read_to_end(&mut buf)?;
        pipeline.render(ImageSource::Bytes(buf), &options, &mut out)?;
        return Ok(());
    }

    for path in &cli.input {
        let buf = std::fs::read(path).with_context(|| format!("failed to read {}", path))?;
        options.filename = Path::new(path)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        pipeline.render(ImageSource::Bytes(buf), &options, &mut out)?;
    }

    if !cli.clear && cli.input.is_empty() {
        Cli::command().print_help()?;
    }

    Ok(())
}
