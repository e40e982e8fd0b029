//! Headless replay: run a JSON input script and write the flattened PNG.

use clap::Parser;
use easel_editor::script::{parse_script, replay};
use easel_editor::{Editor, EditorConfig, EditorError, EditorResult, ShortcutRegistry};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Replay recorded pointer and key input against a fresh drawing surface.
#[derive(Parser, Debug)]
#[command(name = "easel", version, about = "Headless Easel script replay")]
struct Cli {
    /// JSON array of script steps. `load` paths resolve against its directory.
    #[arg(value_name = "SCRIPT.json", required_unless_present = "shortcuts")]
    script: Option<PathBuf>,

    /// Where the flattened PNG is written.
    #[arg(value_name = "OUT.png", required_unless_present = "shortcuts")]
    output: Option<PathBuf>,

    /// Editor configuration (JSON). Defaults apply when omitted.
    #[arg(short, long, value_name = "CONFIG.json")]
    config: Option<PathBuf>,

    /// Print the keyboard shortcuts and exit.
    #[arg(long)]
    shortcuts: bool,
}

async fn run(script: &Path, output: &Path, config: Option<&Path>) -> EditorResult<()> {
    let config = match config {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };
    let steps = parse_script(&std::fs::read_to_string(script)?)?;
    let base_dir = script.parent().unwrap_or(Path::new("."));

    let mut editor = Editor::new(&config)?;
    replay(&mut editor, &steps, base_dir).await?;

    let artwork = editor.export_artwork()?;
    std::fs::write(output, &artwork.png)?;
    log::info!(
        "Wrote {} ({}x{}, {} shapes)",
        output.display(),
        artwork.width,
        artwork.height,
        artwork.shapes.len()
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let (Some(script), Some(output)) = (cli.script.as_deref(), cli.output.as_deref()) else {
        ShortcutRegistry::print_all();
        return ExitCode::SUCCESS;
    };

    match pollster::block_on(run(script, output, cli.config.as_deref())) {
        Ok(()) => ExitCode::SUCCESS,
        Err(EditorError::GestureInProgress(what)) => {
            log::error!("Script ended mid-gesture; cannot {what}");
            ExitCode::FAILURE
        }
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use clap::error::ErrorKind;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_positionals_and_config() {
        let cli = Cli::try_parse_from(["easel", "draw.json", "out.png", "--config", "cfg.json"]).unwrap();
        assert_eq!(cli.script.as_deref(), Some(Path::new("draw.json")));
        assert_eq!(cli.output.as_deref(), Some(Path::new("out.png")));
        assert_eq!(cli.config.as_deref(), Some(Path::new("cfg.json")));
        assert!(!cli.shortcuts);
    }

    #[test]
    fn test_missing_output_is_rejected() {
        let err = Cli::try_parse_from(["easel", "draw.json"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_extra_arguments_are_rejected() {
        let err = Cli::try_parse_from(["easel", "a.json", "b.png", "c.json"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_shortcuts_needs_no_paths() {
        let cli = Cli::try_parse_from(["easel", "--shortcuts"]).unwrap();
        assert!(cli.shortcuts && cli.script.is_none());
    }
}
