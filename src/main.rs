//! fountview - Terminal Fountain Screenplay Previewer
//!
//! Shows a Fountain screenplay rendered to HTML, or prints the markup with `--print`.

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use fountview::app::{render_document, standalone_document};
use fountview::render::ui::{ColorTheme, TerminalUI};
use fountview::{Application, Config, FountainLoader, ParserLoader, ScreenplaySource};
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

fn cli() -> Command {
    Command::new("fountview")
        .version(fountview::VERSION)
        .about("Preview Fountain screenplays in the terminal")
        .long_about(
            "fountview renders a Fountain screenplay to HTML with a background-loaded parser \
             and shows the markup in the terminal. Without a file the built-in sample is shown.",
        )
        .arg(
            Arg::new("file")
                .help("Path to the .fountain file to view")
                .index(1),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("PATH")
                .help("Configuration file (default: <config dir>/fountview/config.toml)"),
        )
        .arg(
            Arg::new("print")
                .long("print")
                .short('p')
                .action(ArgAction::SetTrue)
                .help("Render once and write the markup instead of starting the viewer"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .value_name("PATH")
                .requires("print")
                .help("Write printed markup to this file instead of stdout"),
        )
        .arg(
            Arg::new("standalone")
                .long("standalone")
                .action(ArgAction::SetTrue)
                .requires("print")
                .help("Wrap printed markup in a complete HTML document"),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .value_name("PATH")
                .help("Write log output to this file"),
        )
}

fn init_logging(matches: &ArgMatches) -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(path) = matches.get_one::<String>("log-file") {
        let file = File::create(path).with_context(|| format!("cannot create log file {path}"))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();
    init_logging(&matches)?;

    let config_path = matches.get_one::<String>("config").map(PathBuf::from);
    let config = Config::load(config_path.as_deref())?;

    let source = match matches.get_one::<String>("file") {
        Some(path) => {
            ScreenplaySource::open(&PathBuf::from(path), config.parser.max_input_bytes).await?
        }
        None => ScreenplaySource::sample(),
    };

    let loader: Arc<dyn ParserLoader> = Arc::new(
        FountainLoader::new(config.parser.clone()).with_delay(config.bridge.load_delay()),
    );

    if matches.get_flag("print") {
        let html = render_document(&config, loader, source.text()).await?;
        let output = if matches.get_flag("standalone") {
            standalone_document(&source.display_name(), &html)
        } else {
            html
        };
        match matches.get_one::<String>("output") {
            Some(path) => std::fs::write(path, output)
                .with_context(|| format!("cannot write {path}"))?,
            None => println!("{output}"),
        }
        return Ok(());
    }

    let theme = ColorTheme::from_name(config.ui.theme);
    let ui_renderer = Box::new(TerminalUI::with_theme(theme)?);
    let mut app = Application::new(config, source, ui_renderer, loader);

    app.run().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_constant() {
        assert!(!fountview::VERSION.is_empty());
    }

    #[test]
    fn test_cli_definition() {
        cli().debug_assert();
    }

    #[test]
    fn test_output_requires_print() {
        assert!(cli()
            .try_get_matches_from(["fountview", "--output", "out.html"])
            .is_err());
        let matches = cli()
            .try_get_matches_from(["fountview", "--print", "--standalone", "script.fountain"])
            .unwrap();
        assert!(matches.get_flag("standalone"));
        assert_eq!(
            matches.get_one::<String>("file").map(String::as_str),
            Some("script.fountain")
        );
    }
}
