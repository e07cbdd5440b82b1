//! Shelldoc CLI - documentation generator for shell UI sources

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use shelldoc_core::pipeline::{self, PipelineEvent};
use shelldoc_core::{DocConfig, HtmlRenderer, Pipeline, CONFIG_FILE};

#[derive(Parser)]
#[command(name = "shelldoc")]
#[command(version = shelldoc_core::VERSION)]
#[command(about = "Generate HTML documentation from commented shell UI sources", long_about = None)]
struct Cli {
    /// Log debug output (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Document every source file in a directory
    Build {
        /// Directory of source files (overrides the config file)
        input: Option<PathBuf>,

        /// Output directory for HTML pages
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory for intermediate XML markup
        #[arg(long)]
        markup: Option<PathBuf>,

        /// Configuration file (defaults to ./shelldoc.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Open the index in a browser after generation
        #[arg(long)]
        open: bool,
    },

    /// Extract documentation from one source file as XML markup
    Extract {
        /// Source file
        file: PathBuf,

        /// Write markup here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render one XML markup file as an HTML page
    Render {
        /// Markup file
        file: PathBuf,

        /// Write the page here (defaults to the markup path with .html)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Documentation title shown on the page
        #[arg(long, default_value = "Documentation")]
        title: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Build {
            input,
            output,
            markup,
            config,
            open,
        } => {
            let cwd = std::env::current_dir().context("Failed to read current directory")?;
            let mut doc_config = load_config(config.as_deref(), &cwd)?;
            if let Some(input) = input {
                doc_config.paths.input = cwd.join(input);
            }
            if let Some(output) = output {
                doc_config.paths.output = cwd.join(output);
            }
            if let Some(markup) = markup {
                doc_config.paths.markup = cwd.join(markup);
            }
            build(&doc_config, open)?;
        }

        Commands::Extract { file, output } => {
            let markup = pipeline::extract_file(&file)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, markup)
                        .with_context(|| format!("Failed to write '{}'", path.display()))?;
                    println!("Generated: {}", path.display());
                }
                None => print!("{markup}"),
            }
        }

        Commands::Render {
            file,
            output,
            title,
        } => {
            let page = pipeline::render_file(&file, &HtmlRenderer::new(title))?;
            let path = output.unwrap_or_else(|| file.with_extension(pipeline::PAGE_EXTENSION));
            std::fs::write(&path, page)
                .with_context(|| format!("Failed to write '{}'", path.display()))?;
            println!("Generated: {}", path.display());
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Load the configuration: an explicit path, else `shelldoc.toml` in `cwd`,
/// else defaults rooted at `cwd`.
fn load_config(explicit: Option<&Path>, cwd: &Path) -> Result<DocConfig> {
    let path = match explicit {
        Some(path) => cwd.join(path),
        None => {
            let candidate = cwd.join(CONFIG_FILE);
            if !candidate.is_file() {
                tracing::debug!("no {CONFIG_FILE} found, using defaults");
                let mut config = DocConfig::default();
                config.paths.input = cwd.join(&config.paths.input);
                config.paths.markup = cwd.join(&config.paths.markup);
                config.paths.output = cwd.join(&config.paths.output);
                return Ok(config);
            }
            candidate
        }
    };

    tracing::debug!(config = %path.display(), "loading configuration");
    DocConfig::from_path(&path)
        .with_context(|| format!("Failed to load config '{}'", path.display()))
}

fn build(config: &DocConfig, open: bool) -> Result<()> {
    let report = Pipeline::new(config).run(|event| match event {
        PipelineEvent::Started { name, .. } => println!("Documenting {name}"),
        PipelineEvent::Indexed { .. } => {}
        PipelineEvent::Skipped { failed } => {
            eprintln!("Skipping {}: {}", failed.name, failed.error);
        }
    })?;

    let indexed = report.indexed().count();
    let failed = report.failed().count();
    println!(
        "Documented {indexed} file{}, skipped {failed}. Index: {}",
        if indexed == 1 { "" } else { "s" },
        report.index_path.display()
    );

    if open {
        open_in_browser(&report.index_path)?;
    }

    Ok(())
}

/// Open a file in the default browser
fn open_in_browser(path: &Path) -> Result<()> {
    let url = format!("file://{}", path.canonicalize()?.display());

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(&url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(&url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", "", &url])
            .spawn()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_build_with_overrides() {
        let cli = Cli::try_parse_from([
            "shelldoc", "-v", "build", "js/ui", "-o", "out", "--markup", "xml", "--open",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Build {
                input,
                output,
                markup,
                config,
                open,
            } => {
                assert_eq!(input, Some(PathBuf::from("js/ui")));
                assert_eq!(output, Some(PathBuf::from("out")));
                assert_eq!(markup, Some(PathBuf::from("xml")));
                assert!(config.is_none());
                assert!(open);
            }
            _ => panic!("expected build"),
        }
    }

    #[test]
    fn parse_extract_without_output() {
        let cli = Cli::try_parse_from(["shelldoc", "extract", "panel.js"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Extract { ref file, output: None } if file == Path::new("panel.js")
        ));
    }

    #[test]
    fn render_requires_file() {
        assert!(Cli::try_parse_from(["shelldoc", "render"]).is_err());
    }

    #[test]
    fn config_defaults_to_cwd() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(None, dir.path()).unwrap();
        assert_eq!(config.input_dir(), dir.path().join("."));
        assert_eq!(config.output_dir(), dir.path().join("doc/html"));
    }

    #[test]
    fn config_file_in_cwd_is_used() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "[project]\ntitle = \"Cinnamon JS\"\n[paths]\ninput = \"js\"\n",
        )
        .unwrap();

        let config = load_config(None, dir.path()).unwrap();
        assert_eq!(config.project.title, "Cinnamon JS");
        assert_eq!(config.input_dir(), dir.path().join("js"));
    }

    #[test]
    fn invalid_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[project]\ntitle = \"\"\n").unwrap();
        assert!(load_config(Some(&path), dir.path()).is_err());
    }
}
