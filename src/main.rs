//! # thumbgen CLI
//!
//! ```bash
//! # Launch the visual editor on port 8080
//! thumbgen --editor
//!
//! # Render templates/intro.json to out/intro.png
//! thumbgen -t intro
//!
//! # Render a YAML thumbnail config
//! thumbgen -c thumb.yaml -o cover.png
//! ```

use clap::Parser;
use log::{warn, LevelFilter};
use std::path::PathBuf;

use thumbgen::{
    server::{EditorApp, EditorServer},
    AssetResolver, CaptureConfig, Error, FontFace, Paths, RenderOptions, Renderer, Result, Template,
    ThumbnailConfig,
};

/// Thumbnail generator
#[derive(Parser, Debug)]
#[command(name = "thumbgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Launch the visual editor
    #[arg(long)]
    editor: bool,

    /// Editor server port
    #[arg(long, default_value_t = 8080)]
    port: u16,

    /// Do not open the editor in the default web browser
    #[arg(long)]
    no_open: bool,

    /// Template JSON file: a path, a name under templates/, or a name without .json
    #[arg(short, long)]
    template: Option<String>,

    /// Thumbnail config file (YAML, or JSON by extension)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output file path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory holding assets/, templates/, editor/ and out/ (defaults to
    /// the current directory, not the install location)
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Do not link web font stylesheets
    #[arg(long)]
    offline: bool,

    /// Embed a local font file (repeatable)
    #[arg(long = "font", value_name = "FAMILY=PATH")]
    fonts: Vec<String>,

    /// Chrome executable to launch
    #[arg(long, value_name = "PATH")]
    chrome: Option<PathBuf>,

    /// Run Chrome without its sandbox (needed as root in most containers)
    #[arg(long)]
    no_sandbox: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let paths = Paths::new(&cli.root);

    if cli.editor {
        let renderer = renderer(&cli, &paths)?;
        let app = EditorApp::new(paths, renderer, capturer(&cli)?);
        let server = EditorServer::bind(&format!("127.0.0.1:{}", cli.port), app)?;
        let url = format!("http://localhost:{}", cli.port);
        println!("Starting thumbnail editor at {}", url);
        println!("Press Ctrl+C to stop\n");
        if !cli.no_open {
            if let Err(e) = webbrowser::open(&url) {
                warn!("could not open a browser for {}: {}", url, e);
            }
        }
        return server.run();
    }

    if let Some(name) = &cli.template {
        let template_path = paths
            .find_template(name)
            .ok_or_else(|| Error::TemplateNotFound(name.clone()))?;
        let output = cli
            .output
            .clone()
            .unwrap_or_else(|| paths.default_output(&template_path));

        println!("Generating from template: {}", template_path.display());
        let template = Template::load(&template_path)?;
        let saved = thumbgen::generate_to_file(
            &template,
            &renderer(&cli, &paths)?,
            capturer(&cli)?.as_ref(),
            &output,
        )?;
        println!("Thumbnail saved to: {}", saved.display());
        return Ok(());
    }

    if let Some(config_path) = &cli.config {
        let config = ThumbnailConfig::load(config_path)?;
        let output = cli
            .output
            .clone()
            .unwrap_or_else(|| paths.output.join(&config.output.filename));

        println!("Generating from config: {}", config_path.display());
        let saved = thumbgen::generate_to_file(
            &config.to_template(),
            &renderer(&cli, &paths)?,
            capturer(&cli)?.as_ref(),
            &output,
        )?;
        println!("Thumbnail saved to: {}", saved.display());
        return Ok(());
    }

    print_usage();
    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    if let Err(e) = simple_logger::SimpleLogger::new().with_level(level).env().init() {
        eprintln!("Logger already initialised: {}", e);
    }
}

fn renderer(cli: &Cli, paths: &Paths) -> Result<Renderer> {
    let mut options = if cli.offline {
        RenderOptions::offline()
    } else {
        RenderOptions::default()
    };
    for arg in &cli.fonts {
        options = options.with_font(FontFace::from_arg(arg)?);
    }
    Ok(Renderer::new(AssetResolver::new(&paths.assets)).with_options(options))
}

fn capturer(cli: &Cli) -> Result<Box<dyn thumbgen::Capture>> {
    thumbgen::default_capturer(CaptureConfig {
        chrome_path: cli.chrome.clone(),
        sandbox: !cli.no_sandbox,
        ..Default::default()
    })
}

fn print_usage() {
    println!("Thumbnail Generator");
    println!();
    println!("Usage:");
    println!("  thumbgen --editor              # Launch visual editor");
    println!("  thumbgen -t template.json      # Generate from template");
    println!("  thumbgen -c thumbnail.yaml     # Generate from config");
    println!();
    println!("assets/, templates/, editor/ and out/ are looked up under --root,");
    println!("which defaults to the current directory.");
    println!();
    println!("Run with --help for more options");
}
