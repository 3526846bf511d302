use clap::{Parser, Subcommand};
use gallery_site::album::{self, Album};
use gallery_site::config::{self, BuildOptions, Overrides};
use gallery_site::{output, website};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Flags that override the theme and SEO settings of `config.toml`.
#[derive(clap::Args, Clone, Default)]
struct ThemeArgs {
    /// Theme name, looked up as `theme-<name>` in the theme directories
    #[arg(long)]
    theme: Option<String>,

    /// Theme directory to use directly (wins over --theme)
    #[arg(long)]
    theme_path: Option<PathBuf>,

    /// Extra stylesheet appended to the theme stylesheet
    #[arg(long)]
    theme_style: Option<PathBuf>,

    /// JSON file exposed to templates as `settings`
    #[arg(long)]
    theme_settings: Option<PathBuf>,

    /// Public site URL; enables sitemap.xml and robots.txt
    #[arg(long)]
    seo_location: Option<String>,
}

#[derive(Parser)]
#[command(name = "gallery-site")]
#[command(about = "Render a photo album tree into a static website")]
#[command(long_about = "\
Render a photo album tree into a static website

The album tree is a JSON manifest written by a scanner:

  {
    \"path\": \"index.html\", \"url\": \"\", \"title\": \"Home\",
    \"albums\": [
      { \"path\": \"travel.html\", \"url\": \"travel.html\", \"title\": \"Travel\" }
    ]
  }

Every album becomes one page rendered through the theme's album.html
template. Output layout:

  dist/
  ├── index.html, travel.html, ...  # One page per album
  ├── public/core.css               # Base stylesheet
  ├── public/gallery.js             # Base script
  ├── public/theme.css              # Theme stylesheet (+ --theme-style)
  ├── sitemap.xml                   # Only with seo_location
  └── robots.txt                    # Only with seo_location

Run 'gallery-site gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults apply when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output directory (overrides `output` from the config file)
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Log build progress (same as RUST_LOG=info)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render the album tree into a website
    Build {
        /// Album tree manifest (JSON)
        manifest: PathBuf,
        #[command(flatten)]
        theme: ThemeArgs,
    },
    /// Validate the configuration and album tree without rendering
    Check {
        /// Album tree manifest (JSON)
        manifest: PathBuf,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Build { manifest, theme } => {
            let options = load_options(cli.config, cli.output, theme)?;
            let root = Arc::new(Album::load(&manifest)?);
            init_thread_pool(&options.render);

            println!(
                "==> Building {} albums from {}",
                root.count(),
                manifest.display()
            );
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_build_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let build = website::build(root, &options, Some(tx));
            printer
                .join()
                .map_err(|_| "progress printer thread panicked")?;
            // Waits for the sitemap even when rendering failed
            let (summary, seo) = build?.finish()?;
            output::print_build_result(&summary, &seo, &options.output);
        }
        Command::Check { manifest } => {
            let options = load_options(cli.config, cli.output, ThemeArgs::default())?;
            println!("==> Checking {}", manifest.display());
            let root = Album::load(&manifest)?;
            album::validate(&root)?;
            let theme_dir = website::resolve_theme_dir(&options)?;
            output::print_album_tree(&root);
            println!("Theme: {}", theme_dir.display());
            println!("==> Album tree is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load `config.toml` and apply command-line overrides on top.
fn load_options(
    config_path: Option<PathBuf>,
    output: Option<PathBuf>,
    theme: ThemeArgs,
) -> Result<BuildOptions, config::ConfigError> {
    let mut options = config::load_config(config_path.as_deref())?;
    options.apply(Overrides {
        output,
        theme: theme.theme,
        theme_path: theme.theme_path,
        theme_style: theme.theme_style,
        theme_settings: theme.theme_settings,
        seo_location: theme.seo_location,
    });
    options.validate()?;
    Ok(options)
}

/// Install the log subscriber. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Initialize the rayon thread pool based on render config.
///
/// Caps at the number of available CPU cores: user can constrain down, not up.
fn init_thread_pool(render: &config::RenderConfig) {
    let threads = config::effective_workers(render);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
