use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cartoonify::models::AppConfig;
use cartoonify::server;
use cel_shade::{BlurType, CartoonConfig, Cartoonifier, QuantizerKind};

#[derive(Parser)]
#[command(name = "cartoonify")]
#[command(about = "Cartoonify - turn photos into flat-color, inked cartoons")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Convert a single image file to a cartoon PNG
    Render {
        /// Input image (png, jpg, jpeg or webp)
        #[arg(short, long)]
        input: PathBuf,

        /// Output PNG file path
        #[arg(short, long)]
        output: PathBuf,

        /// Smoothing: bilateral, median or gaussian
        #[arg(long, default_value_t = BlurType::Bilateral)]
        blur_type: BlurType,

        /// Palette size (clamped to 4..=16)
        #[arg(long, default_value_t = 8, allow_negative_numbers = true)]
        num_colors: i64,

        /// Line weight, 0.1 (bold) to 1.0 (thin)
        #[arg(long, default_value_t = 0.5)]
        line_strength: f32,

        /// Working resolution long side (clamped to 256..=2048)
        #[arg(long, default_value_t = 1024)]
        target_long_side: i64,

        /// Do not enlarge small inputs
        #[arg(long)]
        no_upscale: bool,

        /// Palette algorithm: kmeans or mediancut
        #[arg(long, default_value_t = QuantizerKind::KMeans)]
        quantizer: QuantizerKind,

        /// Fixed k-means seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Render {
            input,
            output,
            blur_type,
            num_colors,
            line_strength,
            target_long_side,
            no_upscale,
            quantizer,
            seed,
        }) => {
            let mut config = CartoonConfig::new()
                .blur_type(blur_type)
                .num_colors(num_colors)
                .line_strength(line_strength)
                .target_long_side(target_long_side)
                .upscale_small(!no_upscale)
                .quantizer(quantizer);
            if let Some(seed) = seed {
                config = config.seed(seed);
            }
            run_render_command(&input, &output, config)
        }
        Some(Commands::Serve) => run_server().await,
        None => {
            run_status_command();
            Ok(())
        }
    }
}

/// Convert one file (no server needed)
fn run_render_command(input: &Path, output: &Path, config: CartoonConfig) -> anyhow::Result<()> {
    // Minimal logging for CLI
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cartoonify=warn,cel_shade=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let rendering = Cartoonifier::new(config)
        .process_path(input)
        .map_err(|e| anyhow::anyhow!("Failed to cartoonify {}: {e}", input.display()))?;
    let png = rendering
        .to_png()
        .map_err(|e| anyhow::anyhow!("Failed to encode PNG: {e}"))?;

    std::fs::write(output, &png)
        .map_err(|e| anyhow::anyhow!("Failed to write {}: {e}", output.display()))?;

    let (width, height) = rendering.dimensions();
    println!(
        "Wrote {} ({width}x{height}, {} colors, edges {}, {} bytes)",
        output.display(),
        rendering.palette_size(),
        rendering.edges().as_str(),
        png.len()
    );

    Ok(())
}

/// Run the HTTP server
async fn run_server() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cartoonify=debug,cel_shade=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_file = std::env::var("CONFIG_FILE").ok().map(PathBuf::from);
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

    let mut config = AppConfig::load(config_file.as_deref());
    if let Ok(dir) = std::env::var("OUTPUT_DIR") {
        config = config.with_output_dir(dir);
    }

    tracing::info!(
        output_dir = %config.output_dir.display(),
        max_upload_bytes = config.max_upload_bytes,
        quantizer = %config.defaults.quantizer,
        "Configuration resolved"
    );

    // Create application state using shared server module
    let state = server::create_app_state(config)?;
    let app = server::build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "Cartoonify server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Show version, environment and available commands
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    // Read environment variables
    let bind_addr = std::env::var("BIND_ADDR").ok();
    let config_file = std::env::var("CONFIG_FILE").ok();
    let output_dir = std::env::var("OUTPUT_DIR").ok();

    // Header
    println!("Cartoonify v{VERSION}");
    println!("Photo to cartoon converter\n");

    // Environment variables section
    println!("Environment Variables:");
    println!(
        "  BIND_ADDR   = {}",
        bind_addr.as_deref().unwrap_or("0.0.0.0:3000 (default)")
    );
    println!(
        "  CONFIG_FILE = {}",
        config_file.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  OUTPUT_DIR  = {}",
        output_dir.as_deref().unwrap_or("(not set)")
    );

    // Config source
    let config_source = match config_file {
        Some(ref path) if Path::new(path).exists() => path.to_string(),
        Some(_) => "defaults (file not found)".to_string(),
        None => "defaults".to_string(),
    };
    println!("\nConfig: {config_source}");

    // Commands section
    println!("\nCommands:");
    println!("  cartoonify serve    Start the HTTP server");
    println!("  cartoonify render   Convert an image file to a cartoon PNG");
    println!("\nRun 'cartoonify --help' for more details.");
}
