use clap::{Parser, Subcommand};
use cropscale::imaging::{
    Quality, ResampleFilter, ResizeError, ResizeRequest, RustBackend, operations,
};
use cropscale::{batch, config, output};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Requested output size. Omit one to keep the source aspect ratio, omit
/// both to re-encode at the original size.
#[derive(clap::Args, Clone, Copy)]
struct SizeArgs {
    /// Target width in pixels
    #[arg(long, short = 'W', value_parser = clap::value_parser!(u32).range(1..))]
    width: Option<u32>,

    /// Target height in pixels
    #[arg(long, short = 'H', value_parser = clap::value_parser!(u32).range(1..))]
    height: Option<u32>,
}

/// Encoding flags for commands that write images.
#[derive(clap::Args, Clone, Copy)]
struct EncodeArgs {
    #[command(flatten)]
    size: SizeArgs,

    /// JPEG quality 0-100 (default from config, else 90)
    #[arg(long, short, value_parser = clap::value_parser!(u32).range(0..=100))]
    quality: Option<u32>,
}

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "cropscale")]
#[command(about = "Center-crop and rescale images to an exact size")]
#[command(long_about = "\
Center-crop and rescale images to an exact size

The output always has exactly the requested dimensions. When the requested
aspect ratio differs from the source, the source is center-cropped first:

  target wider than source   → top and bottom are trimmed
  target taller than source  → left and right are trimmed

Give only --width or only --height to keep the source aspect ratio.
Images are never upscaled: a target larger than the source is refused.
Output is always JPEG.

Run 'cropscale gen-config' to generate a documented cropscale.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Directory containing cropscale.toml
    #[arg(long, default_value = ".", global = true)]
    config: PathBuf,

    /// Interpolation filter (default from config, else bicubic)
    #[arg(long, value_enum, global = true)]
    filter: Option<ResampleFilter>,

    /// Log resolved crop geometry and batch progress to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resize a single image file
    Resize {
        source: PathBuf,
        target: PathBuf,
        #[command(flatten)]
        encode: EncodeArgs,
    },
    /// Show the output size and crop rectangle without writing anything
    Plan {
        source: PathBuf,
        #[command(flatten)]
        size: SizeArgs,
    },
    /// Resize every image under a directory
    Batch {
        source_dir: PathBuf,
        output_dir: PathBuf,
        #[command(flatten)]
        encode: EncodeArgs,
    },
    /// Print a stock cropscale.toml with all options documented
    GenConfig,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let load_config = || -> Result<_, config::ConfigError> {
        let tool_config = config::load_config(&cli.config)?;
        let filter = cli.filter.unwrap_or(tool_config.resample.filter);
        Ok((tool_config, filter))
    };
    let backend = RustBackend::new();

    match cli.command {
        Command::Resize {
            source,
            target,
            encode,
        } => {
            let (tool_config, filter) = load_config()?;
            let Some(bytes) = read_source(&source)? else {
                return Ok(ExitCode::FAILURE);
            };
            operations::output_format_for(&target)?;
            let request = build_request(&encode, &tool_config);
            match operations::resize_bytes(&backend, &bytes, &request, filter) {
                Ok(encoded) => {
                    batch::write_output(&target, &encoded.bytes)?;
                    output::print_resize_result(&target, &encoded);
                }
                Err(ResizeError::Resolve(e)) => {
                    eprintln!("Error: {}", output::format_rejected_request(&e));
                    return Ok(ExitCode::FAILURE);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Command::Plan { source, size } => {
            let (tool_config, _) = load_config()?;
            let Some(bytes) = read_source(&source)? else {
                return Ok(ExitCode::FAILURE);
            };
            let request = ResizeRequest::new(size.width, size.height, tool_config.quality());
            match operations::plan_resize_bytes(&backend, &bytes, &request) {
                Ok((source_dims, resolved)) => output::print_plan(source_dims, &resolved),
                Err(ResizeError::Resolve(e)) => {
                    eprintln!("Error: {}", output::format_rejected_request(&e));
                    return Ok(ExitCode::FAILURE);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Command::Batch {
            source_dir,
            output_dir,
            encode,
        } => {
            let (tool_config, filter) = load_config()?;
            init_thread_pool(&tool_config.processing);
            let options = batch::BatchOptions {
                request: build_request(&encode, &tool_config),
                filter,
            };
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = {
                let source_dir = source_dir.clone();
                let output_dir = output_dir.clone();
                std::thread::spawn(move || {
                    for event in rx {
                        println!(
                            "{}",
                            output::format_batch_event(&event, &source_dir, &output_dir)
                        );
                    }
                })
            };
            let summary = batch::run(&backend, &source_dir, &output_dir, &options, Some(tx))?;
            printer.join().map_err(|_| "output thread panicked")?;
            println!("{}", output::format_batch_summary(&summary));
            if summary.failed > 0 {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Install the tracing subscriber. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "cropscale=debug"
    } else {
        "cropscale=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Capped at the number of available CPU cores.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

/// Read the source file, or report that it is missing.
fn read_source(path: &Path) -> std::io::Result<Option<Vec<u8>>> {
    if !path.is_file() {
        eprintln!("Error: Source file does not exist: {}", path.display());
        return Ok(None);
    }
    std::fs::read(path).map(Some)
}

/// CLI flags over config values.
fn build_request(encode: &EncodeArgs, tool_config: &config::ToolConfig) -> ResizeRequest {
    let quality = encode
        .quality
        .map(Quality::new)
        .unwrap_or_else(|| tool_config.quality());
    ResizeRequest::new(encode.size.width, encode.size.height, quality)
}
