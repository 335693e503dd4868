use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use log::info;
#[cfg(not(feature = "window"))]
use qr_tool::camera::HeadlessDisplay;
use qr_tool::camera::{self, CameraSession, CancelFlag, DisplaySurface, FrameSequence, SessionEnd};
use qr_tool::config::debug_from_env;
use qr_tool::generate::{self, EncodeParams};
use qr_tool::tools::{expand_inputs, scan_paths};
use qr_tool::{Detector, ScanConfig};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::Ordering;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "qrtool", version, about = "Generate and scan QR codes")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Encode text into a QR code PNG
    Generate {
        /// Text or URL to encode
        #[arg(long)]
        data: String,
        /// Output file name (".png" is appended when missing)
        #[arg(long, default_value = "qr.png")]
        output: String,
        /// Directory the file is written to
        #[arg(long, default_value = "data/output")]
        out_dir: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Decode QR codes from image files or directories
    Scan {
        /// Image files or directories to walk
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Linear scale of the fallback tier
        #[arg(long, env = "QR_UPSCALE_FACTOR")]
        upscale: Option<f32>,
    },
    /// Scan a live camera until a code is found or Ctrl-C
    Camera {
        /// Capture device index
        #[arg(long, env = "QR_CAMERA_INDEX")]
        index: Option<u32>,
        /// Play image files from this directory instead of a device
        #[arg(long)]
        frames: Option<PathBuf>,
        /// Delay between played-back frames
        #[arg(long, default_value_t = 33)]
        interval_ms: u64,
    },
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let outcome = match cli.command {
        Command::Generate {
            data,
            output,
            out_dir,
            force,
        } => generate_cmd(&data, &output, out_dir, force),
        Command::Scan { paths, upscale } => scan_cmd(&paths, upscale),
        Command::Camera {
            index,
            frames,
            interval_ms,
        } => camera_cmd(index, frames, Duration::from_millis(interval_ms)),
    };

    match outcome {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn init_logging() {
    let default_filter = if debug_from_env() { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .init();
}

fn generate_cmd(data: &str, output: &str, out_dir: PathBuf, force: bool) -> Result<ExitCode> {
    let data = data.trim();
    if data.is_empty() {
        bail!("nothing to encode: --data is empty");
    }

    fs::create_dir_all(&out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;
    let path = generate::output_path(&out_dir, output);
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }

    generate::encode(data, &path, EncodeParams::for_payload(data))
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("QR code saved to {}", path.display());
    Ok(ExitCode::SUCCESS)
}

fn scan_cmd(inputs: &[PathBuf], upscale: Option<f32>) -> Result<ExitCode> {
    let mut config = ScanConfig::from_env();
    if let Some(factor) = upscale.filter(|f| f.is_finite() && *f > 0.0) {
        config.upscale_factor = factor;
    }
    let detector = Detector::from_config(&config);

    let paths = expand_inputs(inputs);
    if paths.is_empty() {
        bail!("no images found");
    }

    let reports = scan_paths(&detector, &paths);
    let mut any_found = false;
    let mut any_error = false;
    let show_path = reports.len() > 1;

    for report in &reports {
        let line = match &report.result {
            Ok(result) => match &result.payload {
                Some(text) => {
                    any_found = true;
                    text.clone()
                }
                None => "No QR found.".to_string(),
            },
            Err(err) => {
                any_error = true;
                format!("error: {}", err)
            }
        };
        if show_path {
            println!("{}: {}", report.path.display(), line);
        } else {
            println!("{}", line);
        }
    }

    Ok(if any_error {
        ExitCode::FAILURE
    } else if any_found {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    })
}

fn camera_cmd(
    index: Option<u32>,
    frames: Option<PathBuf>,
    interval: Duration,
) -> Result<ExitCode> {
    let mut config = ScanConfig::from_env();
    if let Some(index) = index {
        config.camera_index = index;
    }

    let cancel = CancelFlag::default();
    let handler_flag = cancel.clone();
    ctrlc::set_handler(move || {
        handler_flag.store(true, Ordering::SeqCst);
    })
    .context("failed to install Ctrl-C handler")?;

    #[cfg(feature = "window")]
    let display = camera::WindowDisplay::new(cancel);
    #[cfg(not(feature = "window"))]
    let display = HeadlessDisplay::new(cancel);

    let handle = match frames {
        Some(dir) => {
            let backend = FrameSequence::from_dir(&dir).with_interval(interval);
            info!("replaying {} frame(s) from {}", backend.len(), dir.display());
            camera::spawn(CameraSession::new(backend, display, config))?
        }
        None => open_device_session(display, config)?,
    };

    let outcome = handle.wait()?;
    match outcome.end {
        SessionEnd::Detected(text) => {
            println!("{}", text);
            Ok(ExitCode::SUCCESS)
        }
        SessionEnd::Cancelled | SessionEnd::StreamEnded => {
            println!("No QR found.");
            Ok(ExitCode::from(2))
        }
        SessionEnd::DeviceUnavailable(err) => Err(err).context("camera session failed"),
    }
}

#[cfg(feature = "v4l2")]
fn open_device_session<S>(display: S, config: ScanConfig) -> Result<camera::SessionHandle>
where
    S: DisplaySurface + Send + 'static,
{
    let backend = camera::v4l2::V4l2Backend::default();
    Ok(camera::spawn(CameraSession::new(backend, display, config))?)
}

#[cfg(not(feature = "v4l2"))]
fn open_device_session<S>(_display: S, config: ScanConfig) -> Result<camera::SessionHandle>
where
    S: DisplaySurface + Send + 'static,
{
    bail!(
        "camera {} needs the `v4l2` feature; use --frames DIR to replay images",
        config.camera_index
    )
}
