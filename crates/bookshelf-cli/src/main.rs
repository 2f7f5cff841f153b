//! Bookshelf CLI
//!
//! Validate, format and convert ISBNs, and replay recorded barcode frames
//! through a scan session backed by a simulated camera.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use bookshelf_isbn::{
    convert_isbn10_to_13, extract_isbns_with_positions, format_isbn, normalize_isbn,
    validate_isbn, IsbnKind,
};
use bookshelf_scanner::simulated::{
    parse_frame_script, RecordingObserver, ScriptStep, SimulatedCamera, SimulatedEngine,
    SimulatedSurface,
};
use bookshelf_scanner::{
    validate_manual_isbn, AccessError, CameraDevice, FrameVerdict, ScanResult, ScanSession,
    ScanSnapshot, ScannerConfig,
};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{debug, info};

/// ISBN tools for the bookshelf app
#[derive(Parser)]
#[command(name = "bookshelf", version, about = "ISBN tools for the bookshelf app")]
struct Cli {
    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Scanner configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check an ISBN-10 or ISBN-13 checksum
    Validate { isbn: String },

    /// Hyphenate an ISBN for display
    Format { isbn: String },

    /// Convert an ISBN-10 to its ISBN-13 form
    Convert { isbn: String },

    /// Find valid ISBNs in free text (reads stdin when no text is given)
    Extract { text: Option<String> },

    /// Validate input the way the manual entry form does
    Manual { input: String },

    /// Replay a frame script through a simulated scan session
    Scan {
        /// Frame script, one decoded payload per line
        frames: PathBuf,

        /// Camera label, repeatable (default: a single rear camera)
        #[arg(long = "camera")]
        cameras: Vec<String>,

        /// Make the camera permission prompt fail
        #[arg(long, value_enum)]
        deny: Option<Denial>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Denial {
    NotAllowed,
    NotFound,
}

#[derive(Serialize)]
struct IsbnReport {
    input: String,
    normalized: String,
    is_valid: bool,
    kind: Option<IsbnKind>,
    formatted: String,
    isbn13: Option<String>,
}

impl IsbnReport {
    fn new(input: &str) -> Self {
        let normalized = normalize_isbn(input);
        let validation = validate_isbn(input);
        let isbn13 = match validation.kind {
            Some(IsbnKind::Isbn10) if validation.is_valid => convert_isbn10_to_13(&normalized),
            Some(IsbnKind::Isbn13) if validation.is_valid => Some(normalized.clone()),
            _ => None,
        };
        Self {
            input: input.to_string(),
            formatted: format_isbn(input),
            normalized,
            is_valid: validation.is_valid,
            kind: validation.kind,
            isbn13,
        }
    }
}

#[derive(Serialize)]
struct ScanReport {
    result: Option<ScanResult>,
    errors: Vec<String>,
    frames: usize,
    session: ScanSnapshot,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let ok = run(Cli::parse())?;
    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Execute one command; `Ok(false)` maps to a failing exit status
fn run(cli: Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let ok = match cli.command {
        Commands::Validate { isbn } => {
            let report = IsbnReport::new(&isbn);
            if cli.json {
                print_json(&report)?;
            } else if report.is_valid {
                let kind = report.kind.map(|k| k.to_string()).unwrap_or_default();
                println!("valid {}: {}", kind, report.formatted);
            } else {
                println!("invalid: {}", isbn);
            }
            report.is_valid
        }

        Commands::Format { isbn } => {
            let formatted = format_isbn(&isbn);
            if cli.json {
                print_json(&serde_json::json!({ "input": isbn, "formatted": formatted }))?;
            } else {
                println!("{}", formatted);
            }
            true
        }

        Commands::Convert { isbn } => {
            let converted = convert_isbn10_to_13(&isbn);
            if cli.json {
                print_json(&serde_json::json!({ "input": isbn, "isbn13": converted }))?;
            } else {
                match &converted {
                    Some(isbn13) => println!("{}", format_isbn(isbn13)),
                    None => println!("not a valid ISBN-10: {}", isbn),
                }
            }
            converted.is_some()
        }

        Commands::Extract { text } => {
            let text = match text {
                Some(text) => text,
                None => std::io::read_to_string(std::io::stdin())?,
            };
            let found = extract_isbns_with_positions(&text);
            if cli.json {
                print_json(&found)?;
            } else {
                for isbn in &found {
                    println!("{}\t{}", isbn.value, isbn.kind);
                }
            }
            !found.is_empty()
        }

        Commands::Manual { input } => match validate_manual_isbn(&input) {
            Ok(result) => {
                if cli.json {
                    print_json(&result)?;
                } else {
                    println!("{}", result.formatted());
                }
                true
            }
            Err(err) => {
                if cli.json {
                    print_json(&serde_json::json!({ "error": err.to_string() }))?;
                } else {
                    eprintln!("{}", err);
                }
                false
            }
        },

        Commands::Scan {
            frames,
            cameras,
            deny,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let report = replay(config, &frames, cameras, deny)?;
            let accepted = report.result.is_some();
            if cli.json {
                print_json(&report)?;
            } else {
                print_scan_report(&report);
            }
            accepted
        }
    };

    Ok(ok)
}

fn load_config(path: Option<&Path>) -> Result<ScannerConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            debug!("Loading scanner config from {}", path.display());
            let text = std::fs::read_to_string(path)?;
            Ok(ScannerConfig::from_toml(&text)?)
        }
        None => Ok(ScannerConfig::default()),
    }
}

fn replay(
    config: ScannerConfig,
    frames: &Path,
    cameras: Vec<String>,
    deny: Option<Denial>,
) -> Result<ScanReport, Box<dyn std::error::Error>> {
    let script = std::fs::read_to_string(frames)?;
    let steps = parse_frame_script(&script);

    let labels = if cameras.is_empty() {
        vec!["Back Camera".to_string()]
    } else {
        cameras
    };
    let devices = labels
        .into_iter()
        .enumerate()
        .map(|(i, label)| CameraDevice::new(format!("camera-{}", i), label))
        .collect();

    let mut camera = SimulatedCamera::new(devices);
    camera.set_access_error(deny.map(|denial| match denial {
        Denial::NotAllowed => AccessError::NotAllowed,
        Denial::NotFound => AccessError::NotFound,
    }));

    let mut session = ScanSession::with_config(
        config,
        camera,
        SimulatedEngine::new(),
        RecordingObserver::default(),
    );
    session.set_video_sink(Some(SimulatedSurface {
        name: frames.display().to_string(),
    }));

    let mut frame_count = 0;
    let mut result = None;
    if session.start_scanning().is_ok() {
        for step in steps {
            match step {
                ScriptStep::SwitchCamera => {
                    if let Err(err) = session.switch_camera() {
                        debug!("Camera switch failed: {}", err);
                    }
                }
                ScriptStep::Frame(outcome) => {
                    frame_count += 1;
                    match session.handle_frame(outcome) {
                        FrameVerdict::Accepted(scanned) => {
                            result = Some(scanned);
                            break;
                        }
                        FrameVerdict::Aborted | FrameVerdict::Inactive => break,
                        FrameVerdict::Ignored | FrameVerdict::Fault => {}
                    }
                }
            }
        }
    }
    info!("Replayed {} frame(s)", frame_count);

    let snapshot = session.snapshot();
    session.stop_scanning();

    Ok(ScanReport {
        result,
        errors: session.observer().errors.clone(),
        frames: frame_count,
        session: snapshot,
    })
}

fn print_scan_report(report: &ScanReport) {
    for error in &report.errors {
        eprintln!("error: {}", error);
    }
    match &report.result {
        Some(result) => println!(
            "scanned {} after {} frame(s)",
            result.formatted(),
            report.frames
        ),
        None => println!(
            "no ISBN after {} frame(s): {}",
            report.frames,
            report.session.state.description()
        ),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
