use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use argh::FromArgs;
use chord_upload::interactive::Menu;
use chord_upload::library::{load_library, presets};
use chord_upload::transport::Uploader;
use chord_upload::transport::ble::BleCentral;
use chord_upload::{ChordLibrary, Config, Error};
use tracing_subscriber::EnvFilter;

/// Upload chord practice lists to a Guitar Trainer over Bluetooth LE.
/// Without a file, offers built-in lists and a custom list builder.
#[derive(FromArgs)]
struct Args {
    /// only validate the file and print its lists
    #[argh(switch)]
    check: bool,

    /// YAML file with device and timeout settings
    #[argh(option)]
    config: Option<PathBuf>,

    /// advertised name of the device
    #[argh(option)]
    device: Option<String>,

    /// seconds to scan for the device
    #[argh(option)]
    scan_timeout: Option<u64>,

    /// log debug output
    #[argh(switch, short = 'v')]
    verbose: bool,

    /// chord list file (JSON)
    #[argh(positional)]
    input: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args: Args = argh::from_env();
    init_tracing(args.verbose);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

async fn run(args: Args) -> Result<(), Error> {
    let config = load_config(&args)?;

    let library = match &args.input {
        Some(path) => {
            let library = load_library(path)?;
            print_summary(path, &library);
            library
        }
        None => {
            println!("Make sure your Guitar Trainer is powered on and in menu mode.");
            let presets = presets::builtin_lists();
            let stdin = io::stdin();
            match Menu::new(stdin.lock(), io::stdout(), &presets).run()? {
                Some(library) => library,
                None => return Ok(()),
            }
        }
    };

    if args.check {
        return Ok(());
    }

    let mut central = BleCentral::new(&config)
        .await
        .map_err(chord_upload::error::DiscoveryError::Link)?;
    Uploader::new(&config)?
        .upload(&mut central, &library)
        .await?;

    println!("Uploaded {} chord lists", library.len());
    Ok(())
}

fn load_config(args: &Args) -> Result<Config, Error> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(device) = &args.device {
        config.device_name = device.clone();
    }
    if let Some(secs) = args.scan_timeout {
        config.scan_timeout_secs = secs;
    }
    config.validate()?;
    Ok(config)
}

fn print_summary(path: &Path, library: &ChordLibrary) {
    println!("Loaded {} chord lists from {}", library.len(), path.display());
    for list in library {
        println!("  - {list}");
    }
}
