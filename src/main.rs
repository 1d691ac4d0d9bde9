use std::error::Error;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info, warn};

use unolcd::{
    BacklightColor, ConfigError, ErrorChain, Registry, RunConfig, SerialConnector, StopHandle, Supervisor,
    DEFAULT_CHANGE_INTERVAL, DEFAULT_UPDATE_INTERVAL,
};

/// Show status information on an Uno LCD Terminal.
#[derive(Debug, Parser)]
#[command(name = "unolcd", version, about)]
struct Args {
    /// List the available outputs
    #[arg(short = 'l', long)]
    list_outputs: bool,

    /// Connect to the terminal and start displaying outputs
    #[arg(short, long)]
    connect: bool,

    /// Serial port the terminal is attached to (e.g. /dev/ttyACM0 or COM3)
    #[arg(short, long, value_name = "PATH")]
    port: Option<String>,

    /// Seconds between display updates
    #[arg(short, long, value_name = "SECS", default_value_t = DEFAULT_UPDATE_INTERVAL)]
    update_interval: f64,

    /// Seconds before switching to the next output
    #[arg(short = 'r', long, value_name = "SECS", default_value_t = DEFAULT_CHANGE_INTERVAL)]
    change_interval: u64,

    /// Output to display; repeat to rotate between several
    #[arg(short, long = "output", value_name = "NAME")]
    outputs: Vec<String>,

    /// Keep reconnecting if the terminal goes away
    #[arg(short, long)]
    auto_reconnect: bool,

    /// Backlight color (off, red, yellow, green, teal, blue, violet, white)
    #[arg(short, long, value_name = "COLOR", default_value_t = BacklightColor::White)]
    backlight: BacklightColor,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    run(args).unwrap_or_else(|e| {
        error!("{}", ErrorChain(&*e));
        ExitCode::FAILURE
    })
}

/// Carries out the requested actions. A failed session has already been logged by the
/// supervisor, so it comes back as `Ok(ExitCode::FAILURE)` rather than as an error.
fn run(args: Args) -> Result<ExitCode, Box<dyn Error>> {
    let registry = Registry::builtin();

    if args.list_outputs {
        for (name, description) in registry.iter() {
            println!("{:<12}{}", name, description);
        }
    }

    if args.connect {
        let port = args.port.ok_or(ConfigError::MissingPort)?;
        let providers = registry.create_all(&args.outputs)?;
        let config = RunConfig::new(providers, args.update_interval, args.change_interval)?
            .with_auto_reconnect(args.auto_reconnect)
            .with_backlight(args.backlight);

        let stop = StopHandle::new();
        let handler_stop = stop.clone();
        ctrlc::set_handler(move || {
            info!("Interrupted, stopping after the current update");
            handler_stop.stop();
        })?;

        let mut supervisor = Supervisor::new(SerialConnector::new(port), config).on_status(|status| info!("{}", status));
        if supervisor.run(&stop).is_err() {
            return Ok(ExitCode::FAILURE);
        }
    }

    if !args.list_outputs && !args.connect {
        warn!("Nothing to do! Use --connect or --list-outputs.");
    }

    Ok(ExitCode::SUCCESS)
}
