use anyhow::Context;
use clap::{Parser, Subcommand};
use p1_rs::logging::{init_logger_with_default, log_info, log_warn};
use p1_rs::util::LogThrottle;
use p1_rs::{
    log_warn_throttled, DecodedTelegram, MeterDataPayload, P1Error, P1FileReader, P1SerialReader,
    SerialConfig, SubmissionContext, TelegramProcessor, TelegramReader,
};
use tokio::io::AsyncBufRead;

#[derive(Parser)]
#[command(name = "p1-cli")]
#[command(about = "CLI tool for reading DSMR telegrams from a smart meter P1 port")]
struct Cli {
    /// Print each telegram as a JSON line instead of logging it
    #[arg(long, global = true)]
    json: bool,

    /// Print the submission payload for this device key and meter id
    #[arg(long, global = true, num_args = 2, value_names = ["DEVICE_KEY", "METER_ID"])]
    payload: Option<Vec<String>>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read telegrams from a serial port
    Serial {
        port: String,
        #[arg(short, long, default_value = "115200")]
        baudrate: u32,
        /// Disable XON/XOFF flow control
        #[arg(long)]
        no_xon_xoff: bool,
    },
    /// Replay telegrams from a captured P1 log
    File { path: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger_with_default("info");

    let cli = Cli::parse();
    let context = match &cli.payload {
        Some(args) => {
            let meter_id = args[1]
                .parse::<i64>()
                .with_context(|| format!("invalid meter id {:?}", args[1]))?;
            Some(SubmissionContext::new(args[0].clone(), meter_id))
        }
        None => None,
    };

    match cli.command {
        Commands::Serial {
            port,
            baudrate,
            no_xon_xoff,
        } => {
            let config = SerialConfig {
                baudrate,
                xon_xoff: !no_xon_xoff,
                ..SerialConfig::default()
            };
            let reader = P1SerialReader::connect_with_config(&port, &config)
                .await
                .with_context(|| format!("opening {port}"))?;
            run(reader, cli.json, context.as_ref()).await?;
        }
        Commands::File { path } => {
            let reader = P1FileReader::open_file(&path)
                .await
                .with_context(|| format!("opening {path}"))?;
            run(reader, cli.json, context.as_ref()).await?;
        }
    }

    Ok(())
}

async fn run<R>(
    mut reader: TelegramReader<R>,
    json: bool,
    context: Option<&SubmissionContext>,
) -> Result<(), P1Error>
where
    R: AsyncBufRead + Unpin,
{
    let processor = TelegramProcessor::default();
    let mut throttle = LogThrottle::new(60_000, 5);

    loop {
        match reader.next_telegram(&processor).await {
            Ok(Some(telegram)) => emit(&telegram, json, context),
            Ok(None) => break,
            Err(e) if e.is_telegram_local() => {
                log_warn_throttled!(throttle, "Telegram rejected: {e}");
            }
            // Silence on the line (meter restart, reseated cable); keep waiting
            Err(P1Error::ReadTimeout(limit)) => {
                log_warn_throttled!(throttle, "No data from meter within {limit:?}");
            }
            Err(e) => return Err(e),
        }
    }

    let stats = reader.assembler().stats();
    log_info(&format!(
        "Done: {} telegrams, {} restarted, {} overflowed",
        stats.frames_emitted, stats.frames_restarted, stats.frames_overflowed
    ));
    Ok(())
}

fn emit(telegram: &DecodedTelegram, json: bool, context: Option<&SubmissionContext>) {
    if let Some(context) = context {
        match MeterDataPayload::from_telegram(telegram, context).and_then(|p| p.to_json()) {
            Ok(body) => println!("{body}"),
            Err(e) => log_warn(&format!("No payload for telegram: {e}")),
        }
        return;
    }

    if json {
        match serde_json::to_string(&telegram.readings) {
            Ok(line) => println!("{line}"),
            Err(e) => log_warn(&format!("Cannot serialize readings: {e}")),
        }
        return;
    }

    log_info(&format!(
        "Telegram from {}",
        telegram.identification.as_deref().unwrap_or("unknown meter")
    ));
    for reading in &telegram.readings {
        log_info(&format!("Reading: {reading}"));
    }
    for diagnostic in &telegram.diagnostics {
        log_warn(&format!("Skipped line: {diagnostic}"));
    }
}
