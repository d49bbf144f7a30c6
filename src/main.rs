use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use lingua_gateway::api::{ApiServer, ApiState};
use lingua_gateway::llm::ChatClient;
use lingua_gateway::pipeline::TurnPipeline;
use lingua_gateway::session::{Recorder, SessionState};
use lingua_gateway::store::StoreClient;
use lingua_gateway::voice::{AudioPlayback, SpeechToText, TextToSpeech};
use lingua_gateway::Config;

/// Lingua - voice chat gateway for vision-grounded conversations
#[derive(Parser)]
#[command(name = "lingua", version, about)]
struct Cli {
    /// Port to listen on (overrides config)
    #[arg(long)]
    port: Option<u16>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable voice features (for headless servers without audio hardware)
    #[arg(long)]
    disable_voice: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Test microphone input
    TestMic {
        /// Duration in seconds
        #[arg(short, long, default_value = "5")]
        duration: u64,
    },
    /// Test speaker output
    TestSpeaker,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,lingua_gateway=info",
        1 => "info,lingua_gateway=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if let Some(cmd) = cli.command {
        return match cmd {
            Command::TestMic { duration } => test_mic(duration).await,
            Command::TestSpeaker => test_speaker(),
        };
    }

    let mut config = Config::load(cli.disable_voice)?;
    if let Some(port) = cli.port {
        config.port = port;
    }
    config.paths.ensure()?;

    tracing::info!(
        port = config.port,
        data_dir = %config.paths.root().display(),
        voice = config.voice.enabled,
        "starting lingua gateway"
    );

    let session = SessionState::new(config.paths.clone());
    let store = StoreClient::new(&config.store, config.llm.timeout)?;
    let llm = ChatClient::new(&config.llm)?;

    let (stt, tts) = if config.voice.enabled {
        let speech_key = config
            .voice
            .speech_key
            .clone()
            .ok_or_else(|| anyhow::anyhow!("speech key missing with voice enabled"))?;
        (
            Some(SpeechToText::new(
                config.llm.api_key.clone(),
                config.voice.stt_model.clone(),
                config.llm.timeout,
            )?),
            Some(TextToSpeech::new(
                speech_key,
                &config.voice.speech_region,
                config.llm.timeout,
            )?),
        )
    } else {
        (None, None)
    };

    let pipeline = TurnPipeline::new(session.clone(), store, llm.clone(), stt, tts);

    if config.voice.enabled {
        tracing::info!("lingua gateway ready");
    } else {
        tracing::info!("lingua gateway ready (text-only mode, voice disabled)");
    }

    let state = ApiState {
        session,
        pipeline,
        llm,
    };
    ApiServer::new(state, config.port).run().await?;

    Ok(())
}

/// Test microphone input by recording a short clip
async fn test_mic(duration: u64) -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let target = dir.path().join("mic-test.wav");

    println!("Recording for {duration} seconds...");
    println!("Speak into your microphone!\n");

    let recorder = Recorder::new(target.clone());
    recorder.start()?;
    tokio::time::sleep(Duration::from_secs(duration)).await;
    recorder.stop()?;

    let mut reader = hound::WavReader::open(&target)?;
    let samples: Vec<f32> = reader
        .samples::<i16>()
        .map(|s| s.map(|v| f32::from(v) / 32768.0))
        .collect::<Result<_, _>>()?;

    let energy = calculate_rms(&samples);
    let peak = samples.iter().map(|s| s.abs()).fold(0.0_f32, f32::max);

    println!("Captured {} samples", samples.len());
    println!("RMS: {energy:.4} | Peak: {peak:.4}");
    println!("\n---");
    println!("If RMS moved away from 0, your mic is working!");
    println!("If it stayed near 0, check:");
    println!("  1. Is your mic plugged in?");
    println!("  2. Run: pactl info | grep 'Default Source'");
    println!("  3. Run: arecord -l (to list devices)");

    Ok(())
}

/// Calculate RMS energy
#[allow(clippy::cast_precision_loss)]
fn calculate_rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_squares: f32 = samples.iter().map(|s| s * s).sum();
    (sum_squares / samples.len() as f32).sqrt()
}

/// Test speaker output with a sine wave
fn test_speaker() -> anyhow::Result<()> {
    println!("Testing speaker output...");
    println!("You should hear a 440Hz tone for 2 seconds\n");

    let playback = AudioPlayback::new()?;

    // 2 seconds of 440Hz sine at the 24kHz playback rate
    let sample_rate = 24_000_usize;
    let frequency = 440.0_f32;
    let num_samples = sample_rate * 2;

    #[allow(clippy::cast_precision_loss)]
    let samples: Vec<f32> = (0..num_samples)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            (2.0 * std::f32::consts::PI * frequency * t).sin() * 0.3 // 30% volume
        })
        .collect();

    playback.play(&samples)?;

    println!("\n---");
    println!("If you heard the tone, your speakers are working!");

    Ok(())
}
