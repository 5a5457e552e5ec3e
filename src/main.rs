use hotline::application::CallController;
use hotline::config::{AgentMode, Config};
use hotline::domain::agent::ResponseService;
use hotline::domain::speech::{SpeechSynthesizer, Transcriber};
use hotline::infrastructure::agent::{
    assistant_instructions, CannedResponder, RealtimeConfig, RealtimeResponder,
};
use hotline::infrastructure::speech::{PacedSynthesizer, ScriptedTranscriber};
use hotline::interface::console;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, Level};

/// Gap between the caller finishing listening setup and speaking
const CALLER_CADENCE: Duration = Duration::from_millis(1_200);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("Starting Hotline voice agent");

    // Load configuration
    let config = Config::load()?;
    info!(mode = ?config.agent.mode, "Configuration loaded");

    let responder: Arc<dyn ResponseService> = match config.agent.mode {
        AgentMode::Canned => Arc::new(CannedResponder::new()),
        AgentMode::Realtime => {
            let api_key = config
                .agent
                .api_key
                .clone()
                .ok_or_else(|| anyhow::anyhow!("realtime agent mode requires an API key"))?;
            Arc::new(RealtimeResponder::new(RealtimeConfig::new(
                api_key,
                config.agent.model.clone(),
                assistant_instructions(),
            )))
        }
    };

    let transcriber: Arc<dyn Transcriber> = Arc::new(ScriptedTranscriber::new(
        config.demo.utterances.clone(),
        CALLER_CADENCE,
    ));
    let synthesizer: Arc<dyn SpeechSynthesizer> = Arc::new(PacedSynthesizer::default());

    let controller = CallController::new(
        config.timings.clone(),
        transcriber,
        synthesizer,
        responder,
    );
    let printer = console::spawn_printer(controller.subscribe());

    // Run one scripted call end to end
    controller.start_call().await?;
    tokio::time::sleep(demo_runtime(&config)).await;
    controller.end_call().await?;
    tokio::time::sleep(Duration::from_millis(config.timings.ended_delay_ms + 200)).await;

    info!(
        status = %console::state_label(controller.state(), controller.duration_seconds()),
        "Demo call complete"
    );
    printer.abort();

    Ok(())
}

/// Rough wall-clock budget for one scripted call: ring, greet, then one
/// listen/think/reply cycle per scripted utterance.
fn demo_runtime(config: &Config) -> Duration {
    let timings = &config.timings;
    let per_utterance = CALLER_CADENCE.as_millis() as u64
        + timings.thinking_max_ms
        + timings.resume_delay_ms
        + 4_000; // reply playback allowance
    let total = timings.answer_delay_ms
        + timings.greeting_delay_ms
        + timings.listen_delay_ms
        + config.demo.utterances.len() as u64 * per_utterance
        + 1_000;
    Duration::from_millis(total)
}
