//! Application entry point — Narration Studio form window.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (writing a default `settings.toml` on
//!    first run) and apply `OPENAI_API_KEY`.
//! 3. Create the [`tokio`] runtime.
//! 4. Build the rewrite and speech clients from config.
//! 5. Create channels (`command`, `event`).
//! 6. Spawn the pipeline orchestrator on the runtime.
//! 7. Run [`eframe::run_native`] — blocks the main thread until the window
//!    is closed.

use std::sync::Arc;

use anyhow::Context as _;
use eframe::egui;
use narration_studio::{
    app::NarrationApp,
    config::{AppConfig, AppPaths, PipelineConfig, API_KEY_ENV},
    llm::{ApiRewriter, Rewriter},
    pipeline::{PipelineEvent, PipelineOrchestrator, Workspace},
    tts::{ApiSynthesizer, SpeechSynthesizer},
};
use tokio::sync::mpsc;

// ---------------------------------------------------------------------------
// Fonts
// ---------------------------------------------------------------------------

/// System fonts with Japanese glyphs, tried in order.  egui's bundled fonts
/// have no CJK coverage.
const CJK_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/truetype/fonts-japanese-gothic.ttf",
    "/System/Library/Fonts/ヒラギノ角ゴシック W3.ttc",
    "/System/Library/Fonts/Hiragino Sans GB.ttc",
    "C:\\Windows\\Fonts\\meiryo.ttc",
    "C:\\Windows\\Fonts\\msgothic.ttc",
];

fn install_cjk_font(ctx: &egui::Context) {
    let Some((path, bytes)) = CJK_FONT_CANDIDATES
        .iter()
        .find_map(|p| std::fs::read(p).ok().map(|b| (*p, b)))
    else {
        log::warn!("no CJK font found; Japanese labels may not render");
        return;
    };

    let mut fonts = egui::FontDefinitions::default();
    fonts.font_data.insert(
        "cjk".to_owned(),
        Arc::new(egui::FontData::from_owned(bytes)),
    );
    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
        fonts.families.entry(family).or_default().push("cjk".to_owned());
    }
    ctx.set_fonts(fonts);
    log::info!("loaded CJK font from {path}");
}

// ---------------------------------------------------------------------------
// Native options builder
// ---------------------------------------------------------------------------

fn native_options() -> eframe::NativeOptions {
    let vp = egui::ViewportBuilder::default()
        .with_title("Narration Studio")
        .with_inner_size([640.0, 820.0])
        .with_min_inner_size([480.0, 400.0])
        .with_drag_and_drop(true);

    eframe::NativeOptions {
        viewport: vp,
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Narration Studio starting up");

    // 2. Configuration
    let mut config = AppConfig::load_or_init(&AppPaths::new()).unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });
    config.apply_env_overrides();
    if config.rewrite.api_key.is_none() {
        log::warn!("{API_KEY_ENV} is not set; remote calls will likely be rejected");
    }

    // 3. Tokio runtime — the orchestrator is one sequential task.
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    // 4. Remote clients
    let rewriter: Arc<dyn Rewriter> = Arc::new(ApiRewriter::from_config(&config.rewrite));
    let synthesizer: Arc<dyn SpeechSynthesizer> =
        Arc::new(ApiSynthesizer::from_config(&config.speech));

    // 5. Channel setup
    let (command_tx, command_rx) = mpsc::channel::<PipelineConfig>(4);
    let (event_tx, event_rx) = mpsc::channel::<PipelineEvent>(32);

    // 6. Orchestrator task
    let orchestrator = PipelineOrchestrator::new(
        Workspace::from_config(&config.workspace),
        rewriter,
        synthesizer,
    )
    .with_events(event_tx);
    rt.spawn(orchestrator.serve(command_rx));

    // 7. Build the egui app and run it (blocks until the window is closed)
    let app = NarrationApp::new(command_tx, event_rx, config);

    eframe::run_native(
        "Narration Studio",
        native_options(),
        Box::new(move |cc| {
            install_cjk_font(&cc.egui_ctx);
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow::anyhow!("window error: {e}"))
}
