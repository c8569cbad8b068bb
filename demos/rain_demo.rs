//! Rain Demo: Drives the full engine inside a live terminal.
//!
//! Piped stdin becomes rain: `tail -f app.log | cargo run --example
//! rain_demo`. Without a pipe, a built-in transcript feeds the grid. The
//! pointer bends nearby glyphs while mouse capture is active.
//!
//! Keys: `q`/`Esc` quit, `Tab` next preset, `t` theme, `m` mode,
//! `c` charset, `d` direction, `g` glow, `b` ambient rain,
//! `Up`/`Down` fall speed.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use crossbeam_channel::bounded;
use glyphrain::{
    CharsetId, DisplayMode, EngineHandle, FallDirection, FrameTicker, InputActor, InputEvent,
    KeyCode, PointerPos, Preset, RainEngine, Settings, TermSurface, Theme,
};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[cfg(feature = "audio")]
use glyphrain::audio::LoudnessMeter;

/// Transcript used when nothing is piped in.
const SAMPLE_TEXT: &str = "wake up the grid is listening every word you feed it \
    falls through the columns and fades into the dark pipe a log through stdin \
    and watch your own traffic turn to weather speak and the rain leans with \
    the sound of your voice move the pointer and the drops bend around it \
    nothing here is random noise it is all signal on its way down";

/// Interval between words of the built-in transcript.
const FEED_INTERVAL: Duration = Duration::from_millis(1100);

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Start from a named preset (see --list-presets).
    #[arg(short, long)]
    preset: Option<String>,

    /// Override the color theme.
    #[arg(short, long)]
    theme: Option<String>,

    /// Override the display mode (letters, words, sentences).
    #[arg(short, long)]
    mode: Option<DisplayMode>,

    /// Override the glyph charset.
    #[arg(short, long)]
    charset: Option<CharsetId>,

    /// Engine frame rate.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Seed the randomizer for a reproducible run.
    #[arg(long)]
    seed: Option<u64>,

    /// Load settings overrides from a JSON file (camelCase keys).
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// List available presets and exit.
    #[arg(long)]
    list_presets: bool,

    /// List available themes and exit.
    #[arg(long)]
    list_themes: bool,

    /// Drive loudness with a synthesized pulse.
    #[arg(long)]
    pulse: bool,

    /// Capture microphone loudness.
    #[cfg(feature = "audio")]
    #[arg(long)]
    audio: bool,

    /// Capture from a specific input device.
    #[cfg(feature = "audio")]
    #[arg(long, value_name = "NAME")]
    audio_device: Option<String>,

    /// List audio input devices and exit.
    #[cfg(feature = "audio")]
    #[arg(long)]
    list_audio_devices: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    if cli.list_presets {
        for preset in Preset::ALL {
            println!("{:<12} {}", preset.name, preset.blurb);
        }
        return Ok(());
    }

    if cli.list_themes {
        for theme in Theme::ALL {
            println!(
                "{:<8} {} / {} / {}",
                theme.name, theme.head, theme.tail, theme.background
            );
        }
        return Ok(());
    }

    #[cfg(feature = "audio")]
    if cli.list_audio_devices {
        for name in glyphrain::audio::list_input_devices().map_err(|e| anyhow!("{e}"))? {
            println!("{name}");
        }
        return Ok(());
    }

    let mut settings = base_settings(&cli)?;
    let stdin_feed = !std::io::stdin().is_terminal();

    #[cfg(feature = "audio")]
    let meter = if cli.audio {
        Some(LoudnessMeter::start(cli.audio_device.as_deref()).map_err(|e| anyhow!("{e}"))?)
    } else {
        None
    };

    let surface = TermSurface::new().context("terminal setup failed")?;
    let (cols, rows) = TermSurface::grid_size().context("querying terminal size")?;
    let cell = settings.cell_size;
    let width = f32::from(cols) * cell;
    let height = f32::from(rows) * cell;

    let frame_interval = Duration::from_secs(1) / cli.fps.max(1);
    let mut _ticker_guard = None;
    let handle = if let Some(seed) = cli.seed {
        let ticker = FrameTicker::spawn(frame_interval);
        let handle = EngineHandle::with_scheduler(
            RainEngine::with_seed(settings, seed),
            ticker.receiver().clone(),
        );
        _ticker_guard = Some(ticker);
        handle
    } else {
        EngineHandle::launch(settings, frame_interval)
    };
    handle.bind(Box::new(surface), width, height);

    let (input_tx, input_rx) = bounded(64);
    let input = InputActor::spawn(input_tx, Duration::from_millis(10));

    // Piped transcript lines arrive on their own thread as they come in.
    let (line_tx, line_rx) = bounded::<String>(64);
    if stdin_feed {
        std::thread::spawn(move || {
            use std::io::BufRead;
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                match line {
                    Ok(line) => {
                        if line_tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(_) => break,
                }
            }
        });
    }

    let sample_words: Vec<&str> = SAMPLE_TEXT.split_whitespace().collect();
    let mut feed_cursor = 0usize;
    let mut next_feed = Instant::now() + FEED_INTERVAL;
    let mut preset_idx = 0usize;
    let mut theme_idx = 0usize;
    let start = Instant::now();

    'main: loop {
        while let Ok(event) = input_rx.try_recv() {
            match event {
                InputEvent::Key { code, modifiers } => match code {
                    KeyCode::Char('q') | KeyCode::Esc => break 'main,
                    KeyCode::Char('c') if modifiers.control => break 'main,
                    KeyCode::Tab => {
                        preset_idx = (preset_idx + 1) % Preset::ALL.len();
                        settings = Preset::ALL[preset_idx].settings();
                        handle.configure(settings);
                    }
                    KeyCode::Char('t') => {
                        theme_idx = (theme_idx + 1) % Theme::ALL.len();
                        settings.apply_theme(&Theme::ALL[theme_idx]);
                        handle.configure(settings);
                    }
                    KeyCode::Char('m') => {
                        settings.mode = next_mode(settings.mode);
                        handle.configure(settings);
                    }
                    KeyCode::Char('c') => {
                        settings.charset = next_charset(settings.charset);
                        handle.configure(settings);
                    }
                    KeyCode::Char('d') => {
                        settings.fall_direction = match settings.fall_direction {
                            FallDirection::Down => FallDirection::Up,
                            FallDirection::Up => FallDirection::Down,
                        };
                        handle.configure(settings);
                    }
                    KeyCode::Char('g') => {
                        settings.glow_effect = !settings.glow_effect;
                        handle.configure(settings);
                    }
                    KeyCode::Char('b') => {
                        settings.background_rain = !settings.background_rain;
                        handle.configure(settings);
                    }
                    KeyCode::Up => {
                        settings.fall_speed = (settings.fall_speed + 1.0).min(10.0);
                        handle.configure(settings);
                    }
                    KeyCode::Down => {
                        settings.fall_speed = (settings.fall_speed - 1.0).max(1.0);
                        handle.configure(settings);
                    }
                    _ => {}
                },
                InputEvent::PointerMove { column, row } => {
                    handle.pointer(Some(PointerPos::new(
                        (f32::from(column) + 0.5) * cell,
                        (f32::from(row) + 0.5) * cell,
                    )));
                }
                InputEvent::Resize { width, height } => {
                    handle.resize(f32::from(width) * cell, f32::from(height) * cell);
                }
                InputEvent::Paste(text) => handle.text(text),
                InputEvent::Error(err) => log::warn!("input error: {err}"),
                InputEvent::Shutdown => break 'main,
            }
        }

        while let Ok(line) = line_rx.try_recv() {
            handle.text(line);
        }

        if !stdin_feed && Instant::now() >= next_feed {
            handle.text(sample_words[feed_cursor]);
            feed_cursor = (feed_cursor + 1) % sample_words.len();
            next_feed = Instant::now() + FEED_INTERVAL;
        }

        #[cfg(feature = "audio")]
        if let Some(meter) = &meter {
            handle.loudness(meter.level());
        }
        if cli.pulse {
            let t = start.elapsed().as_secs_f32();
            handle.loudness((t * 0.8).sin().mul_add(0.5, 0.5) * 0.9);
        }

        std::thread::sleep(Duration::from_millis(15));
    }

    handle.shutdown();
    input.join();
    Ok(())
}

/// Preset, then config file, then single-field CLI overrides.
fn base_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = match &cli.preset {
        Some(name) => Preset::by_name(name)
            .ok_or_else(|| anyhow!("unknown preset '{name}'; try --list-presets"))?
            .settings(),
        None => Settings::default(),
    };

    if let Some(path) = &cli.config {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        settings = merge_overrides(settings, &text)
            .with_context(|| format!("parsing {}", path.display()))?;
    }

    if let Some(name) = &cli.theme {
        let theme =
            Theme::by_name(name).ok_or_else(|| anyhow!("unknown theme '{name}'"))?;
        settings.apply_theme(theme);
    }
    if let Some(mode) = cli.mode {
        settings.mode = mode;
    }
    if let Some(charset) = cli.charset {
        settings.charset = charset;
    }
    Ok(settings)
}

/// Apply a partial JSON object on top of `base`, field by field.
fn merge_overrides(base: Settings, json: &str) -> Result<Settings> {
    let mut value = serde_json::to_value(base)?;
    let patch: serde_json::Value = serde_json::from_str(json)?;
    let (Some(target), serde_json::Value::Object(fields)) = (value.as_object_mut(), patch)
    else {
        return Err(anyhow!("overrides must be a JSON object"));
    };
    for (key, field) in fields {
        target.insert(key, field);
    }
    Ok(serde_json::from_value(value)?)
}

const fn next_mode(mode: DisplayMode) -> DisplayMode {
    match mode {
        DisplayMode::Letters => DisplayMode::Words,
        DisplayMode::Words => DisplayMode::Sentences,
        DisplayMode::Sentences => DisplayMode::Letters,
    }
}

fn next_charset(charset: CharsetId) -> CharsetId {
    let idx = CharsetId::ALL
        .iter()
        .position(|c| *c == charset)
        .unwrap_or(0);
    CharsetId::ALL[(idx + 1) % CharsetId::ALL.len()]
}
