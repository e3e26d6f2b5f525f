use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use roomscene_kernel::{FixedFrames, Paced, SceneConfig, compose};
use roomscene_render::HeadlessHost;
use roomscene_tools::SceneInspector;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "roomscene-cli", about = "CLI tool for room scene operations")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Compose the scene on a headless page and render frames as text
    ///
    /// The model loads in the background. Without `--wait`, frames start at
    /// once and the model shows up from whichever frame follows its load, so
    /// a short run may finish before it appears.
    Render {
        /// Scene description (YAML); defaults apply when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Model file to load, overriding the scene description
        #[arg(short, long)]
        model: Option<PathBuf>,
        /// Number of frames to render
        #[arg(short, long, default_value = "60")]
        frames: u64,
        /// Pace frames at this refresh rate instead of back to back
        #[arg(long)]
        fps: Option<u32>,
        /// Page size as WIDTHxHEIGHT
        #[arg(long, default_value = "1280x800", value_parser = parse_size)]
        size: (u32, u32),
        /// Height of the page header strip
        #[arg(long, default_value = "60")]
        header: u32,
        /// Print every frame instead of only the last
        #[arg(long)]
        all: bool,
        /// Wait up to this many seconds for the model before the first frame
        #[arg(long, value_name = "SECS")]
        wait: Option<u64>,
    },
    /// Parse a model file and list its node tree
    Inspect {
        /// Model file (JSON object format)
        path: PathBuf,
    },
    /// Print the effective scene description as YAML
    Config {
        /// Scene description to read; defaults apply when omitted
        path: Option<PathBuf>,
    },
}

fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once('x')
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {s:?}"))?;
    let w = w.trim().parse().map_err(|e| format!("bad width: {e}"))?;
    let h = h.trim().parse().map_err(|e| format!("bad height: {e}"))?;
    Ok((w, h))
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<SceneConfig> {
    match path {
        Some(path) => SceneConfig::load(path)
            .with_context(|| format!("reading scene description {}", path.display())),
        None => Ok(SceneConfig::default()),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    match cli.command {
        Commands::Info => {
            println!("roomscene-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("kernel: {}", roomscene_kernel::crate_info());
            println!("scene: {}", roomscene_scene::crate_info());
            println!("render: {}", roomscene_render::crate_info());
            println!("assets: {}", roomscene_assets::crate_info());
            println!("tools: {}", roomscene_tools::crate_info());
        }
        Commands::Render {
            config,
            model,
            frames,
            fps,
            size: (width, height),
            header,
            all,
            wait,
        } => {
            let mut config = load_config(config.as_ref())?;
            if model.is_some() {
                config.model = model;
            }

            let host = HeadlessHost::page(width, height, header);
            let log = host.frame_log();
            let mut world = compose(Box::new(host), &config).context("composing scene")?;

            if let Some(secs) = wait {
                let report = world.wait_for_loads(Duration::from_secs(secs));
                tracing::info!(
                    inserted = report.inserted,
                    failed = report.failed,
                    "model loads resolved before the first frame"
                );
            }

            let drawn = match fps {
                Some(rate) => world.render(&mut Paced::hz(rate).with_limit(frames))?,
                None => world.render(&mut FixedFrames::new(frames))?,
            };

            if all {
                for frame in log.frames() {
                    print!("{}", frame.text);
                }
            } else if let Some(frame) = log.last() {
                print!("{}", frame.text);
            }
            println!("{}", SceneInspector::summary(&world));
            println!("Rendered {drawn} frame(s)");

            if world.pending_loads() > 0 {
                tracing::warn!(
                    pending = world.pending_loads(),
                    "model still loading after the last frame; cancelling"
                );
                world.cancel_loads();
            }
        }
        Commands::Inspect { path } => {
            let bytes =
                std::fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
            let node = roomscene_assets::parse_model(&bytes)
                .with_context(|| format!("parsing {}", path.display()))?;
            for info in SceneInspector::subtree(&node) {
                println!("{info}");
            }
            println!("{} node(s)", node.subtree_len());
        }
        Commands::Config { path } => {
            let config = load_config(path.as_ref())?;
            print!("{}", config.to_yaml()?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_parsing() {
        assert_eq!(parse_size("1280x800"), Ok((1280, 800)));
        assert!(parse_size("1280").is_err());
        assert!(parse_size("wide x 800").is_err());
    }

    #[test]
    fn cli_parses_render_flags() {
        let cli = Cli::try_parse_from([
            "roomscene-cli",
            "render",
            "--frames",
            "3",
            "--size",
            "800x600",
            "--model",
            "chair.json",
            "--wait",
            "5",
        ])
        .unwrap();
        match cli.command {
            Commands::Render {
                frames,
                size,
                model,
                wait,
                ..
            } => {
                assert_eq!(frames, 3);
                assert_eq!(size, (800, 600));
                assert_eq!(model, Some(PathBuf::from("chair.json")));
                assert_eq!(wait, Some(5));
            }
            _ => panic!("expected render"),
        }
    }

    #[test]
    fn render_waits_only_when_asked() {
        let cli = Cli::try_parse_from(["roomscene-cli", "render"]).unwrap();
        match cli.command {
            Commands::Render { wait, .. } => assert_eq!(wait, None),
            _ => panic!("expected render"),
        }
    }
}
