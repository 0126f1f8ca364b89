//! Headless driver: loads a model, sweeps the page scroll down and back up,
//! and logs where every clip ends up.
//!
//! ```text
//! RUST_LOG=info scrollstage models/building.gltf --config stage.json --steps 8
//! ```

use anyhow::{Context, bail};
use scrollstage::{GltfLoader, MountOutcome, Stage, StageConfig};

const VIEWPORT_HEIGHT: f32 = 900.0;
const DEFAULT_STEPS: u32 = 8;

struct Args {
    model: Option<String>,
    config: Option<String>,
    steps: u32,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = Args {
        model: None,
        config: None,
        steps: DEFAULT_STEPS,
    };

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => args.config = Some(iter.next().context("--config needs a path")?),
            "--steps" => {
                let value = iter.next().context("--steps needs a number")?;
                args.steps = value
                    .parse()
                    .with_context(|| format!("invalid step count '{value}'"))?;
            }
            "-h" | "--help" => {
                println!("usage: scrollstage [model.gltf] [--config stage.json] [--steps N]");
                std::process::exit(0);
            }
            flag if flag.starts_with('-') => bail!("unknown option '{flag}'"),
            _ => args.model = Some(arg),
        }
    }

    if args.steps == 0 {
        bail!("--steps must be at least 1");
    }
    Ok(args)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args()?;
    let mut config = match &args.config {
        Some(path) => StageConfig::from_path(path).with_context(|| format!("reading {path}"))?,
        None => StageConfig::default(),
    };
    if let Some(model) = args.model {
        config.model.path = model;
    }

    let model_path = config.model.path.clone();
    let mut stage = Stage::new(config)?;
    stage.install_scroll_triggers(Some(VIEWPORT_HEIGHT));
    stage.mount_page()?;

    let asset = GltfLoader::load(&model_path, stage.scene_mut()).await;
    match stage.mount_model(asset, None) {
        MountOutcome::Animated => {}
        MountOutcome::Static => {
            log::info!("Nothing to animate, model shown statically");
            return Ok(());
        }
        MountOutcome::Placeholder => bail!("could not load {model_path}"),
        MountOutcome::Detached => bail!("scroll listener could not be attached"),
    }

    let scroll_range = stage
        .triggers()
        .zip(stage.region())
        .and_then(|(triggers, key)| triggers.region(key).map(|r| (r.height - VIEWPORT_HEIGHT).max(0.0)))
        .unwrap_or(0.0);

    let steps = args.steps;
    let sweep = (0..=steps).chain((0..steps).rev());
    for step in sweep {
        let scroll_y = scroll_range * step as f32 / steps as f32;
        stage.scroll_to(scroll_y);
        let frame = stage.tick();

        let times = stage.sync().lock().applied_times();
        let times = times
            .iter()
            .map(|t| format!("{t:.3}"))
            .collect::<Vec<_>>()
            .join(", ");
        log::info!(
            "scroll {scroll_y:>7.1}px  progress {:.3}  shared {:.3}s  clips [{times}]",
            frame.progress,
            frame.shared_time
        );
    }

    stage.unmount();
    Ok(())
}
