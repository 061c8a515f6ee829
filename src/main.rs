use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::mpsc::{self, Sender};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use rand::Rng;
use tracing::{info, warn};

use twin_gauge::{
    window, DialConfig, Gauge, GaugeCommand, GaugeConfig, LayoutConfig, Scene, Side, Strictness,
    WindowConfig,
};

/// Two-dial gauge driven by commands on stdin.
#[derive(Parser, Debug)]
#[command(name = "twin-gauge", version, about)]
struct Cli {
    /// Window title.
    #[arg(long, default_value = "Gauge")]
    title: String,

    #[arg(long, default_value = "400")]
    width: usize,

    #[arg(long, default_value = "400")]
    height: usize,

    /// Maximum frames per second.
    #[arg(long, default_value = "60")]
    fps: f64,

    /// TrueType/OpenType font used for tick labels.
    #[arg(long, env = "TWIN_GAUGE_FONT")]
    font: Option<PathBuf>,

    /// Full scale of the left dial.
    #[arg(long, default_value = "4000")]
    left_max: f64,

    /// Full scale of the right dial.
    #[arg(long, default_value = "400")]
    right_max: f64,

    /// Report out-of-range commands instead of ignoring them.
    #[arg(long)]
    strict: bool,

    /// Skip the startup sweep.
    #[arg(long)]
    no_ignite: bool,

    /// Draw numbered tick labels.
    #[arg(long)]
    numbered: bool,

    /// Feed random readings instead of reading stdin.
    #[arg(long)]
    demo: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();
    let defaults = GaugeConfig::default();
    let config = GaugeConfig::builder()
        .left(scaled(defaults.left, 4000.0, cli.left_max))
        .right(scaled(defaults.right, 400.0, cli.right_max))
        .numbered(cli.numbered)
        .ignite_on_init(!cli.no_ignite)
        .strictness(if cli.strict {
            Strictness::Strict
        } else {
            Strictness::Lenient
        })
        .build();

    let mut scene = Scene::twin_dial(cli.width, cli.height, &config, &LayoutConfig::default());
    if let Some(path) = &cli.font {
        let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        scene.load_font(bytes)?;
    }

    let mut gauge = Gauge::new(&config, &scene)?;
    gauge.init()?;

    let (sender, receiver) = mpsc::channel();
    if cli.demo {
        let (left_max, right_max) = (cli.left_max, cli.right_max);
        thread::spawn(move || random_feed(&sender, left_max, right_max));
    } else {
        thread::spawn(move || stdin_feed(&sender));
    }

    let window_config = WindowConfig {
        title: cli.title,
        width: cli.width,
        height: cli.height,
        max_framerate: cli.fps,
    };
    window::run(gauge, scene, Some(receiver), &window_config)
}

/// Keep the stock redzone, marker and reading at the same share of full scale.
fn scaled(config: DialConfig, stock_max: f64, max: f64) -> DialConfig {
    let k = max / stock_max;
    DialConfig {
        value_range: (0.0, max),
        initial_value: config.initial_value * k,
        redzone: (config.redzone.0 * k, config.redzone.1 * k),
        marker: config.marker * k,
        ..config
    }
}

fn stdin_feed(sender: &Sender<GaugeCommand>) {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }
        match line.parse::<GaugeCommand>() {
            Ok(command) => {
                if sender.send(command).is_err() {
                    break;
                }
            }
            Err(err) => warn!(%err, %line, "skipping input line"),
        }
    }
    info!("stdin closed");
}

fn random_feed(sender: &Sender<GaugeCommand>, left_max: f64, right_max: f64) {
    let mut rng = rand::rng();
    loop {
        let command = GaugeCommand::SetBothValues(
            rng.random_range(0.0..=left_max),
            rng.random_range(0.0..=right_max),
        );
        if sender.send(command).is_err() {
            break;
        }
        if rng.random_range(0.0..1.0) < 0.05 {
            let side = if rng.random_bool(0.5) { Side::Left } else { Side::Right };
            let max = if side == Side::Left { left_max } else { right_max };
            let marker = GaugeCommand::SetMarker(side, rng.random_range(0.0..=max));
            if sender.send(marker).is_err() {
                break;
            }
        }
        thread::sleep(Duration::from_millis(1200));
    }
}
