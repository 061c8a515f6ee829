use rand::Rng;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use twin_gauge::{window, Gauge, GaugeCommand, GaugeConfig, LayoutConfig, Scene, Side, WindowConfig};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();

    // Slower, linear needles so the random readings are easy to follow
    let config = GaugeConfig::builder()
        .left(
            twin_gauge::DialConfig::builder()
                .redzone((1000.0, 250.0))
                .marker(2000.0)
                .initial_value(1500.0)
                .move_duration(Duration::from_millis(1500))
                .move_easing(twin_gauge::Easing::Linear)
                .build(),
        )
        .build();

    let scene = Scene::twin_dial(400, 400, &config, &LayoutConfig::default());
    let mut gauge = Gauge::new(&config, &scene)?;
    gauge.init()?;

    let (sender, receiver) = mpsc::channel();

    thread::spawn(move || {
        let mut rng = rand::rng();
        loop {
            let commands = [
                GaugeCommand::SetBothValues(
                    rng.random_range(0.0..=4000.0),
                    rng.random_range(0.0..=400.0),
                ),
                GaugeCommand::SetMarker(Side::Right, rng.random_range(200.0..=400.0)),
                GaugeCommand::SetRedzone(
                    Side::Left,
                    rng.random_range(500.0..=1500.0),
                    rng.random_range(0.0..=1000.0),
                ),
            ];

            if commands.iter().any(|cmd| sender.send(cmd.clone()).is_err()) {
                break;
            }

            thread::sleep(Duration::from_millis(2000));
        }
    });

    println!("Displaying gauge with random telemetry:");
    println!("- Left dial: engine speed 0-4000, moving redzone");
    println!("- Right dial: road speed 0-400, moving marker");
    println!("Close the window to exit");

    window::run(gauge, scene, Some(receiver), &WindowConfig::default())
}
