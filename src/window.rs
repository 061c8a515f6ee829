//! Native window presenting a gauge scene.

use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use pixels::{Pixels, SurfaceTexture};
use tracing::{info, warn};
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use crate::command::GaugeCommand;
use crate::config::WindowConfig;
use crate::gauge::Gauge;
use crate::render::Canvas;
use crate::scene::Scene;

/// Run the event loop until the window is closed.
///
/// Every redraw drains `receiver`, advances the needles and re-renders
/// `scene`, which must be the document `gauge` was built from.
pub fn run(
    mut gauge: Gauge,
    scene: Scene,
    receiver: Option<Receiver<GaugeCommand>>,
    config: &WindowConfig,
) -> anyhow::Result<()> {
    let event_loop = EventLoop::new().context("creating event loop")?;
    let window = WindowBuilder::new()
        .with_title(&config.title)
        .with_inner_size(LogicalSize::new(
            config.width as f64,
            config.height as f64,
        ))
        .with_resizable(false)
        .build(&event_loop)
        .context("creating window")?;
    let window = Arc::new(window);

    let size = window.inner_size();
    let mut fb_width = size.width as usize;
    let mut fb_height = size.height as usize;
    let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
    let mut pixels =
        Pixels::new(size.width, size.height, surface_texture).context("creating pixel surface")?;

    let frame_duration = Duration::from_secs_f64(1.0 / config.max_framerate.max(1.0));
    let mut last_frame = Instant::now();
    let window_clone = window.clone();
    info!(width = fb_width, height = fb_height, "window open");

    event_loop.run(move |event, window_target| {
        window_target.set_control_flow(ControlFlow::Poll);
        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    fb_width = new_size.width as usize;
                    fb_height = new_size.height as usize;
                    if let Err(err) = pixels.resize_buffer(new_size.width, new_size.height) {
                        warn!(%err, "buffer resize failed");
                    }
                    if let Err(err) = pixels.resize_surface(new_size.width, new_size.height) {
                        warn!(%err, "surface resize failed");
                    }
                }
                WindowEvent::RedrawRequested => {
                    if let Some(receiver) = &receiver {
                        gauge.update_with_commands(receiver);
                    }
                    gauge.tick(Instant::now());

                    let mut canvas = Canvas::new(pixels.frame_mut(), fb_width, fb_height);
                    scene.render(&mut canvas);
                    if let Err(err) = pixels.render() {
                        warn!(%err, "render failed");
                        window_target.exit();
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                if last_frame.elapsed() >= frame_duration {
                    window_clone.request_redraw();
                    last_frame = Instant::now();
                }
            }
            _ => {}
        }
    })?;

    Ok(())
}
