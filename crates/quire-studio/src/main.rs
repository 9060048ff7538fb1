//! Headless replay of the reference scene.
//!
//! Usage: `quire-studio [frames]` (default 180). Renders into an offscreen
//! texture with the wgpu backend, waits for the GPU after every frame and logs
//! per-second throughput plus the batch statistics of the last frame.

mod fps;
mod scene;

use anyhow::{Context, Result};
use quire_engine::device::{GpuInit, HeadlessGpu};
use quire_engine::logging::{init_logging, LoggingConfig};
use quire_engine::{AlphaMode, Canvas, FrameStats};

use fps::FpsCounter;

const WIDTH: u32 = 1920;
const HEIGHT: u32 = 1080;
const DEFAULT_FRAMES: u64 = 180;
/// Simulated frame rate driving the scene clock.
const SCENE_FPS: f32 = 60.0;

const BACKGROUND: wgpu::Color = wgpu::Color {
    r: 230.0 / 255.0,
    g: 230.0 / 255.0,
    b: 230.0 / 255.0,
    a: 1.0,
};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let frames = match std::env::args().nth(1) {
        Some(arg) => arg
            .parse::<u64>()
            .with_context(|| format!("invalid frame count {arg:?}"))?,
        None => DEFAULT_FRAMES,
    };

    let gpu = HeadlessGpu::new_blocking(GpuInit::default()).context("GPU init failed")?;
    let target = gpu.create_target(WIDTH, HEIGHT);

    let mut backend = gpu.backend();
    backend.set_target(target.texture().create_view(&wgpu::TextureViewDescriptor::default()));
    let mut canvas = Canvas::new(backend);

    let mut fps = FpsCounter::new();
    let mut last = FrameStats::default();
    for frame_index in 0..frames {
        target.clear(&gpu, BACKGROUND);

        let mut frame = canvas
            .begin_frame(WIDTH as f32, HEIGHT as f32, 1.0, AlphaMode::Straight)
            .context("begin_frame failed")?;
        scene::draw(&mut frame, frame_index, frame_index as f32 / SCENE_FPS);
        last = frame
            .end()
            .with_context(|| format!("frame {frame_index} failed"))?;
        // Count a frame only once the GPU has finished it.
        gpu.wait_idle()
            .with_context(|| format!("frame {frame_index} did not complete"))?;

        if let Some(rate) = fps.tick() {
            log::info!("{rate} fps");
        }
    }

    log::info!(
        "rendered {} frames; last frame: {} draw calls ({} fill, {} stroke), {} vertices",
        canvas.frames_submitted(),
        last.draw_calls,
        last.fills,
        last.strokes,
        last.vertices
    );
    Ok(())
}
