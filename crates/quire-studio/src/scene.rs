//! The reference scene: a rotating disc, a thick red spoke, a sweeping
//! vertical line and an orbiting white dot.

use quire_engine::{Frame, RenderBackend};

/// Draws one frame of the scene.
///
/// `frame_index` drives the rotation, `time` (seconds) the sweep and orbit.
pub fn draw<B: RenderBackend>(frame: &mut Frame<'_, B>, frame_index: u64, time: f32) {
    let vp = frame.viewport();
    let (w, h) = (vp.width, vp.height);

    frame.reset_transform();
    frame.translate(w / 2.0, h / 2.0);
    frame.rotate((frame_index as f32 / 100.0).sin());

    frame.begin_path();
    frame.ellipse(0.0, 0.0, 200.0, 200.0);
    frame.fill_color(1.0, 0.0, 1.0, 1.0);
    frame.fill();

    frame.begin_path();
    frame.move_to(0.0, 0.0);
    frame.line_to(600.0, 700.0);
    frame.stroke_width(20.0);
    frame.stroke_color(1.0, 0.0, 0.0, 1.0);
    frame.stroke();

    // Stroke width carries over from the spoke.
    frame.reset_transform();
    frame.translate(time.sin() * w / 2.0 + w / 2.0, 0.0);
    frame.begin_path();
    frame.move_to(0.0, 0.0);
    frame.line_to(0.0, h);
    frame.stroke_color(0.0, 0.0, 0.0, 1.0);
    frame.stroke();

    frame.reset_transform();
    frame.translate(w / 2.0, h / 2.0);
    frame.translate(time.cos() * 400.0, time.sin() * 400.0);
    frame.begin_path();
    frame.ellipse(0.0, 0.0, 50.0, 50.0);
    frame.fill_color(1.0, 1.0, 1.0, 1.0);
    frame.fill();
}

#[cfg(test)]
mod tests {
    use quire_engine::render::DrawKind;
    use quire_engine::{AlphaMode, Canvas, RecordingBackend};

    use super::*;

    #[test]
    fn scene_records_four_draws_in_order() {
        let mut canvas = Canvas::new(RecordingBackend::new());
        for i in 0..3u64 {
            let mut frame = canvas
                .begin_frame(1920.0, 1080.0, 1.0, AlphaMode::Straight)
                .unwrap();
            draw(&mut frame, i, i as f32 / 60.0);
            frame.end().unwrap();
        }

        let frames = canvas.backend().frames();
        assert_eq!(frames.len(), 3);
        for f in frames {
            let kinds: Vec<DrawKind> = f.calls.iter().map(|c| c.kind).collect();
            assert_eq!(kinds, [DrawKind::Fill, DrawKind::Stroke, DrawKind::Stroke, DrawKind::Fill]);
        }
        // The sweeping line inherits the spoke's width.
        assert_eq!(canvas.paint().stroke_width, 20.0);
    }
}
