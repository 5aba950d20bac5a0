use super::*;
use crate::foundation::core::{Point, Rect};
use crate::layout::calculator::compute_geometry;
use crate::render::cpu::CpuSurface;
use crate::render::recording::{DrawOp, RecordingSurface};
use crate::style::color::Color;
use crate::style::ratio::FrameRatioSpec;

fn setup(style: &SceneStyle) -> (CanvasGeometry, MediaFrame, RecordingSurface) {
    let frame = MediaFrame::solid(40, 20, [9, 9, 9, 255]).unwrap();
    let g = compute_geometry(40, 20, style.frame_ratio).unwrap();
    let surface = RecordingSurface::new(g.canvas_width, g.canvas_height);
    (g, frame, surface)
}

#[test]
fn rounded_corners_draw_shadow_shape_then_clipped_media() {
    let style = SceneStyle {
        corner_radius: 12,
        background: Color::rgb(1, 2, 3),
        ..SceneStyle::default()
    };
    let (g, frame, mut s) = setup(&style);
    compose_scene(&mut s, &g, &frame, &style).unwrap();

    let rect = Rect::new(100.0, 100.0, 140.0, 120.0);
    let media = DrawOp::DrawMedia {
        origin: Point::new(100.0, 100.0),
        width: 40,
        height: 20,
        generation: frame.generation(),
    };
    assert_eq!(
        s.ops(),
        &[
            DrawOp::FillBackground(Color::rgb(1, 2, 3)),
            DrawOp::PushShadow(style.shadow),
            DrawOp::FillRoundedRect {
                rect,
                radius: 12.0,
                color: Color::rgb(1, 2, 3),
            },
            DrawOp::PopShadow,
            DrawOp::PushClip { rect, radius: 12.0 },
            media,
            DrawOp::PopClip,
        ]
    );
    assert!(s.is_balanced());
}

#[test]
fn square_corners_never_clip_or_fill_rects() {
    let style = SceneStyle {
        corner_radius: 0,
        ..SceneStyle::default()
    };
    let (g, frame, mut s) = setup(&style);
    compose_scene(&mut s, &g, &frame, &style).unwrap();

    let ops = s.ops();
    assert!(!ops.iter().any(|op| matches!(
        op,
        DrawOp::PushClip { .. } | DrawOp::PopClip | DrawOp::FillRoundedRect { .. }
    )));
    let media_draws = ops
        .iter()
        .filter(|op| matches!(op, DrawOp::DrawMedia { .. }))
        .count();
    assert_eq!(media_draws, 2);
    assert!(matches!(ops[1], DrawOp::PushShadow(_)));
    assert!(matches!(ops[2], DrawOp::DrawMedia { .. }));
    assert_eq!(ops[3], DrawOp::PopShadow);
}

#[test]
fn media_is_centered_for_every_ratio() {
    for ratio in ["auto", "1:1", "16:9", "9:16", "4:5"] {
        let style = SceneStyle {
            frame_ratio: ratio.parse::<FrameRatioSpec>().unwrap(),
            ..SceneStyle::default()
        };
        let (g, frame, mut s) = setup(&style);
        compose_scene(&mut s, &g, &frame, &style).unwrap();
        let expected = Point::new(
            (f64::from(g.canvas_width) - 40.0) / 2.0,
            (f64::from(g.canvas_height) - 20.0) / 2.0,
        );
        for op in s.ops() {
            if let DrawOp::DrawMedia { origin, .. } = op {
                assert_eq!(*origin, expected, "{ratio}");
            }
        }
    }
}

#[test]
fn mismatched_surface_or_frame_is_rejected() {
    let style = SceneStyle::default();
    let (g, frame, _) = setup(&style);
    let mut wrong = RecordingSurface::new(10, 10);
    assert!(compose_scene(&mut wrong, &g, &frame, &style).is_err());
    assert!(wrong.ops().is_empty());

    let mut s = RecordingSurface::new(g.canvas_width, g.canvas_height);
    let other = MediaFrame::solid(20, 40, [0, 0, 0, 255]).unwrap();
    assert!(compose_scene(&mut s, &g, &other, &style).is_err());
}

#[test]
fn composing_twice_is_pixel_identical() {
    let style = SceneStyle {
        shadow: crate::style::scene::ShadowStyle {
            blur_radius: 10,
            ..Default::default()
        },
        corner_radius: 8,
        ..SceneStyle::default()
    };
    let frame = MediaFrame::solid(60, 30, [200, 10, 10, 255]).unwrap();
    let g = compute_geometry(60, 30, style.frame_ratio).unwrap();
    let mut s = CpuSurface::new(g.canvas_width, g.canvas_height).unwrap();

    compose_scene(&mut s, &g, &frame, &style).unwrap();
    let first = s.snapshot();
    compose_scene(&mut s, &g, &frame, &style).unwrap();
    assert_eq!(first, s.snapshot());

    let center = first.pixel(130, 115).unwrap();
    assert_eq!(center, [200, 10, 10, 255]);
    let corner = first.pixel(0, 0).unwrap();
    assert_eq!(corner, [0xfa, 0xfa, 0xfa, 255]);
}

#[test]
fn huge_shadow_blur_renders_promptly() {
    let style = SceneStyle {
        shadow: crate::style::scene::ShadowStyle {
            blur_radius: 4000,
            ..crate::style::scene::ShadowStyle::default()
        },
        ..SceneStyle::default()
    };
    let frame = MediaFrame::solid(40, 20, [9, 9, 9, 255]).unwrap();
    let g = compute_geometry(40, 20, style.frame_ratio).unwrap();
    let mut surface = CpuSurface::new(g.canvas_width, g.canvas_height).unwrap();

    let started = std::time::Instant::now();
    compose_scene(&mut surface, &g, &frame, &style).unwrap();
    compose_scene(&mut surface, &g, &frame, &style).unwrap();
    assert!(
        started.elapsed() < std::time::Duration::from_secs(10),
        "took {:?}",
        started.elapsed()
    );
    // The spread shadow is faint but the media itself is intact.
    let i = (110 * g.canvas_width as usize + 120) * 4;
    assert_eq!(&surface.pixels()[i..i + 4], &[9, 9, 9, 255]);
}
