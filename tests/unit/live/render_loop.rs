use super::*;
use crate::foundation::core::Fps;
use crate::media::frame::MediaFrame;
use crate::media::playback::FramePlayback;
use crate::render::recording::{DrawOp, RecordingSurface};

fn looped(frames: u8) -> (StyleHandle, LiveRenderLoop<RecordingSurface>) {
    let frames = (0..frames)
        .map(|i| MediaFrame::solid(40, 20, [i, 0, 0, 255]).unwrap())
        .collect();
    let playback = FramePlayback::new(frames, Fps::CAPTURE).unwrap();
    let style = StyleHandle::default();
    let live = LiveRenderLoop::new(
        style.clone(),
        Box::new(playback),
        RecordingSurface::default(),
    );
    (style, live)
}

fn media_generations(ops: &[DrawOp]) -> Vec<u64> {
    ops.iter()
        .filter_map(|op| match op {
            DrawOp::DrawMedia { generation, .. } => Some(*generation),
            _ => None,
        })
        .collect()
}

#[test]
fn nothing_runs_before_start() {
    let (_, mut live) = looped(2);
    assert!(!live.on_refresh().unwrap());
    assert_eq!(live.ticks(), 0);
    assert!(live.surface().ops().is_empty());
}

#[test]
fn each_refresh_composes_once_and_schedules_the_next_tick() {
    let (_, mut live) = looped(3);
    live.start().unwrap();
    for _ in 0..3 {
        assert!(live.on_refresh().unwrap());
    }
    assert_eq!(live.ticks(), 3);
    assert!(live.pending_tick().is_some());

    let ops = live.surface().ops();
    assert_eq!(
        ops[0],
        DrawOp::Resize {
            width: 240,
            height: 220
        }
    );
    let fills = ops
        .iter()
        .filter(|op| matches!(op, DrawOp::FillBackground(_)))
        .count();
    assert_eq!(fills, 3);
    let gens = media_generations(ops);
    assert_eq!(gens.len(), 3);
    assert!(gens[0] != gens[1] && gens[1] != gens[2]);
}

#[test]
fn restart_replaces_the_pending_tick() {
    let (_, mut live) = looped(2);
    let first = live.start().unwrap();
    let second = live.restart();
    assert_ne!(first, second);
    assert_eq!(live.pending_tick(), Some(second));
    assert!(live.on_refresh().unwrap());
    assert_eq!(live.ticks(), 1);
}

#[test]
fn stop_cancels_and_restart_resumes() {
    let (_, mut live) = looped(2);
    live.start().unwrap();
    live.stop();
    assert_eq!(live.pending_tick(), None);
    assert!(!live.on_refresh().unwrap());
    live.restart();
    assert!(live.on_refresh().unwrap());
}

#[test]
fn style_edits_apply_on_the_next_tick() {
    let (style, mut live) = looped(4);
    live.start().unwrap();
    live.on_refresh().unwrap();
    assert_eq!(live.geometry().unwrap().canvas_width, 240);

    style
        .update(|s| {
            s.frame_ratio = FrameRatioSpec::ratio(1, 1).unwrap();
            s.corner_radius = 0;
        })
        .unwrap();
    live.restart();
    live.on_refresh().unwrap();

    let g = live.geometry().unwrap();
    assert_eq!((g.canvas_width, g.canvas_height), (240, 240));
    assert_eq!(live.surface().size(), (240, 240));
    let ops = live.surface().ops();
    assert!(ops.contains(&DrawOp::Resize {
        width: 240,
        height: 240
    }));
    assert!(!ops[ops.len() - 3..].contains(&DrawOp::PopClip));
}

#[test]
fn preview_rewinds_at_end_of_media() {
    let (_, mut live) = looped(2);
    live.start().unwrap();
    for _ in 0..5 {
        live.on_refresh().unwrap();
    }
    let gens = media_generations(live.surface().ops());
    let distinct: std::collections::HashSet<_> = gens.iter().copied().collect();
    assert_eq!(distinct.len(), 2);
}

#[test]
fn oversized_layout_fails_the_tick_and_idles() {
    let (style, mut live) = looped(2);
    live.start().unwrap();
    style
        .update(|s| s.frame_ratio = FrameRatioSpec::ratio(1, 1000).unwrap())
        .unwrap();
    assert!(live.on_refresh().is_err());
    assert_eq!(live.pending_tick(), None);
}
