use super::*;

fn frames(n: u8) -> Vec<MediaFrame> {
    (0..n)
        .map(|i| MediaFrame::solid(2, 2, [i, i, i, 255]).unwrap())
        .collect()
}

#[test]
fn frame_playback_walks_to_end_and_holds_last_frame() {
    let mut p = FramePlayback::new(frames(3), Fps::CAPTURE).unwrap();
    p.wait_for_data().unwrap();
    p.play_from_start().unwrap();
    assert_eq!(p.current_time_secs(), 0.0);
    assert!((p.duration_secs() - 0.1).abs() < 1e-12);

    p.advance().unwrap();
    p.advance().unwrap();
    assert!(!p.ended());
    assert_eq!(p.current_frame().unwrap().rgba8_premul[0], 2);

    p.advance().unwrap();
    assert!(p.ended());
    assert_eq!(p.current_time_secs(), p.duration_secs());
    assert_eq!(p.current_frame().unwrap().rgba8_premul[0], 2);

    p.play_from_start().unwrap();
    assert!(!p.ended());
    assert_eq!(p.current_frame().unwrap().rgba8_premul[0], 0);
}

#[test]
fn frame_playback_rejects_empty_or_mixed_sizes() {
    assert!(FramePlayback::new(Vec::new(), Fps::CAPTURE).is_err());
    let mixed = vec![
        MediaFrame::solid(2, 2, [0; 4]).unwrap(),
        MediaFrame::solid(3, 2, [0; 4]).unwrap(),
    ];
    assert!(FramePlayback::new(mixed, Fps::CAPTURE).is_err());
}

#[test]
fn still_playback_never_ends() {
    let mut p = StillPlayback::new(MediaFrame::solid(1, 1, [1, 2, 3, 255]).unwrap());
    p.play_from_start().unwrap();
    for _ in 0..5 {
        p.advance().unwrap();
    }
    assert!(!p.ended());
    assert_eq!(p.duration_secs(), 0.0);
    assert!(p.current_frame().is_some());
}
