use super::*;
use crate::foundation::core::FrameIndex;

fn config() -> EncoderConfig {
    EncoderConfig {
        width: 2,
        height: 1,
        fps: Fps::CAPTURE,
        bitrate_bps: 3_000_000,
        format: VideoFormat::MP4_H264,
        background: Color::BLACK,
    }
}

fn frame(index: u64, px: &[u8; 8]) -> CapturedFrame<'_> {
    CapturedFrame {
        index: FrameIndex(index),
        timestamp_secs: 0.0,
        width: 2,
        height: 1,
        rgba: px,
    }
}

#[test]
fn config_validation_catches_bad_values() {
    assert!(config().validate().is_ok());
    assert!(EncoderConfig { width: 0, ..config() }.validate().is_err());
    assert!(matches!(
        EncoderConfig { bitrate_bps: 0, ..config() }.validate(),
        Err(ShotframeError::Configuration(_))
    ));
}

#[test]
fn in_memory_encoder_emits_header_frames_and_trailer_in_order() {
    let backend = InMemoryBackend::default();
    assert!(backend.supports(VideoFormat::WEBM_VP9));
    assert!(!backend.supports(VideoFormat::BASELINE));

    let mut enc = backend.open(&config()).unwrap();
    enc.start().unwrap();
    let px = [1, 2, 3, 255, 0, 0, 0, 255];
    enc.push_frame(&frame(0, &px)).unwrap();
    let first = enc.take_chunks();
    assert_eq!(first.len(), 2);
    assert_eq!(first[0], b"SFRMmp4/h264".to_vec());
    assert_eq!(&first[1][8..], &[1, 2, 3, 255]);

    enc.push_frame(&frame(1, &px)).unwrap();
    let rest = enc.stop().unwrap();
    assert_eq!(rest.len(), 2);
    assert_eq!(&rest[0][..8], &1u64.to_le_bytes());
    assert_eq!(rest[1], b"END".to_vec());
    assert!(enc.push_frame(&frame(2, &px)).is_err());
}

#[test]
fn injected_failures_surface_at_the_right_step() {
    let px = [0u8; 8];
    let open = InMemoryBackend::default().failing(InjectedFailure::Open);
    assert!(matches!(
        open.open(&config()),
        Err(ShotframeError::CaptureUnavailable(_))
    ));

    let start = InMemoryBackend::default().failing(InjectedFailure::Start);
    let mut enc = start.open(&config()).unwrap();
    assert!(matches!(enc.start(), Err(ShotframeError::CaptureUnavailable(_))));

    let mid = InMemoryBackend::default().failing(InjectedFailure::Frame(1));
    let mut enc = mid.open(&config()).unwrap();
    enc.start().unwrap();
    enc.push_frame(&frame(0, &px)).unwrap();
    assert!(matches!(
        enc.push_frame(&frame(1, &px)),
        Err(ShotframeError::Encoding(_))
    ));
}

#[test]
fn frames_of_the_wrong_size_are_rejected() {
    let mut enc = InMemoryBackend::default().open(&config()).unwrap();
    enc.start().unwrap();
    let px = [0u8; 4];
    let bad = CapturedFrame {
        index: FrameIndex(0),
        timestamp_secs: 0.0,
        width: 1,
        height: 1,
        rgba: &px,
    };
    assert!(matches!(enc.push_frame(&bad), Err(ShotframeError::Validation(_))));
}
