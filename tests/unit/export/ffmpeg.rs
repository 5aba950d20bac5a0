use super::*;
use crate::foundation::core::{Fps, FrameIndex};
use crate::style::color::Color;

fn config(width: u32, height: u32, format: VideoFormat) -> EncoderConfig {
    EncoderConfig {
        width,
        height,
        fps: Fps::CAPTURE,
        bitrate_bps: 3_000_000,
        format,
        background: Color::rgb(0xfa, 0xfa, 0xfa),
    }
}

fn encoder(cfg: EncoderConfig) -> FfmpegEncoder {
    FfmpegEncoder {
        tools: FfmpegTools::default(),
        config: cfg,
        process: None,
        finished: false,
    }
}

#[test]
fn encoder_table_is_parsed_for_video_rows_only() {
    let text = "Encoders:\n V..... = Video\n A..... = Audio\n ------\n \
                V....D libx264              libx264 H.264\n \
                V....D mpeg4                MPEG-4 part 2\n \
                A....D aac                  AAC\n";
    assert_eq!(parse_encoder_list(text), vec!["libx264", "mpeg4"]);
    assert!(parse_encoder_list("").is_empty());
}

#[test]
fn odd_sizes_are_padded_to_even_with_the_background() {
    assert_eq!(even_dims(2121, 2120), (2122, 2120));
    assert_eq!(even_dims(4, 4), (4, 4));

    let args = encoder(config(5, 4, VideoFormat::MP4_H264)).args();
    let vf = args.iter().position(|a| a == "-vf").unwrap();
    assert_eq!(args[vf + 1], "pad=6:4:0:0:color=0xfafafa");

    let args = encoder(config(6, 4, VideoFormat::MP4_H264)).args();
    assert!(!args.iter().any(|a| a == "-vf"));
}

#[test]
fn mp4_output_is_fragmented_and_webm_is_realtime() {
    let args = encoder(config(4, 4, VideoFormat::MP4_H264)).args();
    assert!(args.iter().any(|a| a == "frag_keyframe+empty_moov+default_base_moof"));
    assert!(args.iter().any(|a| a == "libx264"));
    assert!(args.iter().any(|a| a == "3000000"));
    assert_eq!(args.last().map(String::as_str), Some("pipe:1"));

    let args = encoder(config(4, 4, VideoFormat::WEBM_VP9)).args();
    assert!(!args.iter().any(|a| a == "-movflags"));
    assert!(args.iter().any(|a| a == "realtime"));
    let f = args.iter().rposition(|a| a == "-f").unwrap();
    assert_eq!(args[f + 1], "webm");
}

#[test]
fn encodes_a_short_clip_when_ffmpeg_is_available() {
    let tools = FfmpegTools::default();
    if !tools.has_ffmpeg() {
        return;
    }
    let backend = FfmpegBackend::new(tools);
    let format = if backend.supports(VideoFormat::BASELINE) {
        VideoFormat::BASELINE
    } else {
        return;
    };
    let cfg = config(17, 9, format);
    let mut enc = backend.open(&cfg).unwrap();
    enc.start().unwrap();

    let px = vec![200u8; cfg.frame_len()];
    let mut chunks = Vec::new();
    for i in 0..10 {
        enc.push_frame(&CapturedFrame {
            index: FrameIndex(i),
            timestamp_secs: cfg.fps.frames_to_secs(i),
            width: cfg.width,
            height: cfg.height,
            rgba: &px,
        })
        .unwrap();
        chunks.extend(enc.take_chunks());
    }
    chunks.extend(enc.stop().unwrap());
    let bytes: Vec<u8> = chunks.concat();
    assert!(bytes.len() > 8);
    assert_eq!(&bytes[4..8], b"ftyp");
}

#[test]
fn stop_without_start_is_rejected() {
    let mut enc = encoder(config(4, 4, VideoFormat::BASELINE));
    assert!(matches!(enc.stop(), Err(ShotframeError::Validation(_))));
}
