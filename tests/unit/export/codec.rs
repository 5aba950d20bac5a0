use super::*;

#[test]
fn first_supported_preference_wins() {
    let n = negotiate_format(&VideoFormat::PREFERENCES, |_| true);
    assert_eq!(n.format, VideoFormat::MP4_H264);
    assert!(!n.fallback);

    let n = negotiate_format(&VideoFormat::PREFERENCES, |f| f.container == Container::Webm);
    assert_eq!(n.format, VideoFormat::WEBM_VP9);

    let n = negotiate_format(&VideoFormat::PREFERENCES, |f| f == VideoFormat::WEBM_VP8);
    assert_eq!(n.format, VideoFormat::WEBM_VP8);
}

#[test]
fn nothing_supported_falls_back_to_baseline() {
    let n = negotiate_format(&VideoFormat::PREFERENCES, |_| false);
    assert_eq!(n.format, VideoFormat::BASELINE);
    assert!(n.fallback);

    let n = negotiate_format(&[], |_| true);
    assert_eq!(n.format, VideoFormat::BASELINE);
}

#[test]
fn format_decides_extension_mime_and_encoder() {
    assert_eq!(VideoFormat::MP4_H264.extension(), "mp4");
    assert_eq!(VideoFormat::MP4_H264.ffmpeg_encoder(), "libx264");
    assert_eq!(VideoFormat::WEBM_VP9.mime_type(), "video/webm");
    assert_eq!(VideoFormat::WEBM_VP8.ffmpeg_encoder(), "libvpx");
    assert_eq!(VideoFormat::BASELINE.extension(), "mp4");
    assert_eq!(VideoFormat::BASELINE.ffmpeg_encoder(), "mpeg4");
}

#[test]
fn formats_parse_and_display() {
    for f in [
        VideoFormat::MP4_H264,
        VideoFormat::WEBM_VP9,
        VideoFormat::WEBM_VP8,
        VideoFormat::BASELINE,
    ] {
        assert_eq!(f.to_string().parse::<VideoFormat>().unwrap(), f);
    }
    assert_eq!(" WEBM/VP9 ".parse::<VideoFormat>().unwrap(), VideoFormat::WEBM_VP9);
    assert!(matches!(
        "avi/xvid".parse::<VideoFormat>(),
        Err(ShotframeError::Configuration(_))
    ));
}

#[test]
fn serde_uses_the_slash_form() {
    let json = serde_json::to_string(&vec![VideoFormat::WEBM_VP8]).unwrap();
    assert_eq!(json, r#"["webm/vp8"]"#);
    let back: Vec<VideoFormat> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, vec![VideoFormat::WEBM_VP8]);
}
