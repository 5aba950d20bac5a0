use super::*;
use crate::export::download::InMemoryDownload;
use crate::style::ratio::FrameRatioSpec;

fn red(w: u32, h: u32) -> MediaFrame {
    MediaFrame::solid(w, h, [200, 10, 10, 255]).unwrap()
}

#[test]
fn png_still_is_lossless_at_full_canvas_size() {
    let style = SceneStyle {
        corner_radius: 0,
        ..SceneStyle::default()
    };
    let mut download = InMemoryDownload::new();
    let report = export_still(
        &red(30, 10),
        &style,
        StillFormat::Png,
        "Shot Formatted",
        "shot.heic",
        &mut download,
    )
    .unwrap();

    assert_eq!(report.file_name, "Shot Formatted shot.png");
    assert_eq!((report.width, report.height), (230, 210));
    let artifact = download.last().unwrap();
    assert_eq!(artifact.mime_type, "image/png");

    let decoded = image::load_from_memory(&artifact.bytes).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (230, 210));
    assert_eq!(decoded.get_pixel(115, 105).0, [200, 10, 10, 255]);
    assert_eq!(decoded.get_pixel(0, 0).0, [0xfa, 0xfa, 0xfa, 255]);
}

#[test]
fn jpeg_still_honours_ratio_and_extension() {
    let style = SceneStyle {
        frame_ratio: FrameRatioSpec::ratio(1, 1).unwrap(),
        ..SceneStyle::default()
    };
    let mut download = InMemoryDownload::new();
    let report = export_still(
        &red(40, 20),
        &style,
        StillFormat::Jpeg { quality: 90 },
        "Shot Formatted",
        "shot.png",
        &mut download,
    )
    .unwrap();
    assert_eq!(report.file_name, "Shot Formatted shot.jpeg");
    assert_eq!((report.width, report.height), (240, 240));

    let bytes = download.last().unwrap().bytes;
    assert_eq!(&bytes[..2], &[0xff, 0xd8]);
    let decoded = image::load_from_memory(&bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (240, 240));
}

#[test]
fn invalid_jpeg_quality_is_a_configuration_error() {
    let frame = render_still(&red(4, 4), &SceneStyle::default()).unwrap();
    assert!(matches!(
        encode_still(frame, StillFormat::Jpeg { quality: 0 }),
        Err(ShotframeError::Configuration(_))
    ));
}
