use std::path::PathBuf;

use super::*;
use crate::export::download::InMemoryDownload;
use crate::export::encoder::InMemoryBackend;
use crate::export::pipeline::NoopObserver;
use crate::media::frame::MediaFrame;
use crate::render::surface::DrawSurface;

fn write_png(name: &str, w: u32, h: u32) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("shotframe-studio-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    image::RgbaImage::from_pixel(w, h, image::Rgba([10, 200, 10, 255]))
        .save(&path)
        .unwrap();
    path
}

fn studio() -> Studio {
    Studio::new(SceneStyle::default(), ExportSettings::default()).unwrap()
}

#[test]
fn loading_an_image_starts_the_preview() {
    let mut studio = studio();
    assert!(!studio.refresh().unwrap());

    let path = write_png("load.png", 20, 10);
    assert_eq!(studio.load_path(&path).unwrap(), MediaKind::Image);
    assert!(studio.refresh().unwrap());

    let ctx = studio.context().unwrap();
    assert_eq!(ctx.source().file_name(), "load.png");
    assert_eq!(ctx.live().surface().size(), (220, 210));
}

#[test]
fn rejected_types_keep_the_previous_source() {
    let mut studio = studio();
    let path = write_png("keep.png", 8, 8);
    studio.load_path(&path).unwrap();

    let err = studio.load(Path::new("song.mp3"), "audio/mpeg").unwrap_err();
    assert!(matches!(err, ShotframeError::UnsupportedMedia(_)));
    assert_eq!(studio.context().unwrap().source().file_name(), "keep.png");

    let err = studio
        .load(Path::new("/nonexistent/shotframe/missing.png"), "image/png")
        .unwrap_err();
    assert!(matches!(err, ShotframeError::MediaLoad(_)));
    assert_eq!(studio.context().unwrap().source().file_name(), "keep.png");
    assert!(studio.refresh().unwrap());
}

#[test]
fn style_updates_reach_the_next_refresh() {
    let mut studio = studio();
    studio
        .attach(MediaSource::Image {
            path: PathBuf::from("mem.png"),
            frame: MediaFrame::solid(40, 20, [0, 0, 0, 255]).unwrap(),
        })
        .unwrap();
    studio.refresh().unwrap();
    assert_eq!(studio.context().unwrap().live().surface().size(), (240, 220));

    studio
        .update_style(|s| s.frame_ratio = "1:1".parse().unwrap())
        .unwrap();
    studio.refresh().unwrap();
    assert_eq!(studio.context().unwrap().live().surface().size(), (240, 240));

    assert!(studio.update_style(|s| s.shadow.opacity = 2.0).is_err());
    assert_eq!(studio.style().snapshot().shadow.opacity, 1.0);
}

#[test]
fn clear_stops_the_preview() {
    let mut studio = studio();
    let path = write_png("clear.png", 4, 4);
    studio.load_path(&path).unwrap();
    studio.clear();
    assert!(studio.context().is_none());
    assert!(!studio.refresh().unwrap());
}

#[test]
fn exports_dispatch_on_the_loaded_media_kind() {
    let mut studio = studio();
    let mut download = InMemoryDownload::new();
    assert!(
        studio
            .export_still(StillFormat::Png, &mut download)
            .is_err()
    );

    let path = write_png("export.png", 12, 6);
    studio.load_path(&path).unwrap();
    let report = studio.export_still(StillFormat::Png, &mut download).unwrap();
    assert_eq!(report.file_name, "Shot Formatted export.png");
    assert_eq!((report.width, report.height), (212, 206));

    let err = studio
        .export_video(&InMemoryBackend::default(), &mut download, &mut NoopObserver)
        .unwrap_err();
    assert!(matches!(err, ShotframeError::Validation(_)));
    assert_eq!(download.artifacts().len(), 1);
}
