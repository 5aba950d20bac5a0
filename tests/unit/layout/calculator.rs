use super::*;

fn ratio(w: u32, h: u32) -> FrameRatioSpec {
    FrameRatioSpec::ratio(w, h).unwrap()
}

#[test]
fn auto_pads_both_axes_exactly() {
    for (w, h) in [(1, 1), (1920, 1080), (1080, 1920), (333, 777)] {
        let g = compute_geometry(w, h, FrameRatioSpec::Auto).unwrap();
        assert_eq!(g.canvas_width, w + PADDING);
        assert_eq!(g.canvas_height, h + PADDING);
        assert_eq!(g.media_x, 100.0);
        assert_eq!(g.media_y, 100.0);
    }
}

#[test]
fn landscape_into_square_fits_by_width() {
    let g = compute_geometry(1920, 1080, ratio(1, 1)).unwrap();
    assert_eq!((g.canvas_width, g.canvas_height), (2120, 2120));
    assert_eq!(g.media_x, 100.0);
    assert_eq!(g.media_y, 520.0);
}

#[test]
fn portrait_into_widescreen_fits_by_height() {
    let g = compute_geometry(1080, 1920, ratio(16, 9)).unwrap();
    assert_eq!(g.canvas_height, 2120);
    assert_eq!(g.canvas_width, 3769);
    assert_eq!(g.media_y, 100.0);
    assert_eq!(g.media_x, (3769.0 - 1080.0) / 2.0);
}

#[test]
fn explicit_ratios_hold_within_rounding_and_center_media() {
    let sizes = [(1, 1), (7, 3), (640, 480), (1080, 1920), (3000, 200), (200, 3000)];
    let ratios = [(1, 1), (16, 9), (9, 16), (4, 5), (3, 2), (21, 9)];
    for &(mw, mh) in &sizes {
        for &(rw, rh) in &ratios {
            let target = ratio(rw, rh);
            let r = f64::from(rw) / f64::from(rh);
            let g = compute_geometry(mw, mh, target).unwrap();
            let cw = f64::from(g.canvas_width);
            let ch = f64::from(g.canvas_height);

            assert!(
                (cw / ch - r).abs() <= (1.0 + r) / ch,
                "{mw}x{mh} @ {rw}:{rh} -> {cw}x{ch}"
            );
            assert!(g.canvas_width >= mw && g.canvas_height >= mh);

            let media_ratio = f64::from(mw) / f64::from(mh);
            if media_ratio > r {
                assert_eq!(g.canvas_width, mw + PADDING);
            } else {
                assert_eq!(g.canvas_height, mh + PADDING);
            }

            assert_eq!(g.media_x, (cw - f64::from(mw)) / 2.0);
            assert_eq!(g.media_y, (ch - f64::from(mh)) / 2.0);
        }
    }
}

#[test]
fn media_rect_matches_placement() {
    let g = compute_geometry(100, 50, FrameRatioSpec::Auto).unwrap();
    let r = g.media_rect();
    assert_eq!((r.x0, r.y0, r.x1, r.y1), (100.0, 100.0, 200.0, 150.0));
    assert!(g.fits_media(100, 50));
    assert!(!g.fits_media(50, 100));
}

#[test]
fn zero_media_and_oversized_canvas_are_rejected() {
    assert!(compute_geometry(0, 10, FrameRatioSpec::Auto).is_err());
    let err = compute_geometry(3000, 10, ratio(1, 100)).unwrap_err();
    assert!(err.to_string().starts_with("configuration error:"));
}

#[test]
fn display_scale_fits_height_then_width() {
    let g = compute_geometry(1920, 1080, FrameRatioSpec::Auto).unwrap();

    let roomy = Viewport {
        height: 4000.0,
        container_width: 4000.0,
    };
    assert_eq!(g.display_scale(roomy), 1.0);

    let short = Viewport {
        height: 1000.0,
        container_width: 10_000.0,
    };
    let s = g.display_scale(short);
    assert!((s - 700.0 / 1280.0).abs() < 1e-12);

    let narrow = Viewport {
        height: 1000.0,
        container_width: 500.0,
    };
    let (w, h) = g.display_size(narrow);
    assert!((w - 500.0).abs() < 1e-9);
    assert!(h < 700.0);
    assert_eq!(g.canvas_width, 2120);
}
