use super::*;

#[test]
fn defaults_match_fresh_session() {
    let s = SceneStyle::default();
    assert_eq!(s.background.to_string(), "#fafafa");
    assert_eq!(s.corner_radius, 46);
    assert_eq!(s.frame_ratio, FrameRatioSpec::Auto);
    assert_eq!(s.shadow.offset_x, 0);
    assert_eq!(s.shadow.offset_y, 15);
    assert_eq!(s.shadow.blur_radius, 60);
    assert_eq!(s.shadow.opacity, 1.0);
}

#[test]
fn partial_json_fills_defaults() {
    let s = SceneStyle::from_json_slice(
        br##"{"background":"#101010","frame_ratio":"1:1","shadow":{"blur_radius":0}}"##,
    )
    .unwrap();
    assert_eq!(s.background, Color::rgb(0x10, 0x10, 0x10));
    assert_eq!(s.frame_ratio, FrameRatioSpec::ratio(1, 1).unwrap());
    assert_eq!(s.shadow.blur_radius, 0);
    assert_eq!(s.shadow.offset_y, 15);
    assert_eq!(s.corner_radius, 46);
}

#[test]
fn rejects_unknown_fields_and_bad_opacity() {
    let err = SceneStyle::from_json_slice(br#"{"radius": 3}"#).unwrap_err();
    assert!(err.to_string().starts_with("configuration error:"));

    let err = SceneStyle::from_json_slice(br#"{"shadow":{"opacity":1.5}}"#).unwrap_err();
    assert!(err.to_string().contains("shadow opacity"));
}

#[test]
fn rejects_blur_radius_above_the_limit() {
    let at_limit = format!(r#"{{"shadow":{{"blur_radius":{MAX_SHADOW_BLUR}}}}}"#);
    let s = SceneStyle::from_json_slice(at_limit.as_bytes()).unwrap();
    assert_eq!(s.shadow.blur_radius, MAX_SHADOW_BLUR);

    let err = SceneStyle::from_json_slice(br#"{"shadow":{"blur_radius":4000}}"#).unwrap_err();
    assert!(matches!(err, ShotframeError::Configuration(_)), "{err}");
    assert!(err.to_string().contains("blur radius"));
}

#[test]
fn opacity_percent_is_clamped() {
    let s = ShadowStyle::default().with_opacity_percent(40);
    assert!((s.opacity - 0.4).abs() < 1e-12);
    assert_eq!(ShadowStyle::default().with_opacity_percent(250).opacity, 1.0);
    assert!(!ShadowStyle::default().with_opacity_percent(0).is_visible());
}

#[test]
fn group_resets_leave_the_other_group_alone() {
    let mut s = SceneStyle {
        background: Color::rgb(1, 2, 3),
        corner_radius: 0,
        frame_ratio: FrameRatioSpec::ratio(9, 16).unwrap(),
        shadow: ShadowStyle {
            offset_x: -4,
            offset_y: 2,
            blur_radius: 10,
            opacity: 0.25,
        },
    };
    s.reset_scene();
    assert_eq!(s.corner_radius, 46);
    assert_eq!(s.shadow.offset_x, -4);
    s.reset_shadow();
    assert_eq!(s, SceneStyle::default());
}
