use super::*;

#[test]
fn pixel_dims_rounds_and_clamps_to_one() {
    let px = pixel_dims(Size::new(360.0, 240.0), 3.0).unwrap();
    assert_eq!(px, PixelSize { width: 1080, height: 720 });

    let px = pixel_dims(Size::new(100.5, 10.0), 1.0).unwrap();
    assert_eq!(px.width, 101);

    let px = pixel_dims(Size::new(0.1, 0.1), 1.0).unwrap();
    assert_eq!(px, PixelSize { width: 1, height: 1 });
}

#[test]
fn pixel_dims_rejects_bad_inputs() {
    assert!(pixel_dims(Size::new(0.0, 10.0), 2.0).is_err());
    assert!(pixel_dims(Size::new(10.0, 10.0), 0.0).is_err());
    assert!(pixel_dims(Size::new(10.0, f64::NAN), 2.0).is_err());
}

#[test]
fn parses_hex_rgb_and_rgba() {
    assert_eq!(Color::from_hex("#ff0000").unwrap(), Color::rgb(255, 0, 0));
    assert_eq!(
        Color::from_hex("0000FF80").unwrap(),
        Color::rgba(0, 0, 255, 128)
    );
    assert!(Color::from_hex("#abc").is_err());
    assert!(Color::from_hex("#zz0000").is_err());
}

#[test]
fn non_ascii_hex_is_rejected_without_panicking() {
    for input in ["#aéé1", "ééé", "#ff€000", "ffffff\u{e9}"] {
        assert!(
            matches!(Color::from_hex(input), Err(KeepsakeError::Validation(_))),
            "{input}"
        );
    }
    let parsed: Result<Color, _> = serde_json::from_value(serde_json::json!("#aéé1"));
    assert!(parsed.is_err());
}

#[test]
fn color_serde_uses_hex_strings() {
    let c: Color = serde_json::from_value(serde_json::json!("#f4efe6")).unwrap();
    assert_eq!(c, Color::rgb(0xf4, 0xef, 0xe6));
    let s = serde_json::to_string(&c).unwrap();
    assert_eq!(s, "\"#f4efe6ff\"");
}

#[test]
fn premul_and_unpremul_are_inverse_for_opaque_and_half_alpha() {
    let mut px = vec![200, 100, 50, 255, 200, 100, 50, 128, 9, 9, 9, 0];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[0..4], &[200, 100, 50, 255]);
    assert_eq!(&px[8..12], &[0, 0, 0, 0]);
    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[0..4], &[200, 100, 50, 255]);
    assert!((i32::from(px[4]) - 200).abs() <= 1);
    assert!((i32::from(px[5]) - 100).abs() <= 1);
}

#[test]
fn to_premul_matches_channel_math() {
    assert_eq!(Color::rgba(255, 0, 0, 128).to_premul(), [128, 0, 0, 128]);
    assert_eq!(Color::WHITE.to_premul(), [255, 255, 255, 255]);
}
