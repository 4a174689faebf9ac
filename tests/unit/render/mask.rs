use super::*;

fn opaque(w: u32, h: u32) -> Bitmap {
    Bitmap {
        width: w,
        height: h,
        data: vec![255; (w * h * 4) as usize],
    }
}

#[test]
fn clears_corners_and_keeps_edges() {
    let mut b = opaque(10, 10);
    round_corners(&mut b, 4.0);
    assert_eq!(b.pixel(0, 0), Some([0, 0, 0, 0]));
    assert_eq!(b.pixel(9, 9), Some([0, 0, 0, 0]));
    assert_eq!(b.pixel(5, 0), Some([255; 4]));
    assert_eq!(b.pixel(0, 5), Some([255; 4]));
    assert_eq!(b.pixel(5, 5), Some([255; 4]));
}

#[test]
fn zero_radius_is_a_noop() {
    let mut b = opaque(4, 4);
    round_corners(&mut b, 0.0);
    assert_eq!(b, opaque(4, 4));
}

#[test]
fn radius_is_clamped_to_a_circle() {
    let mut b = opaque(20, 20);
    round_corners(&mut b, 1_000.0);
    assert_eq!(b.pixel(0, 0).map(|p| p[3]), Some(0));
    assert_eq!(b.pixel(10, 10).map(|p| p[3]), Some(255));
    assert!(b.pixel(10, 0).is_some_and(|p| p[3] > 200));
}
