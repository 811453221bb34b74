use super::*;

#[test]
fn canvas_validation_rejects_empty_and_oversized() {
    assert!(Canvas::square(0).validate().is_err());
    assert!(
        Canvas {
            width: 10,
            height: 0
        }
        .validate()
        .is_err()
    );
    assert!(Canvas::square(70_000).validate().is_err());
    assert!(Canvas::square(500).validate().is_ok());
    assert_eq!(Canvas::square(500).as_u16().unwrap(), (500, 500));
}

#[test]
fn canvas_rgba_len_is_four_bytes_per_pixel() {
    let c = Canvas {
        width: 3,
        height: 5,
    };
    assert_eq!(c.rgba_len(), 60);
}

#[test]
fn premul_from_straight_scales_color_channels() {
    let c = Rgba8Premul::from_straight_rgba(255, 128, 0, 128);
    assert_eq!(c.a, 128);
    assert_eq!(c.r, 128);
    assert_eq!(c.g, 64);
    assert_eq!(c.b, 0);
    assert_eq!(Rgba8Premul::opaque(1, 2, 3).to_array(), [1, 2, 3, 255]);
}
