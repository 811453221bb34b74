use super::*;

#[test]
fn mul_div255_variants_align() {
    for x in [0u16, 1, 127, 255] {
        for y in [0u16, 1, 127, 255] {
            assert_eq!(u16::from(mul_div255_u8(x, y)), mul_div255_u16(x, y));
        }
    }
}

#[test]
fn logical_box_corners_map_to_canvas_corners() {
    let m = ViewMapping::for_canvas(Canvas::square(500));
    assert_eq!(m.to_pixel(Complex64::new(-1.0, -1.0)), Point::new(0.0, 0.0));
    assert_eq!(m.to_pixel(Complex64::new(1.0, 1.0)), Point::new(500.0, 500.0));
    assert_eq!(m.to_pixel(Complex64::new(0.0, 0.0)), Point::new(250.0, 250.0));
}

#[test]
fn non_square_canvas_maps_axes_independently() {
    let m = ViewMapping::for_canvas(Canvas {
        width: 200,
        height: 100,
    });
    assert_eq!(m.to_pixel(Complex64::new(0.5, -0.5)), Point::new(150.0, 25.0));
    assert_eq!(m.radii(0.1), (10.0, 5.0));
}
