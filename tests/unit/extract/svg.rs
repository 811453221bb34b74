use super::*;

fn c(re: f64, im: f64) -> SamplePoint {
    SamplePoint::new(re, im)
}

fn unit_box() -> ExtractOpts {
    ExtractOpts {
        box_extent: 2.0,
        ..ExtractOpts::default()
    }
}

#[test]
fn polyline_is_centered_and_scaled_into_the_box() {
    let pts = points_from_path_data("M 0 0 L 8 0 L 8 8", &unit_box()).unwrap();
    // Each leg spans 2 units at 50 samples per unit, end point excluded.
    assert_eq!(pts.len(), 200);
    assert!((pts[0] - c(-1.0, -1.0)).norm() < 1e-12);
    assert!((pts[100] - c(1.0, -1.0)).norm() < 1e-12);
    assert!(
        pts.iter()
            .all(|p| p.re.abs() <= 1.0 + 1e-12 && p.im.abs() <= 1.0 + 1e-12)
    );
}

#[test]
fn interpolation_factor_controls_density() {
    let opts = ExtractOpts {
        interpolation_factor: 10.0,
        ..unit_box()
    };
    let pts = points_from_path_data("M 0 0 L 8 0", &opts).unwrap();
    assert_eq!(pts.len(), 20);
}

#[test]
fn short_segments_still_get_one_sample() {
    let opts = ExtractOpts {
        interpolation_factor: 0.1,
        dedup_ratio: 0.0,
        ..unit_box()
    };
    let pts = points_from_path_data("M 0 0 L 8 0 L 8 8", &opts).unwrap();
    assert_eq!(pts, vec![c(-1.0, -1.0), c(1.0, -1.0)]);
}

#[test]
fn dedup_keeps_first_of_each_cluster() {
    let pts = [c(0.0, 0.0), c(0.005, 0.0), c(0.1, 0.0), c(0.104, 0.0), c(0.0, 0.009)];
    assert_eq!(dedup_points(&pts, 0.01), vec![c(0.0, 0.0), c(0.1, 0.0)]);
    assert_eq!(dedup_points(&pts, 0.0).len(), pts.len());
}

#[test]
fn retraced_segments_are_deduplicated() {
    let there = points_from_path_data("M 0 0 L 10 0", &ExtractOpts::default()).unwrap();
    let back = points_from_path_data("M 0 0 L 10 0 L 0 0", &ExtractOpts::default()).unwrap();
    // The return leg lands on already kept samples, except its first point (the far end).
    assert_eq!(back.len(), there.len() + 1);
}

#[test]
fn svg_document_matches_path_data() {
    let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100">
        <path d="M10 10 L90 10 L90 90 Z"/>
    </svg>"#;
    let opts = ExtractOpts::default();
    let from_doc = points_from_svg(svg, &opts).unwrap();
    let from_d = points_from_path_data("M10 10 L90 10 L90 90 Z", &opts).unwrap();
    assert_eq!(from_doc, from_d);
}

#[test]
fn group_transforms_are_applied_before_normalizing() {
    let plain = br#"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100">
        <path d="M10 10 L90 10 L90 90 Z"/>
    </svg>"#;
    let moved = br#"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100">
        <g transform="translate(5 5)"><path d="M10 10 L90 10 L90 90 Z"/></g>
    </svg>"#;
    let opts = ExtractOpts::default();
    assert_eq!(
        points_from_svg(plain, &opts).unwrap(),
        points_from_svg(moved, &opts).unwrap()
    );
}

#[test]
fn empty_or_degenerate_drawings_are_rejected() {
    let opts = ExtractOpts::default();
    let err = points_from_path_data("M 1 1", &opts).unwrap_err();
    assert!(matches!(err, EpicycleError::Validation(_)), "{err}");
    let err = points_from_path_data("M 1 1 L 1 1", &opts).unwrap_err();
    assert!(matches!(err, EpicycleError::Validation(_)), "{err}");

    let no_paths = br#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"/>"#;
    assert!(points_from_svg(no_paths, &opts).is_err());
}

#[test]
fn malformed_input_is_an_svg_error() {
    let opts = ExtractOpts::default();
    let err = points_from_svg(b"not svg at all", &opts).unwrap_err();
    assert!(matches!(err, EpicycleError::Svg(_)), "{err}");
    let err = points_from_path_data("M 0 0 Q", &opts).unwrap_err();
    assert!(matches!(err, EpicycleError::Svg(_)), "{err}");
}

#[test]
fn options_are_validated() {
    for bad in [
        ExtractOpts {
            interpolation_factor: 0.0,
            ..ExtractOpts::default()
        },
        ExtractOpts {
            box_extent: -1.0,
            ..ExtractOpts::default()
        },
        ExtractOpts {
            dedup_ratio: f64::NAN,
            ..ExtractOpts::default()
        },
    ] {
        assert!(bad.validate().is_err());
        assert!(points_from_path_data("M 0 0 L 1 0", &bad).is_err());
    }
    assert!((ExtractOpts::default().min_distance() - (2.0 / 3.0) / 50.0).abs() < 1e-15);
}
