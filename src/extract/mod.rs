//! Sample points from vector drawings.

pub(crate) mod svg;

pub use svg::{
    ExtractOpts, dedup_points, points_from_path_data, points_from_svg, points_from_svg_file,
};
