use std::path::Path;

use anyhow::Context as _;
use kurbo::{Affine, BezPath, ParamCurve, PathSeg, Point};

use crate::foundation::core::SamplePoint;
use crate::foundation::error::{EpicycleError, EpicycleResult};

/// How drawings are sampled and normalized.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ExtractOpts {
    /// Samples per unit of (normalized) segment length.
    pub interpolation_factor: f64,
    /// Side of the normalized box the larger drawing side is scaled to.
    pub box_extent: f64,
    /// Minimum kept spacing, as a fraction of `1 / interpolation_factor`.
    pub dedup_ratio: f64,
}

impl Default for ExtractOpts {
    fn default() -> Self {
        Self {
            interpolation_factor: 50.0,
            box_extent: 1.7,
            dedup_ratio: 2.0 / 3.0,
        }
    }
}

impl ExtractOpts {
    /// Every knob must be finite; factor and extent must be positive.
    pub fn validate(&self) -> EpicycleResult<()> {
        if !self.interpolation_factor.is_finite() || self.interpolation_factor <= 0.0 {
            return Err(EpicycleError::validation(
                "interpolation factor must be finite and > 0",
            ));
        }
        if !self.box_extent.is_finite() || self.box_extent <= 0.0 {
            return Err(EpicycleError::validation("box extent must be finite and > 0"));
        }
        if !self.dedup_ratio.is_finite() || self.dedup_ratio < 0.0 {
            return Err(EpicycleError::validation("dedup ratio must be finite and >= 0"));
        }
        Ok(())
    }

    /// Points closer than this to an already kept point are dropped.
    pub fn min_distance(&self) -> f64 {
        self.dedup_ratio / self.interpolation_factor
    }
}

/// Read an SVG file and sample every path in it.
pub fn points_from_svg_file(path: &Path, opts: &ExtractOpts) -> EpicycleResult<Vec<SamplePoint>> {
    let bytes = std::fs::read(path).with_context(|| format!("read svg '{}'", path.display()))?;
    points_from_svg(&bytes, opts)
}

/// Parse an SVG document and sample every path in it, in document order.
///
/// Shapes are resolved to paths and absolute transforms are applied before sampling. The result
/// is centered on the origin with the larger side spanning `box_extent`, and thinned with
/// [`dedup_points`].
#[tracing::instrument(skip(bytes, opts), fields(len = bytes.len()))]
pub fn points_from_svg(bytes: &[u8], opts: &ExtractOpts) -> EpicycleResult<Vec<SamplePoint>> {
    opts.validate()?;
    let usvg_opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &usvg_opts)
        .map_err(|e| EpicycleError::svg(format!("parse svg tree: {e}")))?;

    let mut paths = Vec::new();
    collect_paths(tree.root(), &mut paths);
    tracing::debug!(paths = paths.len(), "svg paths collected");
    sample_paths(&paths, opts)
}

/// Sample a single SVG path `d` attribute.
pub fn points_from_path_data(d: &str, opts: &ExtractOpts) -> EpicycleResult<Vec<SamplePoint>> {
    opts.validate()?;
    let path = BezPath::from_svg(d)
        .map_err(|e| EpicycleError::svg(format!("parse path data: {e}")))?;
    sample_paths(&[path], opts)
}

/// Keep points in order, dropping any closer than `min_distance` to one already kept.
pub fn dedup_points(points: &[SamplePoint], min_distance: f64) -> Vec<SamplePoint> {
    let mut kept: Vec<SamplePoint> = Vec::with_capacity(points.len());
    for &p in points {
        if kept.iter().all(|k| (k - p).norm() >= min_distance) {
            kept.push(p);
        }
    }
    kept
}

fn collect_paths(group: &usvg::Group, out: &mut Vec<BezPath>) {
    for node in group.children() {
        match node {
            usvg::Node::Group(g) => collect_paths(g.as_ref(), out),
            usvg::Node::Path(p) => out.push(usvg_path_to_kurbo(p.data(), p.abs_transform())),
            _ => {}
        }
    }
}

fn usvg_path_to_kurbo(data: &usvg::tiny_skia_path::Path, ts: usvg::Transform) -> BezPath {
    use usvg::tiny_skia_path::PathSegment;

    let pt = |p: usvg::tiny_skia_path::Point| Point::new(f64::from(p.x), f64::from(p.y));
    let mut out = BezPath::new();
    for seg in data.segments() {
        match seg {
            PathSegment::MoveTo(p) => out.move_to(pt(p)),
            PathSegment::LineTo(p) => out.line_to(pt(p)),
            PathSegment::QuadTo(p1, p2) => out.quad_to(pt(p1), pt(p2)),
            PathSegment::CubicTo(p1, p2, p3) => out.curve_to(pt(p1), pt(p2), pt(p3)),
            PathSegment::Close => out.close_path(),
        }
    }
    let affine = Affine::new([
        f64::from(ts.sx),
        f64::from(ts.ky),
        f64::from(ts.kx),
        f64::from(ts.sy),
        f64::from(ts.tx),
        f64::from(ts.ty),
    ]);
    out.apply_affine(affine);
    out
}

fn sample_paths(paths: &[BezPath], opts: &ExtractOpts) -> EpicycleResult<Vec<SamplePoint>> {
    let segments: Vec<PathSeg> = paths.iter().flat_map(|p| p.segments()).collect();
    let Some((min, max)) = endpoint_bounds(&segments) else {
        return Err(EpicycleError::validation("drawing contains no path segments"));
    };

    let side = (max.x - min.x).max(max.y - min.y);
    if !side.is_finite() || side <= 0.0 {
        return Err(EpicycleError::validation("drawing has zero extent"));
    }
    let center = min.midpoint(max);
    let scale = opts.box_extent / side;
    let normalize = |p: Point| SamplePoint::new((p.x - center.x) * scale, (p.y - center.y) * scale);

    let mut raw = Vec::new();
    for seg in &segments {
        let chord = seg.start().distance(seg.end()) * scale;
        let steps = ((chord * opts.interpolation_factor).floor() as usize).max(1);
        raw.extend((0..steps).map(|i| normalize(seg.eval(i as f64 / steps as f64))));
    }

    let points = dedup_points(&raw, opts.min_distance());
    tracing::debug!(sampled = raw.len(), kept = points.len(), "drawing sampled");
    if points.is_empty() {
        return Err(EpicycleError::validation("drawing produced no sample points"));
    }
    Ok(points)
}

fn endpoint_bounds(segments: &[PathSeg]) -> Option<(Point, Point)> {
    let mut it = segments.iter().flat_map(|s| [s.start(), s.end()]);
    let first = it.next()?;
    Some(it.fold((first, first), |(lo, hi), p| {
        (
            Point::new(lo.x.min(p.x), lo.y.min(p.y)),
            Point::new(hi.x.max(p.x), hi.y.max(p.y)),
        )
    }))
}

#[cfg(test)]
#[path = "../../tests/unit/extract/svg.rs"]
mod tests;
