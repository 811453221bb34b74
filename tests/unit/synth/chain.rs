use super::*;

fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

#[test]
fn chain_starts_at_origin_and_links_are_contiguous() {
    let s = Spectrum::analyze(&[c(0.5, 0.0), c(0.0, 0.5), c(-0.5, 0.1), c(0.2, -0.4)]).unwrap();
    let chain = EpicycleChain::at(&s, Timestep(2));

    assert_eq!(chain.links.len(), 4);
    assert_eq!(chain.links[0].center, c(0.0, 0.0));
    for w in chain.links.windows(2) {
        assert_eq!(w[0].end, w[1].center);
    }
    assert_eq!(chain.links[3].end, chain.tip);
}

#[test]
fn radii_are_coefficient_magnitudes() {
    let s = Spectrum::from_coefficients(vec![c(3.0, 4.0), c(0.0, 0.0), c(-1.0, 0.0)]).unwrap();
    let chain = EpicycleChain::at(&s, Timestep(1));
    let radii: Vec<f64> = chain.links.iter().map(|l| l.radius).collect();
    assert_eq!(radii, vec![5.0, 0.0, 1.0]);
}

#[test]
fn tip_is_bitwise_equal_to_reconstruction() {
    let pts: Vec<_> = (0..13)
        .map(|i| c((i as f64 * 0.37).sin() * 0.8, (i as f64 * 0.11).cos() * 0.6))
        .collect();
    let s = Spectrum::analyze(&pts).unwrap();
    for t in 0..13 {
        assert_eq!(
            EpicycleChain::at(&s, Timestep(t)).tip,
            s.reconstruct(Timestep(t))
        );
    }
}

#[test]
fn single_coefficient_chain_runs_from_origin_to_point() {
    let p = c(0.25, -0.5);
    let s = Spectrum::analyze(&[p]).unwrap();
    let chain = EpicycleChain::at(&s, Timestep(0));
    assert_eq!(chain.links.len(), 1);
    assert_eq!(chain.links[0].center, c(0.0, 0.0));
    assert_eq!(chain.tip, p);
}
