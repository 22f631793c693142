//! Integration tests for physkit-kernels.

use physkit_kernels::{GridWeightFunction, KernelKind, WeightFunction};

const H: f64 = 0.7;

/// Finite kernels only; Gauss has unbounded support.
fn bounded_kinds() -> impl Iterator<Item = KernelKind> {
    KernelKind::all()
        .iter()
        .copied()
        .filter(|k| *k != KernelKind::Gauss)
}

fn sample_radii(kernel: &dyn WeightFunction) -> Vec<f64> {
    let extent = kernel.support_radius().min(2.0) * H;
    (0..=200).map(|i| extent * i as f64 / 200.0).collect()
}

// ─── Catalog Tests ────────────────────────────────────────────

#[test]
fn catalog_has_eight_kernels() {
    assert_eq!(KernelKind::all().len(), 8);
}

#[test]
fn factory_preserves_kind() {
    for &kind in KernelKind::all() {
        assert_eq!(kind.create().kind(), kind);
        assert_eq!(kind.create().name(), kind.name());
    }
}

#[test]
fn names_parse_back() {
    for &kind in KernelKind::all() {
        assert_eq!(kind.to_string().parse::<KernelKind>().unwrap(), kind);
    }
    assert_eq!("cubic_spline".parse::<KernelKind>().unwrap(), KernelKind::Cubic);
    assert!("wendland".parse::<KernelKind>().is_err());
}

#[test]
fn kind_serializes_snake_case() {
    let json = serde_json::to_string(&KernelKind::Laplacian).unwrap();
    assert_eq!(json, "\"laplacian\"");
}

// ─── Compact Support ──────────────────────────────────────────

#[test]
fn zero_outside_support() {
    for kind in bounded_kinds() {
        let kernel = kind.create();
        let edge = kernel.support_radius() * H;
        for factor in [1.0001, 1.5, 3.0, 100.0] {
            assert_eq!(kernel.weight(edge * factor, H), 0.0, "{kind} weight");
            assert_eq!(kernel.gradient(edge * factor, H), 0.0, "{kind} gradient");
        }
    }
}

#[test]
fn non_negative_within_support() {
    for &kind in KernelKind::all() {
        let kernel = kind.create();
        for r in sample_radii(kernel.as_ref()) {
            assert!(kernel.weight(r, H) >= 0.0, "{kind} negative at r={r}");
        }
    }
}

#[test]
fn monotone_decay() {
    for kind in [KernelKind::Cubic, KernelKind::Spiky, KernelKind::Standard] {
        let kernel = kind.create();
        let radii = sample_radii(kernel.as_ref());
        for pair in radii.windows(2) {
            assert!(
                kernel.weight(pair[1], H) <= kernel.weight(pair[0], H) + 1e-12,
                "{kind} increases between r={} and r={}",
                pair[0],
                pair[1]
            );
        }
    }
}

#[test]
fn gradient_matches_finite_difference() {
    let eps = 1e-6;
    for &kind in KernelKind::all() {
        let kernel = kind.create();
        let extent = kernel.support_radius().min(2.0) * H;
        for fraction in [0.13, 0.37, 0.71, 0.93] {
            let r = extent * fraction;
            let numeric = (kernel.weight(r + eps, H) - kernel.weight(r - eps, H)) / (2.0 * eps);
            let analytic = kernel.gradient(r, H);
            assert!(
                (numeric - analytic).abs() <= 1e-5 * analytic.abs().max(1.0),
                "{kind} at r={r}: numeric={numeric}, analytic={analytic}"
            );
        }
    }
}

#[test]
fn cubic_is_continuous_at_knot() {
    let kernel = KernelKind::Cubic.create();
    let below = kernel.weight(H * (1.0 - 1e-9), H);
    let above = kernel.weight(H, H);
    assert!((below - above).abs() < 1e-6);
}

#[test]
fn gauss_is_exponential() {
    let kernel = KernelKind::Gauss.create();
    assert!((kernel.weight(0.0, H) - 1.0).abs() < 1e-12);
    assert!((kernel.weight(H, H) - (-1.0f64).exp()).abs() < 1e-12);
    assert!(kernel.support_radius().is_infinite());
}

#[test]
fn smooth_peaks_at_one() {
    let kernel = KernelKind::Smooth.create();
    assert_eq!(kernel.weight(0.0, H), 1.0);
}

// ─── GridWeightFunction ───────────────────────────────────────

#[test]
fn grid_weight_rejects_bad_scale() {
    assert!(GridWeightFunction::<2>::from_kind(KernelKind::Cubic, [1.0, 0.0]).is_err());
    assert!(GridWeightFunction::<3>::from_kind(KernelKind::Cubic, [1.0, 1.0, -2.0]).is_err());
}

#[test]
fn grid_weight_zero_beyond_support() {
    let w = GridWeightFunction::<2>::from_kind(KernelKind::Cubic, [2.0, 2.0]).unwrap();
    let dx = [0.1, 0.1];
    assert!(w.weight([0.0, 0.0], dx) > 0.0);
    assert!(w.weight([0.15, 0.0], dx) > 0.0);
    assert_eq!(w.weight([0.21, 0.0], dx), 0.0);
    assert_eq!(w.weight([0.15, 0.15], dx), 0.0);
    assert_eq!(w.support_radius(dx), [0.2, 0.2]);
}

#[test]
fn grid_weight_is_symmetric() {
    let w = GridWeightFunction::<3>::from_kind(KernelKind::Quartic, [1.5, 1.5, 1.5]).unwrap();
    let dx = [0.1, 0.2, 0.1];
    let a = w.weight([0.05, -0.1, 0.02], dx);
    let b = w.weight([-0.05, 0.1, -0.02], dx);
    assert!((a - b).abs() < 1e-14);
}

#[test]
fn grid_gradient_points_toward_node() {
    let w = GridWeightFunction::<2>::from_kind(KernelKind::Spiky, [2.0, 2.0]).unwrap();
    let dx = [0.1, 0.1];
    let g = w.gradient([0.05, 0.0], dx);
    assert!(g[0] < 0.0);
    assert_eq!(g[1], 0.0);
    assert_eq!(w.gradient([0.0, 0.0], dx), [0.0, 0.0]);
}

#[test]
fn grid_gradient_matches_finite_difference() {
    let w = GridWeightFunction::<2>::from_kind(KernelKind::Cubic, [2.0, 1.5]).unwrap();
    let dx = [0.1, 0.2];
    let offset = [0.07, -0.09];
    let eps = 1e-7;
    let g = w.gradient(offset, dx);
    for a in 0..2 {
        let mut plus = offset;
        let mut minus = offset;
        plus[a] += eps;
        minus[a] -= eps;
        let numeric = (w.weight(plus, dx) - w.weight(minus, dx)) / (2.0 * eps);
        assert!((numeric - g[a]).abs() < 1e-4 * g[a].abs().max(1.0));
    }
}

#[test]
fn gauss_is_truncated_on_grid() {
    let w = GridWeightFunction::<2>::from_kind(KernelKind::Gauss, [1.0, 1.0]).unwrap();
    let dx = [1.0, 1.0];
    assert!(w.weight([0.9, 0.0], dx) > 0.0);
    assert_eq!(w.weight([1.1, 0.0], dx), 0.0);
}
