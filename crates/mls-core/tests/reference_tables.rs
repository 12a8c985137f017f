//! Single-layer stacks checked against tabulated coefficients.
//!
//! The tables were computed in extended precision, so the tolerances below
//! are the relative accuracy of the double precision recursion.

use mls_core::{load_medium, Backing, Layer, Solver};
use num_complex::Complex64;
use std::fs;
use std::path::{Path, PathBuf};

/// Relative tolerance for well-conditioned layers.
const TOLERANCE: f64 = 1e-10;
/// A thin lossless pane near grazing incidence at low frequency: its
/// compressional and shear eigenvectors are close to parallel.
const PANE_TOLERANCE: f64 = 1e-9;

struct Row {
    frequency: f64,
    angle: f64,
    reflection: Complex64,
    transmission: Complex64,
}

fn fixture(relative: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join(relative)
}

fn read_table(name: &str) -> Vec<Row> {
    let text = fs::read_to_string(fixture(&format!("references/{name}.csv"))).unwrap();
    text.lines()
        .skip(1)
        .filter(|l| !l.trim().is_empty())
        .map(|line| {
            let v: Vec<f64> = line.split(',').map(|x| x.trim().parse().unwrap()).collect();
            Row {
                frequency: v[0],
                angle: v[1],
                reflection: Complex64::new(v[2], v[3]),
                transmission: Complex64::new(v[4], v[5]),
            }
        })
        .collect()
}

fn assert_close(actual: Complex64, expected: Complex64, tolerance: f64, what: &str) {
    let error = (actual - expected).norm() / expected.norm();
    assert!(
        error < tolerance,
        "{what}: {actual} expected {expected} (relative error {error:.2e})"
    );
}

fn check(material: &str, thickness: f64, backing: Backing, table: &str, tolerance: f64) {
    let medium = load_medium(fixture(&format!("materials/{material}.toml")), None).unwrap();
    let mut solver = Solver::new(vec![Layer::new(medium, thickness)], backing);
    let rows = read_table(table);
    assert_eq!(rows.len(), 12);
    for row in rows {
        let c = solver.solve_point(row.frequency, row.angle).unwrap();
        let at = format!("{table} f={} θ={}", row.frequency, row.angle);
        assert_close(c.reflection, row.reflection, tolerance, &format!("{at}: R"));
        match c.transmission {
            Some(t) => assert_close(t, row.transmission, tolerance, &format!("{at}: T")),
            None => assert_eq!(row.transmission, Complex64::new(0.0, 0.0)),
        }
    }
}

#[test]
fn glass_pane_in_transmission() {
    check("glass", 5e-3, Backing::Transmission, "glass_transmission", PANE_TOLERANCE);
}

#[test]
fn damped_wood_on_rigid_wall() {
    check("wood", 1e-2, Backing::Rigid, "wood_rigid", TOLERANCE);
}

#[test]
fn foam_on_rigid_wall() {
    check("foam", 2e-2, Backing::Rigid, "foam_rigid", TOLERANCE);
}

#[test]
fn foam_in_transmission() {
    check("foam", 2e-2, Backing::Transmission, "foam_transmission", TOLERANCE);
}

#[test]
fn batch_matches_tables() {
    let medium = load_medium(fixture("materials/foam.toml"), None).unwrap();
    let mut solver = Solver::new(vec![Layer::new(medium, 2e-2)], Backing::Rigid);
    let results = solver.solve("100,500,1000,2000", "5,30,60").unwrap();
    let result = &results[0];
    for (n, row) in read_table("foam_rigid").iter().enumerate() {
        let c = result.at(n / 3, n % 3, 0);
        assert_eq!(result.frequencies[n / 3], row.frequency);
        assert_eq!(result.angles[n % 3], row.angle);
        assert_close(c.reflection, row.reflection, TOLERANCE, "batch");
    }
}
