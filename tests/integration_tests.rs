use bethe_qaoa::{
    builders::bethe::bethe_graph,
    simulator::edge_expectation,
    tree::{
        recursion::{tree_expectation, TreeContractor},
        sandwich::sandwich_tree_expectation,
    },
    types::{Observable, QaoaParams},
};
use float_cmp::assert_approx_eq;
use rand::{rngs::StdRng, SeedableRng};

fn literal_params() -> QaoaParams {
    QaoaParams::new(
        vec![1.1596, -1.6288, 0.1116],
        vec![-0.8442, -0.7410, -0.0668],
    )
    .unwrap()
}

fn reference(depth: usize, degree: usize, params: &QaoaParams) -> f64 {
    let graph = bethe_graph(depth, degree).unwrap();
    edge_expectation(&graph, params, (0, 1), Observable::PAULI_Z)
        .unwrap()
        .re
}

#[test]
fn test_literal_three_layers() {
    let params = literal_params();
    let recursive = tree_expectation(&params, Observable::PAULI_Z).unwrap();
    assert_approx_eq!(f64, recursive.im, 0.0, epsilon = 1e-10);
    assert_approx_eq!(f64, recursive.re, reference(3, 3, &params), epsilon = 1e-6);
    assert_approx_eq!(f64, recursive.re, -0.025_826_491_385_6, epsilon = 1e-9);
}

#[test]
fn test_random_angles_against_reference() {
    let mut rng = StdRng::seed_from_u64(42);
    for layers in 1..=2 {
        for degree in 2..=4 {
            for _ in 0..2 {
                let params = QaoaParams::random(layers, &mut rng).unwrap();
                let recursive = TreeContractor::new(&params, degree)
                    .unwrap()
                    .expectation(Observable::PAULI_Z)
                    .unwrap();
                assert_approx_eq!(
                    f64,
                    recursive.re,
                    reference(layers, degree, &params),
                    epsilon = 1e-8
                );
            }
        }
    }
}

#[test]
fn test_four_layers_against_reference() {
    let mut rng = StdRng::seed_from_u64(4);
    let params = QaoaParams::random(4, &mut rng).unwrap();
    let recursive = tree_expectation(&params, Observable::PAULI_Z).unwrap();
    assert_approx_eq!(f64, recursive.im, 0.0, epsilon = 1e-10);
    assert_approx_eq!(f64, recursive.re, reference(4, 3, &params), epsilon = 1e-8);
}

#[test]
fn test_random_three_layers_path() {
    let mut rng = StdRng::seed_from_u64(3);
    let params = QaoaParams::random(3, &mut rng).unwrap();
    let recursive = TreeContractor::new(&params, 2)
        .unwrap()
        .expectation(Observable::PAULI_Z)
        .unwrap();
    assert_approx_eq!(f64, recursive.re, reference(3, 2, &params), epsilon = 1e-8);
}

#[test]
fn test_truncated_and_deeper_trees() {
    let params = QaoaParams::new(vec![0.6, -0.35], vec![0.2, 0.9]).unwrap();
    let contractor = TreeContractor::new(&params, 3).unwrap();
    for depth in 0..=3 {
        let recursive = contractor
            .expectation_at_depth(depth, Observable::PAULI_Z)
            .unwrap();
        assert_approx_eq!(
            f64,
            recursive.re,
            reference(depth, 3, &params),
            epsilon = 1e-8
        );
    }
}

#[test]
fn test_sandwich_matches_units() {
    let params = literal_params();
    let units = tree_expectation(&params, Observable::PAULI_Z).unwrap();
    let sandwich = sandwich_tree_expectation(&params, Observable::PAULI_Z).unwrap();
    assert_approx_eq!(f64, units.re, sandwich.re, epsilon = 1e-10);
    assert_approx_eq!(f64, units.im, sandwich.im, epsilon = 1e-10);
}
