//! Computational and memory cost of elimination orders.

use itertools::Itertools;
use rustc_hash::FxHashMap;

use crate::{
    contractionpath::EliminationOrder,
    error::Result,
    tensornetwork::tensor::{EdgeIndex, Tensor},
};

/// Returns the op count and the contraction width of contracting `tn` along
/// `order` by bucket elimination.
///
/// Each elimination step iterates over all combinations of the legs in the bucket
/// and does one operation per tensor in the bucket. The width is the largest number
/// of legs of an intermediate tensor.
///
/// # Examples
/// ```
/// # use bethe_qaoa::tensornetwork::tensor::Tensor;
/// # use bethe_qaoa::contractionpath::contraction_cost::elimination_cost;
/// # use bethe_qaoa::order;
/// let tensor1 = Tensor::new(vec![0, 1, 2], vec![5, 7, 9]);
/// let tensor2 = Tensor::new(vec![2, 3], vec![9, 11]);
/// let tn = Tensor::new_composite(vec![tensor1, tensor2]);
/// // 2 ops on each of 5*7*9*11 = 3465 entries, result = [0, 1, 3]
/// let (flops, width) = elimination_cost(&tn, &order![2]).unwrap();
/// assert_eq!(flops, 6930.);
/// assert_eq!(width, 3);
/// ```
pub fn elimination_cost(tn: &Tensor, order: &EliminationOrder) -> Result<(f64, usize)> {
    let dims = tn.edges()?;
    let tensors = tn.leaves().map(|t| t.legs().to_vec()).collect_vec();
    Ok(bucket_elimination_cost(tensors, &dims, order))
}

pub(crate) fn bucket_elimination_cost(
    mut tensors: Vec<Vec<EdgeIndex>>,
    dims: &FxHashMap<EdgeIndex, usize>,
    order: &EliminationOrder,
) -> (f64, usize) {
    let size = |legs: &[EdgeIndex]| legs.iter().map(|leg| dims[leg] as f64).product::<f64>();
    let mut flops = 0.0;
    let mut width = 0;

    for &leg in order.legs() {
        let (bucket, rest): (Vec<_>, Vec<_>) =
            tensors.into_iter().partition(|legs| legs.contains(&leg));
        tensors = rest;
        if bucket.is_empty() {
            continue;
        }
        let all_legs = bucket.iter().flatten().copied().unique().collect_vec();
        flops += size(&all_legs) * bucket.len() as f64;
        let remaining = all_legs.into_iter().filter(|&l| l != leg).collect_vec();
        width = width.max(remaining.len());
        tensors.push(remaining);
    }

    if tensors.len() > 1 {
        let all_legs = tensors.iter().flatten().copied().unique().collect_vec();
        flops += size(&all_legs) * tensors.len() as f64;
        width = width.max(all_legs.len());
    }
    (flops, width)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::order;

    #[test]
    fn chain_cost() {
        let tn = Tensor::new_composite(vec![
            Tensor::new_from_const(vec![0, 1], 2),
            Tensor::new_from_const(vec![1, 2], 2),
            Tensor::new_from_const(vec![2, 3], 2),
        ]);
        let (flops, width) = elimination_cost(&tn, &order![1, 2]).unwrap();
        assert_eq!(flops, 32.);
        assert_eq!(width, 2);

        // the reversed order costs the same on a chain
        let (flops, width) = elimination_cost(&tn, &order![2, 1]).unwrap();
        assert_eq!(flops, 32.);
        assert_eq!(width, 2);
    }

    #[test]
    fn leftover_tensors_are_multiplied() {
        let tn = Tensor::new_composite(vec![
            Tensor::new_from_const(vec![0], 3),
            Tensor::new_from_const(vec![1], 2),
        ]);
        let (flops, width) = elimination_cost(&tn, &order![]).unwrap();
        assert_eq!(flops, 12.);
        assert_eq!(width, 2);
    }

    #[test]
    fn star_width() {
        // Eliminating the centre of a star joins all its other legs
        let tn = Tensor::new_composite(vec![
            Tensor::new_from_const(vec![0, 1], 2),
            Tensor::new_from_const(vec![0, 2], 2),
            Tensor::new_from_const(vec![0, 3], 2),
            Tensor::new_from_const(vec![0, 4], 2),
        ]);
        let (_, width) = elimination_cost(&tn, &order![0]).unwrap();
        assert_eq!(width, 4);
        let (_, width) = elimination_cost(&tn, &order![1, 2, 3, 0]).unwrap();
        assert_eq!(width, 1);
    }
}
