use crate::tensornetwork::tensor::EdgeIndex;

pub mod contraction_cost;
mod interaction_graph;
pub mod paths;

/// The order in which legs of a tensor network are summed out by bucket
/// elimination. Legs that are not part of the order stay open.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct EliminationOrder {
    legs: Vec<EdgeIndex>,
}

impl EliminationOrder {
    /// Creates an elimination order from a list of legs.
    ///
    /// # Examples
    /// ```
    /// # use bethe_qaoa::contractionpath::EliminationOrder;
    /// let order = EliminationOrder::new(vec![3, 0, 2]);
    /// assert_eq!(order.legs(), &[3, 0, 2]);
    /// assert_eq!(order.len(), 3);
    /// ```
    #[inline]
    pub fn new(legs: Vec<EdgeIndex>) -> Self {
        Self { legs }
    }

    /// The legs in elimination order.
    #[inline]
    pub fn legs(&self) -> &[EdgeIndex] {
        &self.legs
    }

    /// The number of legs eliminated.
    #[inline]
    pub fn len(&self) -> usize {
        self.legs.len()
    }

    /// Whether no leg is eliminated.
    ///
    /// # Examples
    /// ```
    /// # use bethe_qaoa::contractionpath::EliminationOrder;
    /// # use bethe_qaoa::order;
    /// assert!(EliminationOrder::default().is_empty());
    /// assert!(!order![0, 1].is_empty());
    /// ```
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }
}

/// Macro to create elimination orders.
///
/// For instance, `order![4, 0, 2]` first sums out leg 4, then leg 0 and finally
/// leg 2.
#[macro_export]
macro_rules! order {
    [] => {
        $crate::contractionpath::EliminationOrder::default()
    };
    [$( $leg:expr ),+ $(,)?] => {
        $crate::contractionpath::EliminationOrder::new(vec![$( $leg ),+])
    };
}
