use std::num::NonZeroUsize;

use log::debug;
use ml_core::{check_samples, MlError, Predictor, Result};
use ndarray::{Array1, ArrayView1, ArrayView2};
use smartcore::{
    algorithm::neighbour::KNNAlgorithmName,
    linalg::basic::matrix::DenseMatrix,
    metrics::distance::euclidian::Euclidian,
    neighbors::{
        knn_regressor::{KNNRegressor, KNNRegressorParameters},
        KNNWeightFunction,
    },
};

use crate::dense::{check_width, solver_error, to_dense};

type Model = KNNRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>, Euclidian<f64>>;

/// Regression by averaging the outputs of the `k` closest training samples.
///
/// Distances are euclidean and every neighbor weighs the same. Neighbors are
/// found by exhaustive search, which keeps predictions deterministic.
pub struct KNeighborsRegressor {
    k: NonZeroUsize,
    fitted: Option<(Model, usize)>,
}

impl KNeighborsRegressor {
    /// Returns a new `KNeighborsRegressor` averaging over `k` neighbors.
    ///
    /// At least two neighbors are required; this is checked on `fit`.
    pub fn new(k: NonZeroUsize) -> Self {
        Self { k, fitted: None }
    }

    fn check_k(&self, samples: usize) -> Result<()> {
        let k = self.k.get();
        let reason = if k < 2 {
            format!("at least 2 neighbors are required, got {k}")
        } else if k > samples {
            format!("{k} neighbors requested but only {samples} samples available")
        } else {
            return Ok(());
        };

        Err(MlError::InvalidParameter { name: "k", reason })
    }
}

impl Predictor for KNeighborsRegressor {
    fn name(&self) -> &'static str {
        "k nearest neighbors"
    }

    fn fit(&mut self, inputs: ArrayView2<f64>, outputs: ArrayView1<f64>) -> Result<()> {
        check_samples(inputs, outputs)?;
        self.check_k(inputs.nrows())?;
        debug!(
            "indexing {} samples for {}-nn regression",
            inputs.nrows(),
            self.k
        );

        let parameters = KNNRegressorParameters::default()
            .with_k(self.k.get())
            .with_algorithm(KNNAlgorithmName::LinearSearch)
            .with_weight(KNNWeightFunction::Uniform);
        let model =
            Model::fit(&to_dense(inputs), &outputs.to_vec(), parameters).map_err(solver_error)?;

        self.fitted = Some((model, inputs.ncols()));
        Ok(())
    }

    fn predict(&self, inputs: ArrayView2<f64>) -> Result<Array1<f64>> {
        let (model, width) = self.fitted.as_ref().ok_or(MlError::NotFitted)?;
        check_width(inputs, *width)?;

        let predicted = model.predict(&to_dense(inputs)).map_err(solver_error)?;
        Ok(Array1::from(predicted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn k(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn averages_closest_neighbors() {
        let x = array![[0.0], [1.0], [10.0], [11.0]];
        let y = array![0.1, 0.3, 0.7, 0.9];

        let mut model = KNeighborsRegressor::new(k(2));
        model.fit(x.view(), y.view()).unwrap();

        let predicted = model.predict(array![[0.4], [10.6]].view()).unwrap();
        assert!((predicted[0] - 0.2).abs() < 1e-12);
        assert!((predicted[1] - 0.8).abs() < 1e-12);
    }

    #[test]
    fn uses_every_feature_for_distance() {
        let x = array![[0.0, 0.0], [0.0, 1.0], [5.0, 5.0], [5.0, 6.0]];
        let y = array![0.2, 0.4, 0.6, 0.8];

        let mut model = KNeighborsRegressor::new(k(2));
        model.fit(x.view(), y.view()).unwrap();

        let predicted = model.predict(array![[5.0, 5.5]].view()).unwrap();
        assert!((predicted[0] - 0.7).abs() < 1e-12);
    }

    #[test]
    fn single_neighbor_is_rejected() {
        let mut model = KNeighborsRegressor::new(k(1));
        let err = model
            .fit(array![[0.0], [1.0]].view(), array![0.0, 1.0].view())
            .unwrap_err();
        assert!(matches!(err, MlError::InvalidParameter { name: "k", .. }));
    }

    #[test]
    fn more_neighbors_than_samples_is_rejected() {
        let mut model = KNeighborsRegressor::new(k(3));
        let err = model
            .fit(array![[0.0], [1.0]].view(), array![0.0, 1.0].view())
            .unwrap_err();
        assert!(matches!(err, MlError::InvalidParameter { name: "k", .. }));
    }

    #[test]
    fn predict_before_fit_fails() {
        let model = KNeighborsRegressor::new(k(2));
        assert_eq!(model.predict(array![[0.0]].view()), Err(MlError::NotFitted));
    }
}
