mod baseline;
mod center;
mod dense;
mod lasso;
mod linear_regression;
mod neighbors;

pub use baseline::MeanBaseline;
pub use lasso::Lasso;
pub use linear_regression::LinearRegression;
pub use neighbors::KNeighborsRegressor;
