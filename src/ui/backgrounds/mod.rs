pub mod matrixrain;

pub use matrixrain::MatrixRainWidget;
