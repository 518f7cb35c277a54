pub mod batch;
pub mod gbm;
pub mod strategy;
