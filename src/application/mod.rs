pub mod forest;
pub mod predictor;
pub mod service;
pub mod trainer;
