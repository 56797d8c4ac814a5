pub mod bar;
pub mod dataset;
pub mod errors;
pub mod features;
pub mod labels;
