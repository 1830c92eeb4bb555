pub mod contract;
pub mod model_info;
pub mod prediction;
