pub mod model;
pub mod mstl;
pub mod partition;
pub mod types;
pub mod window;
