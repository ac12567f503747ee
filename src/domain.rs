pub mod error;
pub mod model;
pub mod port;
pub mod service;
pub mod validation;
