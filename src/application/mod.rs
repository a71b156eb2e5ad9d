//! Application services layer.

pub mod error;
pub mod frame;
pub mod render;
pub mod repos;
pub mod resolver;
pub mod site;
pub mod slugs;
