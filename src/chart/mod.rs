pub mod config;
pub mod heatmap;
pub mod layout;
pub(crate) mod normalize;
pub mod radar;
