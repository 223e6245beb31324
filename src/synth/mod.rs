pub mod engine;
pub mod index;
pub mod modes;
pub mod report;
