pub mod backend;
pub mod cpu;
pub mod plan;
pub mod surface;
