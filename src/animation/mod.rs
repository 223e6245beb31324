pub mod controller;
pub mod pulse;
pub(crate) mod throttle;
pub mod token;
