pub mod prelude;
pub mod sample;
pub mod satellite;
pub mod time;
pub mod tle;
