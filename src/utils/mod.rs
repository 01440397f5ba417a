pub mod lines;
pub mod math;
pub mod memzip;
