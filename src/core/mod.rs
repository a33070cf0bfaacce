pub mod cancel;
pub mod clock;
pub mod fixed;
pub mod samples;
