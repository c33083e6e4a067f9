//! Progress throttling for download events.

mod throttle;

pub use throttle::ProgressThrottle;
