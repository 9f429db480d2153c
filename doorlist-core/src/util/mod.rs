pub mod cancel;
pub mod normalize;
pub mod throttle;
pub mod validate;
