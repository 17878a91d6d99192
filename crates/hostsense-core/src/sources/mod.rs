//! Every built-in sensor source.

pub mod sessions;

use crate::source::SensorSource;

pub use sessions::{SessionSource, WhoOrder};

/// Names accepted by [`create_source`], in catalog order.
pub const SOURCE_NAMES: &[&str] = &["sessions"];

/// All built-in source constructors. Each returns a boxed source.
pub fn all_sources() -> Vec<Box<dyn SensorSource>> {
    vec![Box::new(SessionSource::new())]
}

/// Build the named source, or `None` for an unknown name.
pub fn create_source(name: &str, who_order: WhoOrder) -> Option<Box<dyn SensorSource>> {
    match name {
        "sessions" => Some(Box::new(SessionSource::new().with_who_order(who_order))),
        _ => None,
    }
}
