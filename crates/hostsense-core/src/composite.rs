//! Fan-in sensor source that concatenates a fixed list of children.
//!
//! Architecture:
//! 1. Children are registered once, at construction, in a fixed order
//! 2. `start` runs on every child in order and stops at the first failure
//! 3. `read_all_sensors` samples children one after another, lazily
//! 4. Output is child A's full sequence, then child B's, and so on
//! 5. The first error ends the snapshot; later children are not sampled
//! 6. `dispose` runs on every child in order
//!
//! No threads, no retries. A caller that wants a failing child skipped must
//! wrap that child itself.

use std::iter::FusedIterator;

use crate::error::SensorResult;
use crate::measurement::Measurement;
use crate::source::{Platform, Readings, SensorSource, SourceInfo};

static COMPOSITE_INFO: SourceInfo = SourceInfo {
    name: "composite",
    description: "Concatenates the readings of every registered child source",
    hardware_kind: None,
    platforms: &[Platform::Any],
    composite: true,
};

/// A sensor source made of other sensor sources.
#[derive(Default)]
pub struct CompositeSource {
    children: Vec<Box<dyn SensorSource>>,
}

impl CompositeSource {
    /// Create a composite over `children`, sampled in the given order.
    pub fn new(children: Vec<Box<dyn SensorSource>>) -> Self {
        Self { children }
    }

    /// Number of registered children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Metadata for each child, in registration order.
    pub fn source_infos(&self) -> Vec<&SourceInfo> {
        self.children.iter().map(|c| c.info()).collect()
    }
}

impl From<Option<Vec<Box<dyn SensorSource>>>> for CompositeSource {
    fn from(children: Option<Vec<Box<dyn SensorSource>>>) -> Self {
        Self::new(children.unwrap_or_default())
    }
}

impl SensorSource for CompositeSource {
    fn info(&self) -> &SourceInfo {
        &COMPOSITE_INFO
    }

    fn is_available(&self) -> bool {
        self.children.iter().all(|c| c.is_available())
    }

    fn start(&mut self) -> SensorResult<()> {
        for child in &mut self.children {
            log::debug!("starting sensor source `{}`", child.name());
            child.start()?;
        }
        Ok(())
    }

    fn read_all_sensors(&self) -> Readings<'_> {
        Box::new(CompositeReadings {
            pending: self.children.iter(),
            current: None,
            failed: false,
        })
    }

    fn dispose(&mut self) {
        for child in &mut self.children {
            log::debug!("disposing sensor source `{}`", child.name());
            child.dispose();
        }
    }
}

/// Lazy concatenation of child snapshots.
///
/// A child's `read_all_sensors` is called only once the previous child's
/// sequence is exhausted. After an error item the iterator yields nothing.
pub struct CompositeReadings<'a> {
    pending: std::slice::Iter<'a, Box<dyn SensorSource>>,
    current: Option<Readings<'a>>,
    failed: bool,
}

impl Iterator for CompositeReadings<'_> {
    type Item = SensorResult<Measurement>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            if let Some(current) = self.current.as_mut() {
                match current.next() {
                    Some(Ok(m)) => return Some(Ok(m)),
                    Some(Err(e)) => {
                        self.failed = true;
                        self.current = None;
                        return Some(Err(e));
                    }
                    None => self.current = None,
                }
            }
            let child = self.pending.next()?;
            log::trace!("sampling sensor source `{}`", child.name());
            self.current = Some(child.read_all_sensors());
        }
    }
}

impl FusedIterator for CompositeReadings<'_> {}
