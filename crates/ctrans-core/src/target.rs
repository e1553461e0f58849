#![forbid(unsafe_code)]

//! The element the driver styles and measures.
//!
//! A UI binding implements [`TransitionTarget`] for whatever node it renders:
//! the driver writes the derived class list through
//! [`set_class_name`](TransitionTarget::set_class_name) and reads computed
//! timing through [`computed_timing`](TransitionTarget::computed_timing).
//! How the handle is bound to a real node is up to the binding.

use std::cell::RefCell;
use std::rc::Rc;

use crate::timing::ComputedTiming;

/// Handle to the single element a driver transitions.
pub trait TransitionTarget {
    /// Replace the driver-owned part of the element's class attribute.
    fn set_class_name(&mut self, class_name: &str);

    /// Read the element's current computed `transition-duration` and
    /// `transition-delay`. `None` when the node carries no style.
    fn computed_timing(&self) -> Option<ComputedTiming>;
}

impl<T: TransitionTarget + ?Sized> TransitionTarget for Box<T> {
    fn set_class_name(&mut self, class_name: &str) {
        (**self).set_class_name(class_name);
    }

    fn computed_timing(&self) -> Option<ComputedTiming> {
        (**self).computed_timing()
    }
}

// ---------------------------------------------------------------------------
// RecordingTarget
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct RecordingState {
    class_names: Vec<String>,
    timing: Option<ComputedTiming>,
    probes: usize,
}

/// In-memory target that records every class write and serves a fixed timing.
///
/// Clones share state, so a test can keep one handle while the driver owns
/// another. Also usable as a headless target.
#[derive(Debug, Clone, Default)]
pub struct RecordingTarget {
    state: Rc<RefCell<RecordingState>>,
}

impl RecordingTarget {
    /// A target with no computed timing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A target reporting the given computed strings.
    #[must_use]
    pub fn with_timing(duration: &str, delay: &str) -> Self {
        let target = Self::new();
        target.set_timing(Some(ComputedTiming::new(duration, delay)));
        target
    }

    /// Change what subsequent probes return.
    pub fn set_timing(&self, timing: Option<ComputedTiming>) {
        self.state.borrow_mut().timing = timing;
    }

    /// The most recently written class list.
    #[must_use]
    pub fn class_name(&self) -> String {
        self.state
            .borrow()
            .class_names
            .last()
            .cloned()
            .unwrap_or_default()
    }

    /// Every class list written so far, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.state.borrow().class_names.clone()
    }

    /// How many times timing has been probed.
    #[must_use]
    pub fn probe_count(&self) -> usize {
        self.state.borrow().probes
    }
}

impl TransitionTarget for RecordingTarget {
    fn set_class_name(&mut self, class_name: &str) {
        self.state
            .borrow_mut()
            .class_names
            .push(class_name.to_string());
    }

    fn computed_timing(&self) -> Option<ComputedTiming> {
        let mut state = self.state.borrow_mut();
        state.probes += 1;
        state.timing.clone()
    }
}
