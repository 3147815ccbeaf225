//! Integration test common infrastructure.
//!
//! Provides a mock Flowdock service and spy command handlers for asserting
//! on dispatch and send flows.

pub mod mock;

use flowbot::{CommandBinding, CommandRegistry, EventRecord};
use parking_lot::Mutex;
use std::sync::Arc;

#[allow(unused_imports)]
pub use mock::{MockFlowdock, RecordedPost};

/// (pattern, content) pairs in invocation order.
pub type Calls = Arc<Mutex<Vec<(String, String)>>>;

/// Register `pattern` with a handler that records each invocation.
#[allow(dead_code)]
pub fn spy(registry: &mut CommandRegistry, calls: &Calls, pattern: &str) {
    let calls = Arc::clone(calls);
    registry
        .register_fn(pattern, move |b: &CommandBinding, e: &EventRecord| {
            calls.lock().push((b.as_str().to_string(), e.content.clone()));
        })
        .expect("valid test pattern");
}
