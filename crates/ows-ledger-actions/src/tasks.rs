//! Task actions.

use std::sync::Arc;

use ciborium::value::Value;
use ows_ledger_core::canonical::{
    decode_value, encode_canonical, expect_consumed, expect_map, expect_text, int_map, take_field,
};
use ows_ledger_core::{Action, ActionDescriptor, ApplyError, CoreError, ResourceId, ResourceManager};

const CATEGORY: &str = "tasks";
const ADD_TASK: &str = "AddTask";

const KEY_RUNTIME: u64 = 0;
const KEY_HANDLER: u64 = 1;

/// Registry entry for [`AddTask`].
pub const DESCRIPTOR: ActionDescriptor = ActionDescriptor {
    category: CATEGORY,
    name: ADD_TASK,
    decode: decode_add_task,
};

/// Register a task handler.
///
/// Applying it allocates exactly one resource id for the new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddTask {
    /// Runtime the handler runs in. Empty when unspecified.
    pub runtime: String,

    /// The handler reference.
    pub handler: String,
}

impl AddTask {
    pub fn new(runtime: impl Into<String>, handler: impl Into<String>) -> Self {
        Self {
            runtime: runtime.into(),
            handler: handler.into(),
        }
    }

    /// A task with no runtime set.
    pub fn with_handler(handler: impl Into<String>) -> Self {
        Self::new("", handler)
    }
}

impl Action for AddTask {
    fn category(&self) -> &str {
        CATEGORY
    }

    fn name(&self) -> &str {
        ADD_TASK
    }

    fn encode_attributes(&self) -> Vec<u8> {
        encode_canonical(&int_map(vec![
            (KEY_RUNTIME, Value::Text(self.runtime.clone())),
            (KEY_HANDLER, Value::Text(self.handler.clone())),
        ]))
    }

    fn apply(
        &self,
        resources: &mut dyn ResourceManager,
        next_id: &mut dyn FnMut() -> ResourceId,
    ) -> Result<(), ApplyError> {
        resources.add_task(next_id(), &self.runtime, &self.handler)
    }
}

fn decode_add_task(bytes: &[u8]) -> Result<Arc<dyn Action>, CoreError> {
    let malformed = |e: CoreError| CoreError::malformed(CATEGORY, ADD_TASK, e.to_string());

    let mut map = expect_map(decode_value(bytes).map_err(malformed)?, "attributes").map_err(malformed)?;

    // Both keys are always written, so both must be present.
    let runtime = take_field(&mut map, KEY_RUNTIME)
        .ok_or_else(|| CoreError::malformed(CATEGORY, ADD_TASK, "missing runtime"))?;
    let runtime = expect_text(runtime, "runtime").map_err(malformed)?;
    let handler = take_field(&mut map, KEY_HANDLER)
        .ok_or_else(|| CoreError::malformed(CATEGORY, ADD_TASK, "missing handler"))?;
    let handler = expect_text(handler, "handler").map_err(malformed)?;
    expect_consumed(map, "attributes").map_err(malformed)?;

    Ok(Arc::new(AddTask { runtime, handler }))
}
