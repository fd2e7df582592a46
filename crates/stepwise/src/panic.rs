//! Running step and hook bodies with panics contained.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::error::StepError;

const OPAQUE_PAYLOAD: &str = "panicked with a non-string payload";

/// Text carried by a panic payload.
///
/// `panic!` with a literal or a format string produces `&str` or `String`
/// payloads; anything else is reported as opaque.
///
/// ```
/// use std::any::Any;
/// use stepwise::panic_message;
///
/// let payload: Box<dyn Any + Send> = Box::new("boom");
/// assert_eq!(panic_message(payload.as_ref()), "boom");
/// ```
#[must_use]
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&'static str>() {
        return (*text).to_owned();
    }
    if let Some(text) = payload.downcast_ref::<String>() {
        return text.clone();
    }
    OPAQUE_PAYLOAD.to_owned()
}

/// Call `body`, reporting a panic as [`StepError::Panicked`].
pub(crate) fn run_guarded<F>(body: F) -> Result<(), StepError>
where
    F: FnOnce() -> Result<(), StepError>,
{
    match catch_unwind(AssertUnwindSafe(body)) {
        Ok(result) => result,
        Err(payload) => Err(StepError::Panicked(panic_message(payload.as_ref()))),
    }
}
