//! Progress decoration around a labelled unit of work.

use std::fmt::Display;

use tracing::debug;

use crate::application::ports::ProgressReporter;

/// Run `action` between `started` and `succeeded`/`failed` notifications.
///
/// The result is returned unchanged: an error is reported and then handed
/// back to the caller as-is.
pub fn wrap<T, E, F>(reporter: &dyn ProgressReporter, label: &str, action: F) -> Result<T, E>
where
    F: FnOnce() -> Result<T, E>,
    E: Display,
{
    reporter.started(label);
    match action() {
        Ok(value) => {
            reporter.succeeded(label);
            Ok(value)
        }
        Err(error) => {
            debug!(step = label, error = %error, "unit of work failed");
            reporter.failed(label, &error.to_string());
            Err(error)
        }
    }
}
