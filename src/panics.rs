// src/panics.rs
//
// Panic capture for tests: run a closure and convert a panic into an
// error carrying the panic message. Pairs with quiet_panics(), which
// silences the default hook while expected panics are being exercised.

use std::any::Any;
use std::panic::{self, UnwindSafe};

use eyre::{eyre, Result};

/// Run `f`, converting any panic into an error carrying the panic message.
pub fn catch_panics<T>(f: impl FnOnce() -> T + UnwindSafe) -> Result<T> {
    match panic::catch_unwind(f) {
        Ok(value) => Ok(value),
        Err(payload) => Err(eyre!("caught panic: {}", panic_message(payload.as_ref()))),
    }
}

/// Best-effort extraction of a panic payload's message.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Suppress the default panic hook until the guard drops, restoring the
/// previous hook afterwards. The hook is process-global; tests holding a
/// guard should not overlap with tests that rely on panic output.
pub fn quiet_panics() -> PanicHookGuard {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    PanicHookGuard {
        previous: Some(previous),
    }
}

pub struct PanicHookGuard {
    previous: Option<Box<dyn Fn(&panic::PanicHookInfo<'_>) + Sync + Send>>,
}

impl Drop for PanicHookGuard {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            let _ = panic::take_hook();
            panic::set_hook(previous);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catch_panics_passes_through_ok() {
        let result = catch_panics(|| 41 + 1);
        assert_eq!(result.unwrap(), 42);
    }

    #[test]
    fn test_catch_panics_captures_str_message() {
        let result: Result<()> = catch_panics(|| panic!("boom"));
        assert!(result.unwrap_err().to_string().contains("boom"));
    }

    #[test]
    fn test_catch_panics_captures_formatted_message() {
        let code = 7;
        let result: Result<()> = catch_panics(move || panic!("failed with code {}", code));
        assert!(result.unwrap_err().to_string().contains("failed with code 7"));
    }

    #[test]
    fn test_catch_panics_captures_assertion_failure() {
        let result: Result<()> = catch_panics(|| assert_eq!(1, 2, "values must match"));
        assert!(result.unwrap_err().to_string().contains("values must match"));
    }

    #[test]
    fn test_quiet_panics_guard_restores_hook() {
        {
            let _guard = quiet_panics();
            let result: Result<()> = catch_panics(|| panic!("silenced"));
            assert!(result.is_err());
        }
        // Guard dropped; panics still propagate normally.
        let result: Result<()> = catch_panics(|| panic!("audible"));
        assert!(result.unwrap_err().to_string().contains("audible"));
    }
}
