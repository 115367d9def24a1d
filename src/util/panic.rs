use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Runs `run` and returns the message it panicked with, or [`None`] if it returned normally.
/// Payloads that aren't strings produce an empty message.
pub(crate) fn panic_message<R>(run: impl FnOnce() -> R) -> Option<String> {
    let payload = panic::catch_unwind(AssertUnwindSafe(run)).err()?;
    Some(payload_text(payload))
}

fn payload_text(payload: Box<dyn Any + Send>) -> String {
    match payload.downcast::<String>() {
        Ok(text) => *text,
        Err(payload) => payload
            .downcast_ref::<&str>()
            .map(|text| text.to_string())
            .unwrap_or_default(),
    }
}

/// Asserts that a block panics. With `message = ..`, the panic's message must also match the
/// [`Display`](std::fmt::Display) output of the given value.
macro_rules! assert_panics {
    ($run:block) => {
        assert_panics!($run, "Expected the block to panic.")
    };
    ($run:block, message = $expected:expr) => {
        assert_eq!(
            $crate::util::panic::panic_message(|| $run),
            Some(($expected).to_string()),
            "The block should panic with the expected message."
        )
    };
    ($run:block, $msg:literal) => {
        assert!($crate::util::panic::panic_message(|| $run).is_some(), $msg)
    };
}

pub(crate) use assert_panics;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_message() {
        assert_eq!(panic_message(|| 5), None);
        assert_eq!(panic_message(|| panic!("static")).as_deref(), Some("static"));
        assert_eq!(panic_message(|| panic!("formatted {}", 5)).as_deref(), Some("formatted 5"));
        assert_eq!(
            panic_message(|| std::panic::panic_any(5_u8)).as_deref(),
            Some("")
        );

        assert_panics!({ panic!("any") });
        assert_panics!({ panic!("Index {} out of bounds", 3) }, message = "Index 3 out of bounds");
    }
}
