// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

/// Asserts that a statement panics.
///
/// With a second argument, also asserts that the panic message contains the given text and
/// evaluates to the panic payload.
///
/// ```ignore
/// assert_panic!(reader.advance(1));
/// assert_panic!(reader.advance(1), "past the end");
/// ```
// We assert unwind safety here because the topic is too much hassle to worry about and since
// #[should_panic] does not require us to worry about it, we are not going to worry about it here.
#[macro_export]
macro_rules! assert_panic {
    ($stmt:stmt$(,)?) => {
        #[allow(clippy::multi_assignments, reason = "macro untidiness")]
        #[expect(clippy::allow_attributes, reason = "macro untidiness")]
        ::std::panic::catch_unwind(::std::panic::AssertUnwindSafe(|| -> () { _ = { $stmt } }))
            .expect_err("assert_panic! argument did not panic")
    };
    ($stmt:stmt, $expected:expr$(,)?) => {{
        #[allow(clippy::multi_assignments, reason = "macro untidiness")]
        #[expect(clippy::allow_attributes, reason = "macro untidiness")]
        let payload = ::std::panic::catch_unwind(::std::panic::AssertUnwindSafe(|| -> () { _ = { $stmt } }))
            .expect_err("assert_panic! argument did not panic");

        let message = $crate::panic_message(payload.as_ref());

        assert!(
            message.contains($expected),
            "panic message '{message}' does not contain '{}'",
            $expected
        );

        payload
    }};
}

/// Extracts the message of a panic payload, or an empty string if it carries none.
#[must_use]
pub fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        ""
    }
}
