// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! An unpublished crate containing testing utilities for use within this repo.

use std::env;

mod log;
mod macros;
mod segments;

pub use log::*;
pub use macros::panic_message;
pub use segments::*;

#[must_use]
pub fn is_mutation_testing() -> bool {
    env::var("MUTATION_TESTING").as_deref() == Ok("1")
}
