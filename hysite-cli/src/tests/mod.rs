//! Shared test harness modules for the `hysite` CLI.
#![expect(
    clippy::panic,
    reason = "Tests assert panic branches to surface unexpected CLI outcomes"
)]

use super::*;

mod analyse_unit;
mod compare_unit;
mod helpers;
