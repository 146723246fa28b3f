//! Shared test harness modules for the Yatra CLI.

use super::*;

mod helpers;
mod plan_unit;
mod steps;
