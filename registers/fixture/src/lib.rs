// Licensed under the Apache-2.0 license

//! Checked-in output of regbind-generator for `design/uart.json`, one
//! module per binding layout:
//!
//! - `single`: one bindings unit plus the example masters.
//! - `count`: bindings split into chunks of two registers.
//! - `hierarchy`: bindings split per sub-block.
//!
//! `tests/fresh.rs` fails when the generator output drifts from these
//! files. Run it with `REGBIND_BLESS=1` to rewrite them.

pub mod count;
pub mod hierarchy;
pub mod single;
