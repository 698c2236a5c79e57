// Licensed under the Apache-2.0 license
//
// Generated by regbind-generator. Do not edit.

pub mod uart_descriptors;
pub mod uart_bindings;
pub mod masters;
