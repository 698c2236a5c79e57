// Licensed under the Apache-2.0 license
//
// Generated by regbind-generator. Do not edit.

pub mod openocd_master;
pub mod ssh_devmem_master;
