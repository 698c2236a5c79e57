// Licensed under the Apache-2.0 license
//
// Generated by regbind-generator. Do not edit.

#![allow(dead_code, unused_imports)]

use regbind_runtime::desc::{
    AccessMode, ArrayInfo, BlockInfo, EnumInfo, FieldInfo, MemoryInfo, RegisterInfo, SocInfo,
};

pub const SOC_NAME: &str = "uart";

pub static CTRL: RegisterInfo = RegisterInfo {
    name: "CTRL",
    path: "uart.CTRL",
    parent: "uart",
    address: 0,
    offset: 0,
    width: 8,
    access: AccessMode::RW,
    volatile: false,
    reset: Some(3),
    fields: &[
        FieldInfo {
            name: "WLS",
            lsb: 0,
            width: 2,
            access: AccessMode::RW,
            reset: Some(3),
            enums: &[],
        },
        FieldInfo {
            name: "PARITY",
            lsb: 3,
            width: 2,
            access: AccessMode::RW,
            reset: Some(0),
            enums: &[
                EnumInfo { name: "NONE", value: 0 },
                EnumInfo { name: "ODD", value: 1 },
                EnumInfo { name: "EVEN", value: 2 },
            ],
        },
        FieldInfo {
            name: "DLAB",
            lsb: 7,
            width: 1,
            access: AccessMode::RW,
            reset: Some(0),
            enums: &[],
        },
    ],
    array: None,
};

pub static STATUS: RegisterInfo = RegisterInfo {
    name: "STATUS",
    path: "uart.STATUS",
    parent: "uart",
    address: 4,
    offset: 4,
    width: 32,
    access: AccessMode::RO,
    volatile: false,
    reset: Some(0),
    fields: &[],
    array: None,
};

pub static FIFO: RegisterInfo = RegisterInfo {
    name: "FIFO",
    path: "uart.FIFO",
    parent: "uart",
    address: 0x10,
    offset: 0x10,
    width: 16,
    access: AccessMode::RW,
    volatile: false,
    reset: Some(0xaa),
    fields: &[],
    array: Some(ArrayInfo { dimensions: &[4], count: 4, stride: 4 }),
};

pub static CHAN_CFG: RegisterInfo = RegisterInfo {
    name: "CFG",
    path: "uart.chan.CFG",
    parent: "uart.chan",
    address: 0x100,
    offset: 0,
    width: 32,
    access: AccessMode::RW,
    volatile: false,
    reset: Some(1),
    fields: &[],
    array: None,
};

pub static CHAN_LEN: RegisterInfo = RegisterInfo {
    name: "LEN",
    path: "uart.chan.LEN",
    parent: "uart.chan",
    address: 0x104,
    offset: 4,
    width: 32,
    access: AccessMode::RW,
    volatile: false,
    reset: None,
    fields: &[],
    array: None,
};

pub static SRAM: MemoryInfo = MemoryInfo {
    name: "sram",
    path: "uart.sram",
    parent: "uart",
    address: 0x1000,
    entries: 0x10,
    entry_width: 32,
    entry: None,
};

pub static UART: BlockInfo = BlockInfo {
    name: "uart",
    path: "uart",
    parent: None,
    address: 0,
    registers: &[&CTRL, &STATUS, &FIFO],
    blocks: &[&CHAN],
    memories: &[&SRAM],
    array: None,
};

pub static CHAN: BlockInfo = BlockInfo {
    name: "chan",
    path: "uart.chan",
    parent: Some("uart"),
    address: 0x100,
    registers: &[&CHAN_CFG, &CHAN_LEN],
    blocks: &[],
    memories: &[],
    array: Some(ArrayInfo { dimensions: &[2], count: 2, stride: 0x10 }),
};

pub static SOC: SocInfo = SocInfo {
    name: SOC_NAME,
    namespace: "uart",
    word_bytes: 4,
    little_endian: true,
    access_checks: true,
    top: &UART,
};
