// Licensed under the Apache-2.0 license

use regbind_runtime::desc::{
    AccessMode, ArrayInfo, BlockInfo, EnumInfo, FieldInfo, MemoryInfo, RegisterInfo, SocInfo,
};
use regbind_runtime::{AccessError, Master, MockMaster, Registry, Soc};

static CTRL: RegisterInfo = RegisterInfo {
    name: "CTRL",
    path: "uart.CTRL",
    parent: "uart",
    address: 0x1000,
    offset: 0x1000,
    width: 8,
    access: AccessMode::RW,
    volatile: false,
    reset: Some(0x03),
    fields: &[
        FieldInfo {
            name: "WLS",
            lsb: 0,
            width: 2,
            access: AccessMode::RW,
            reset: Some(0x3),
            enums: &[],
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

static STATUS: RegisterInfo = RegisterInfo {
    name: "STATUS",
    path: "uart.STATUS",
    parent: "uart",
    address: 0x1004,
    offset: 0x1004,
    width: 32,
    access: AccessMode::RO,
    volatile: true,
    reset: Some(0),
    fields: &[FieldInfo {
        name: "BUSY",
        lsb: 0,
        width: 1,
        access: AccessMode::RO,
        reset: None,
        enums: &[],
    }],
    array: None,
};

static IRQ: RegisterInfo = RegisterInfo {
    name: "IRQ",
    path: "uart.IRQ",
    parent: "uart",
    address: 0x1008,
    offset: 0x1008,
    width: 32,
    access: AccessMode::W1C,
    volatile: true,
    reset: None,
    fields: &[],
    array: None,
};

static FIFO: RegisterInfo = RegisterInfo {
    name: "FIFO",
    path: "uart.FIFO",
    parent: "uart",
    address: 0x1100,
    offset: 0x1100,
    width: 16,
    access: AccessMode::RW,
    volatile: false,
    reset: Some(0xaa),
    fields: &[],
    array: Some(ArrayInfo {
        dimensions: &[4],
        count: 4,
        stride: 4,
    }),
};

/// 12-bit line control register with enumerated and flag fields.
static LCR: RegisterInfo = RegisterInfo {
    name: "LCR",
    path: "uart.LCR",
    parent: "uart",
    address: 0x1010,
    offset: 0x1010,
    width: 12,
    access: AccessMode::RW,
    volatile: false,
    reset: None,
    fields: &[
        FieldInfo {
            name: "PARITY",
            lsb: 0,
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
            name: "EVENTS",
            lsb: 4,
            width: 3,
            access: AccessMode::RW,
            reset: Some(0),
            enums: &[
                EnumInfo { name: "TX", value: 1 },
                EnumInfo { name: "RX", value: 2 },
                EnumInfo { name: "ERR", value: 4 },
            ],
        },
        FieldInfo {
            name: "LOCKED",
            lsb: 8,
            width: 1,
            access: AccessMode::RO,
            reset: None,
            enums: &[],
        },
    ],
    array: None,
};

static CHAN_CFG: RegisterInfo = RegisterInfo {
    name: "CFG",
    path: "uart.chan.CFG",
    parent: "uart.chan",
    address: 0x2000,
    offset: 0x0,
    width: 32,
    access: AccessMode::RW,
    volatile: false,
    reset: None,
    fields: &[],
    array: None,
};

static CHAN: BlockInfo = BlockInfo {
    name: "chan",
    path: "uart.chan",
    parent: Some("uart"),
    address: 0x2000,
    registers: &[&CHAN_CFG],
    blocks: &[],
    memories: &[],
    array: Some(ArrayInfo {
        dimensions: &[2],
        count: 2,
        stride: 0x10,
    }),
};

static SRAM: MemoryInfo = MemoryInfo {
    name: "sram",
    path: "uart.sram",
    parent: "uart",
    address: 0x8000,
    entries: 16,
    entry_width: 32,
    entry: None,
};

static PIXELS: MemoryInfo = MemoryInfo {
    name: "pixels",
    path: "uart.pixels",
    parent: "uart",
    address: 0x9000,
    entries: 8,
    entry_width: 24,
    entry: None,
};

static UART: BlockInfo = BlockInfo {
    name: "uart",
    path: "uart",
    parent: None,
    address: 0,
    registers: &[&CTRL, &STATUS, &IRQ, &FIFO, &LCR],
    blocks: &[&CHAN],
    memories: &[&SRAM, &PIXELS],
    array: None,
};

static SOC: SocInfo = SocInfo {
    name: "uart",
    namespace: "uart",
    word_bytes: 4,
    little_endian: true,
    access_checks: true,
    top: &UART,
};

fn soc() -> Soc<MockMaster> {
    let mut registry = Registry::new(&SOC);
    for reg in [&CTRL, &STATUS, &IRQ, &FIFO, &LCR, &CHAN_CFG] {
        registry.add_register(reg);
    }
    registry.add_block(&CHAN);
    registry.add_memory(&SRAM);
    registry.add_memory(&PIXELS);
    Soc::new(MockMaster::new(), registry)
}

#[test]
fn test_ctrl_write_read() -> anyhow::Result<()> {
    let mut soc = soc();
    let mut ctrl = soc.reg("uart.CTRL")?;
    ctrl.write(0x81u64)?;
    let value = ctrl.read()?;
    assert_eq!(value.value(), 0x81);
    assert_eq!(value.get_field("DLAB")?, 1u64);
    assert_eq!(value.get_field("WLS")?, 1u64);
    Ok(())
}

#[test]
fn test_write_masks_to_register_width() -> anyhow::Result<()> {
    let mut soc = soc();
    soc.reg("CTRL")?.write(0x1ffu64)?;
    assert_eq!(soc.master_mut().read(0x1000, 1)?, 0xff);
    Ok(())
}

#[test]
fn test_field_value_write_preserves_other_bits() -> anyhow::Result<()> {
    let mut soc = soc();
    let mut ctrl = soc.reg("CTRL")?;
    ctrl.write(0x81u64)?;
    let dlab = ctrl.read_field("DLAB")?;
    ctrl.write(dlab.with_value(0))?;
    assert_eq!(ctrl.read()?.value(), 0x01);

    // Arithmetic on a field gives a plain integer, written as a whole register.
    let wls = ctrl.read_field("WLS")?;
    ctrl.write(wls + 1u64)?;
    assert_eq!(ctrl.read()?.value(), 0x02);
    Ok(())
}

#[test]
fn test_write_field_by_name() -> anyhow::Result<()> {
    let mut soc = soc();
    let mut ctrl = soc.reg("CTRL")?;
    ctrl.write(0x01u64)?;
    ctrl.write_field("DLAB", 1)?;
    assert_eq!(ctrl.read()?.value(), 0x81);
    assert!(matches!(
        ctrl.write_field("NOPE", 1),
        Err(AccessError::UnknownField { .. })
    ));
    Ok(())
}

#[test]
fn test_access_policy() -> anyhow::Result<()> {
    let mut soc = soc();
    assert!(matches!(
        soc.reg("STATUS")?.write(1u64),
        Err(AccessError::AccessPolicy {
            mode: AccessMode::RO,
            ..
        })
    ));
    assert!(matches!(
        soc.reg("STATUS")?.write_field("BUSY", 1),
        Err(AccessError::AccessPolicy { .. })
    ));

    // Without checks the write goes through combine(): read-only keeps the
    // existing value, which is not read for non-RW modes.
    let mut soc = soc.with_access_checks(false);
    soc.reg("STATUS")?.write(0x55u64)?;
    assert_eq!(soc.master_mut().read(0x1004, 4)?, 0);
    Ok(())
}

#[test]
fn test_w1c_passes_through() -> anyhow::Result<()> {
    let mut soc = soc();
    soc.master_mut().write(0x1008, 0xff, 4)?;
    soc.reg("IRQ")?.write(0x4u64)?;
    assert_eq!(soc.master_mut().read(0x1008, 4)?, 0x4);
    Ok(())
}

#[test]
fn test_unknown_member() {
    let mut soc = soc();
    match soc.reg("uart.NOPE") {
        Err(AccessError::UnknownMember(name)) => assert_eq!(name, "uart.NOPE"),
        Err(e) => panic!("unexpected error {e}"),
        Ok(_) => panic!("lookup should fail"),
    }
    assert!(soc.memory("nope").is_err());
}

#[test]
fn test_register_array() -> anyhow::Result<()> {
    let mut soc = soc();
    let mut fifo = soc.reg("FIFO")?.element(3)?;
    assert_eq!(fifo.address(), 0x110c);
    fifo.write(0x1234u64)?;
    assert_eq!(soc.master_mut().read(0x110c, 2)?, 0x1234);
    assert!(matches!(
        soc.reg("FIFO")?.element(4),
        Err(AccessError::IndexOutOfRange { count: 4, .. })
    ));
    Ok(())
}

#[test]
fn test_block_array() -> anyhow::Result<()> {
    let mut soc = soc();
    let mut cfg = soc.array_reg("chan", 1, "CFG")?;
    assert_eq!(cfg.address(), 0x2010);
    cfg.write(7u64)?;
    assert_eq!(soc.master_mut().read(0x2010, 4)?, 7);
    assert!(soc.array_reg("chan", 2, "CFG").is_err());
    assert!(soc.array_reg("chan", 0, "LEN").is_err());
    Ok(())
}

#[test]
fn test_memory() -> anyhow::Result<()> {
    let mut soc = soc();
    let mut sram = soc.memory("sram")?;
    assert_eq!(sram.info().extent(), 64);
    sram.write_entry(3, 0xdead_beef)?;
    assert_eq!(sram.read_entry(3)?, 0xdead_beef);
    assert!(matches!(
        sram.read_entry(16),
        Err(AccessError::IndexOutOfRange { .. })
    ));
    assert_eq!(soc.master_mut().read(0x800c, 4)?, 0xdead_beef);
    Ok(())
}

#[test]
fn test_reset_to_defaults() -> anyhow::Result<()> {
    let mut soc = soc();
    // CTRL plus four FIFO elements; STATUS is read-only.
    assert_eq!(soc.reset_to_defaults()?, 5);
    assert_eq!(soc.reg("CTRL")?.read()?.value(), 0x03);
    assert_eq!(soc.master_mut().read(0x1104, 2)?, 0xaa);
    Ok(())
}

#[test]
fn test_memory_entries_do_not_overlap() -> anyhow::Result<()> {
    let mut soc = soc();
    let mut pixels = soc.memory("pixels")?;
    assert_eq!(pixels.info().entry_bytes(), 4);
    assert_eq!(pixels.info().extent(), 32);
    pixels.write_entry(0, 0xff_ffff)?;
    pixels.write_entry(1, 0x12_3456)?;
    assert_eq!(pixels.read_entry(0)?, 0xff_ffff);
    assert_eq!(pixels.read_entry(1)?, 0x12_3456);
    assert_eq!(soc.master_mut().read(0x9004, 4)?, 0x12_3456);
    Ok(())
}

#[test]
fn test_read_masks_to_bit_width() -> anyhow::Result<()> {
    let mut soc = soc();
    soc.master_mut().write(0x1010, 0xf0a2, 2)?;
    let lcr = soc.reg("LCR")?.read()?;
    assert_eq!(lcr.value(), 0x0a2);
    assert_eq!(lcr.width(), 12);
    Ok(())
}

#[test]
fn test_field_value_from_other_register_is_rejected() -> anyhow::Result<()> {
    let mut soc = soc();
    let dlab = soc.reg("CTRL")?.read_field("DLAB")?;
    match soc.reg("LCR")?.write(dlab.with_value(1)) {
        Err(AccessError::FieldMismatch {
            address,
            field_address,
            ..
        }) => {
            assert_eq!(address, 0x1010);
            assert_eq!(field_address, 0x1000);
        }
        other => panic!("unexpected {other:?}"),
    }

    // The same field from another element of an array is also foreign.
    let first = soc.reg("FIFO")?.read()?;
    let raw = regbind_runtime::FieldValue::new(1, 0, 4, first.offset());
    assert!(matches!(
        soc.reg("FIFO")?.element(2)?.write(raw),
        Err(AccessError::FieldMismatch { .. })
    ));
    assert_eq!(soc.master_mut().read(0x1010, 2)?, 0);
    Ok(())
}

#[test]
fn test_field_value_write_checks_field_access() -> anyhow::Result<()> {
    let mut soc = soc();
    soc.master_mut().write(0x1010, 0x100, 2)?;
    let mut lcr = soc.reg("LCR")?;
    let locked = lcr.read_field("LOCKED")?;
    assert!(matches!(
        lcr.write(locked.with_value(0)),
        Err(AccessError::AccessPolicy {
            mode: AccessMode::RO,
            ..
        })
    ));
    let parity = lcr.read_field("PARITY")?;
    lcr.write(parity.with_value(2))?;
    assert_eq!(lcr.read()?.value(), 0x102);
    Ok(())
}

#[test]
fn test_set_and_clear_bits() -> anyhow::Result<()> {
    let mut soc = soc();
    let mut ctrl = soc.reg("CTRL")?;
    ctrl.write(0x01u64)?;
    ctrl.set_bits(0x180)?;
    assert_eq!(ctrl.read()?.value(), 0x81);
    ctrl.clear_bits(0x01)?;
    assert_eq!(ctrl.read()?.value(), 0x80);
    assert!(matches!(
        soc.reg("STATUS")?.set_bits(1),
        Err(AccessError::AccessPolicy { .. })
    ));
    Ok(())
}

#[test]
fn test_modify_several_fields() -> anyhow::Result<()> {
    let mut soc = soc();
    let mut lcr = soc.reg("LCR")?;
    lcr.write(0x100u64)?;
    lcr.modify(&[("PARITY", 1), ("EVENTS", 0b110)])?;
    assert_eq!(lcr.read()?.value(), 0x161);

    // One bad name leaves the register untouched.
    assert!(matches!(
        lcr.modify(&[("PARITY", 2), ("NOPE", 1)]),
        Err(AccessError::UnknownField { .. })
    ));
    assert!(matches!(
        lcr.modify(&[("PARITY", 2), ("LOCKED", 0)]),
        Err(AccessError::AccessPolicy { .. })
    ));
    assert_eq!(lcr.read()?.value(), 0x161);
    Ok(())
}

#[test]
fn test_enum_and_flag_fields() -> anyhow::Result<()> {
    let mut soc = soc();
    let mut lcr = soc.reg("LCR")?;
    lcr.write_field_enum("PARITY", "EVEN")?;
    lcr.write_field_flags("EVENTS", &["TX", "ERR"])?;
    let value = lcr.read()?;
    assert_eq!(value.value(), 0x52);
    let parity = value.get_field("PARITY")?;
    assert_eq!(parity.enum_name(), Some("EVEN"));
    assert!(parity.is("EVEN"));
    let events = value.get_field("EVENTS")?;
    assert_eq!(events.flags().collect::<Vec<_>>(), vec!["TX", "ERR"]);
    assert!(!events.has_flag("RX"));

    // Writing a decoded field back with another enumerator.
    lcr.write(parity.with_enum("ODD").unwrap())?;
    assert_eq!(lcr.read()?.get_field("PARITY")?.enum_name(), Some("ODD"));

    match lcr.write_field_enum("PARITY", "MARK") {
        Err(AccessError::UnknownEnum { field, name }) => {
            assert_eq!(field, "uart.LCR.PARITY");
            assert_eq!(name, "MARK");
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(lcr.write_field_flags("EVENTS", &["TX", "BREAK"]).is_err());
    assert_eq!(lcr.read()?.value(), 0x51);
    Ok(())
}

#[test]
fn test_batch_writes_once() -> anyhow::Result<()> {
    let mut soc = soc();
    soc.reg("LCR")?.write(0x100u64)?;
    let mut lcr = soc.reg("LCR")?;
    let parity = lcr.batch(|r| {
        r.write_field("PARITY", 1)?;
        r.write_field_enum("EVENTS", "RX")?;
        r.set_bits(0x800);
        assert_eq!(r.read().value(), 0x921);
        r.read_field("PARITY")
    })?;
    assert_eq!(parity, 1u64);
    assert_eq!(soc.master_mut().read(0x1010, 2)?, 0x921);
    Ok(())
}

#[test]
fn test_batch_leaves_hardware_alone_until_done() -> anyhow::Result<()> {
    let mut soc = soc();
    soc.reg("CTRL")?.write(0x01u64)?;
    let mut writes = 0;
    soc.reg("CTRL")?.batch(|r| {
        r.write(0x15u64)?;
        writes += 1;
        assert_eq!(r.read().value(), 0x15);
        Ok(())
    })?;
    assert_eq!(writes, 1);
    assert_eq!(soc.master_mut().read(0x1000, 1)?, 0x15);

    // An error inside the batch discards the cached value.
    let result = soc.reg("CTRL")?.batch(|r| {
        r.write(0x7fu64)?;
        r.write_field("NOPE", 1)
    });
    assert!(matches!(result, Err(AccessError::UnknownField { .. })));
    assert_eq!(soc.master_mut().read(0x1000, 1)?, 0x15);

    // A read-only register fails before the closure runs.
    assert!(matches!(
        soc.reg("STATUS")?.batch(|_| Ok(())),
        Err(AccessError::AccessPolicy { .. })
    ));
    Ok(())
}

#[test]
fn test_batch_on_w1c_starts_from_zero() -> anyhow::Result<()> {
    let mut soc = soc();
    soc.master_mut().write(0x1008, 0xff, 4)?;
    soc.reg("IRQ")?.batch(|r| {
        assert_eq!(r.read().value(), 0);
        r.set_bits(0x4);
        Ok(())
    })?;
    assert_eq!(soc.master_mut().read(0x1008, 4)?, 0x4);
    Ok(())
}
