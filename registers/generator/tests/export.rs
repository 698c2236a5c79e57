// Licensed under the Apache-2.0 license

use log::LevelFilter;
use regbind_builder::NodeTree;
use regbind_generator::{export, ExportConfig, ExportError};
use regbind_model::ConfigurationError;
use simple_logger::SimpleLogger;
use std::fs;
use std::path::Path;

const DESIGN: &str = r#"
{ "type": "addrmap", "name": "uart", "children": [
    { "type": "reg", "name": "CTRL", "offset": 4096, "width": 8, "children": [
        { "type": "field", "name": "WLS", "lsb": 0, "width": 2, "reset": 3 },
        { "type": "field", "name": "DLAB", "lsb": 7, "width": 1, "reset": 0 }
    ] },
    { "type": "reg", "name": "STATUS", "offset": 4100, "access": "ro" },
    { "type": "regfile", "name": "chan", "offset": 8192, "dimensions": [4], "stride": 16, "children": [
        { "type": "reg", "name": "CFG", "offset": 0 },
        { "type": "reg", "name": "LEN", "offset": 4 }
    ] },
    { "type": "mem", "name": "sram", "offset": 32768, "entries": 256, "memwidth": 32 }
] }
"#;

const CONFIG: &str = r#"
top = "uart"
soc_name = "uart"

[options]
emit_stubs = true
emit_examples = true
emit_reset_helper = true

[generator]
split_bindings = 2
emit_ir_json = true
"#;

fn init_logger() {
    let _ = SimpleLogger::new().with_level(LevelFilter::Debug).init();
}

fn listing(dir: &Path) -> Vec<String> {
    let mut names = vec![];
    for entry in walk(dir) {
        names.push(
            entry
                .strip_prefix(dir)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/"),
        );
    }
    names.sort();
    names
}

fn walk(dir: &Path) -> Vec<std::path::PathBuf> {
    let mut out = vec![];
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            out.extend(walk(&path));
        } else {
            out.push(path);
        }
    }
    out
}

#[test]
fn test_export_from_toml() -> anyhow::Result<()> {
    init_logger();
    let dir = tempfile::tempdir()?;
    let config_path = dir.path().join("uart.toml");
    fs::write(&config_path, CONFIG)?;
    let config = ExportConfig::from_file(&config_path)?;
    let out = dir.path().join("generated");

    let tree = NodeTree::from_json(DESIGN)?;
    let written = export(&tree, &config, &out)?;
    assert_eq!(written.len(), listing(&out).len());
    assert_eq!(
        listing(&out),
        vec![
            "masters/mod.rs",
            "masters/openocd_master.rs",
            "masters/ssh_devmem_master.rs",
            "mod.rs",
            "uart.h",
            "uart_bindings.rs",
            "uart_bindings_0.rs",
            "uart_bindings_1.rs",
            "uart_descriptors.rs",
            "uart_ir.json",
            "uart_sources.toml",
        ]
    );

    let coordinator = fs::read_to_string(out.join("uart_bindings.rs"))?;
    assert!(coordinator.contains("    registry.add_block(&desc::CHAN);\n"));
    assert!(coordinator.contains("    registry.add_memory(&desc::SRAM);\n"));
    assert!(coordinator.contains("    bind_chunk_0(registry);\n    bind_chunk_1(registry);\n"));
    assert!(coordinator.contains("    ctrl(soc).write(3_u64)?;\n"));

    let descriptors = fs::read_to_string(out.join("uart_descriptors.rs"))?;
    assert!(descriptors.contains("Some(ArrayInfo { dimensions: &[4], count: 4, stride: 0x10 })"));
    assert!(descriptors.contains("    registers: &[&CHAN_CFG, &CHAN_LEN],\n"));

    let sources = fs::read_to_string(out.join("uart_sources.toml"))?;
    assert!(sources.contains("path = \"uart_bindings_1.rs\""));
    Ok(())
}

#[test]
fn test_configuration_error_writes_nothing() -> anyhow::Result<()> {
    init_logger();
    let dir = tempfile::tempdir()?;
    let tree = NodeTree::from_json(DESIGN)?;

    let err = export(&tree, &ExportConfig::new("missing", "uart"), dir.path()).unwrap_err();
    assert!(matches!(
        err,
        ExportError::Configuration(ConfigurationError::MissingTop(ref top)) if top == "missing"
    ));
    let err = export(&tree, &ExportConfig::new("uart", ""), dir.path()).unwrap_err();
    assert!(matches!(
        err,
        ExportError::Configuration(ConfigurationError::EmptySocName)
    ));
    assert!(listing(dir.path()).is_empty());
    Ok(())
}

#[test]
fn test_reexport_replaces_files() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let tree = NodeTree::from_json(DESIGN)?;
    let config = ExportConfig::new("uart", "uart");
    export(&tree, &config, dir.path())?;
    let first = fs::read_to_string(dir.path().join("uart_bindings.rs"))?;
    export(&tree, &config, dir.path())?;
    let second = fs::read_to_string(dir.path().join("uart_bindings.rs"))?;
    assert_eq!(first, second);
    assert!(!listing(dir.path()).iter().any(|p| p.ends_with(".tmp")));
    Ok(())
}
