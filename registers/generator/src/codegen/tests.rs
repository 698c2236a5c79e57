// Licensed under the Apache-2.0 license

//! Tests for the code generator.

mod test {
    use super::super::{generate, Symbols};
    use crate::config::GeneratorConfig;
    use crate::split::BindingPlan;
    use regbind_builder::{DesignNode, ModelBuilder, NodeTree};
    use regbind_model::{GenerationOptions, SocDescriptor};

    fn uart_tree() -> NodeTree {
        NodeTree::new([DesignNode::addrmap("uart").children([
            DesignNode::reg("CTRL", 0x1000).width(8).children([
                DesignNode::field("WLS", 0, 2).reset(3),
                DesignNode::field("DLAB", 7, 1).reset(0),
            ]),
            DesignNode::reg("STATUS", 0x1004).access("r").reset(0),
            DesignNode::regfile("chan", 0x2000)
                .array(&[2], Some(0x10))
                .child(DesignNode::reg("CFG", 0x0)),
            DesignNode::mem("sram", 0x8000, 16, 32),
        ])])
    }

    fn uart(options: GenerationOptions) -> SocDescriptor {
        ModelBuilder::new(4, true)
            .options(options)
            .build(&uart_tree(), "uart", "uart", "")
            .unwrap()
    }

    fn flat(n: u64) -> SocDescriptor {
        let regs = (0..n).map(|i| DesignNode::reg(&format!("r{i}"), i * 4));
        let tree = NodeTree::new([DesignNode::addrmap("chip").children(regs)]);
        ModelBuilder::new(4, true).build(&tree, "chip", "chip", "").unwrap()
    }

    #[test]
    fn test_single_unit() {
        let units = generate(&uart(GenerationOptions::default()), &GeneratorConfig::default()).unwrap();
        let paths: Vec<String> = units.paths().map(|p| p.display().to_string()).collect();
        assert_eq!(
            paths,
            vec![
                "mod.rs",
                "uart_bindings.rs",
                "uart_descriptors.rs",
                "uart_sources.toml"
            ]
        );

        let bindings = units.get("uart_bindings.rs").unwrap();
        assert!(bindings.contains("use super::uart_descriptors as desc;"));
        assert!(bindings.contains("    registry.add_block(&desc::CHAN);\n"));
        assert!(bindings.contains("    registry.add_memory(&desc::SRAM);\n"));
        assert!(bindings.contains("    registry.add_register(&desc::CHAN_CFG);\n"));
        assert!(bindings.contains(
            "pub fn ctrl<M: Master>(soc: &mut Soc<M>) -> RegisterRef<'_, M> {\n    soc.register_for(&desc::CTRL)\n}"
        ));
        assert!(bindings.contains("pub fn chan_cfg<M: Master>"));
        assert!(!bindings.contains("reset_to_defaults"));
        assert!(!bindings.contains("AccessResult"));

        let module = units.get("mod.rs").unwrap();
        assert!(module.contains("pub mod uart_descriptors;\npub mod uart_bindings;\n"));
    }

    #[test]
    fn test_descriptors() {
        let units = generate(&uart(GenerationOptions::default()), &GeneratorConfig::default()).unwrap();
        let desc = units.get("uart_descriptors.rs").unwrap();
        assert!(desc.starts_with("// Licensed under the Apache-2.0 license\n"));
        assert!(desc.contains("pub const SOC_NAME: &str = \"uart\";"));
        assert!(desc.contains(
            "pub static CTRL: RegisterInfo = RegisterInfo {\n    name: \"CTRL\",\n    path: \"uart.CTRL\",\n    parent: \"uart\",\n    address: 0x1000,\n"
        ));
        assert!(desc.contains("    reset: Some(3),\n"));
        assert!(desc.contains("            name: \"DLAB\",\n            lsb: 7,\n            width: 1,\n"));
        assert!(desc.contains("    access: AccessMode::RO,\n"));
        assert!(desc.contains("    array: Some(ArrayInfo { dimensions: &[2], count: 2, stride: 0x10 }),\n"));
        assert!(desc.contains("    registers: &[&CTRL, &STATUS],\n"));
        assert!(desc.contains("    blocks: &[&CHAN],\n"));
        assert!(desc.contains("    memories: &[&SRAM],\n"));
        assert!(desc.contains("    parent: Some(\"uart\"),\n"));
        assert!(desc.contains("pub static SRAM: MemoryInfo = MemoryInfo {"));
        assert!(desc.contains("    entries: 0x10,\n    entry_width: 32,\n    entry: None,\n"));
        assert!(desc.contains("    top: &UART,\n"));
        assert!(desc.contains("    access_checks: false,\n"));
    }

    #[test]
    fn test_chunked_by_count() {
        let units = generate(&flat(10), &GeneratorConfig::default().split_bindings(5)).unwrap();
        let chunk0 = units.get("chip_bindings_0.rs").unwrap();
        let chunk1 = units.get("chip_bindings_1.rs").unwrap();
        assert!(!units.contains("chip_bindings_2.rs"));

        assert!(chunk0.contains("pub fn bind_chunk_0(registry: &mut Registry) {"));
        for i in 0..5 {
            assert!(chunk0.contains(&format!("registry.add_register(&desc::R{i});")));
            assert!(!chunk1.contains(&format!("registry.add_register(&desc::R{i});")));
        }
        for i in 5..10 {
            assert!(chunk1.contains(&format!("registry.add_register(&desc::R{i});")));
            assert!(!chunk0.contains(&format!("registry.add_register(&desc::R{i});")));
        }

        let coordinator = units.get("chip_bindings.rs").unwrap();
        assert_eq!(coordinator.matches("bind_chunk_").count(), 2);
        assert!(coordinator.contains("pub use super::chip_bindings_0::*;"));
        assert!(coordinator.contains("pub use super::chip_bindings_1::*;"));
        assert!(!coordinator.contains("add_register"));

        let module = units.get("mod.rs").unwrap();
        assert!(module.contains("pub mod chip_bindings_0;\npub mod chip_bindings_1;\n"));
    }

    #[test]
    fn test_no_split_below_threshold() {
        let units = generate(&flat(10), &GeneratorConfig::default().split_bindings(10)).unwrap();
        assert!(!units.contains("chip_bindings_0.rs"));
        let units = generate(&flat(10), &GeneratorConfig::default().split_bindings(0)).unwrap();
        assert!(!units.contains("chip_bindings_0.rs"));
        assert_eq!(units.get("chip_bindings.rs").unwrap().matches("add_register").count(), 10);
    }

    #[test]
    fn test_chunked_by_hierarchy() {
        let config = GeneratorConfig::default().split_by_hierarchy(true);
        let units = generate(&uart(GenerationOptions::default()), &config).unwrap();
        let top = units.get("uart_bindings_0.rs").unwrap();
        let chan = units.get("uart_bindings_1.rs").unwrap();
        assert!(top.contains("// Chunk 0: top_level, 2 registers."));
        assert!(top.contains("&desc::CTRL") && top.contains("&desc::STATUS"));
        assert!(chan.contains("// Chunk 1: uart.chan, 1 registers."));
        assert!(chan.contains("&desc::CHAN_CFG"));
        let coordinator = units.get("uart_bindings.rs").unwrap();
        assert!(coordinator.contains("    registry.add_block(&desc::CHAN);\n    registry.add_memory(&desc::SRAM);\n    bind_chunk_0(registry);\n    bind_chunk_1(registry);\n"));
    }

    #[test]
    fn test_deterministic() {
        for config in [
            GeneratorConfig::default(),
            GeneratorConfig::default().split_bindings(1),
            GeneratorConfig::default().split_by_hierarchy(true).emit_ir_json(true),
        ] {
            let options = GenerationOptions {
                emit_stubs: true,
                emit_examples: true,
                access_checks: true,
                emit_reset_helper: true,
            };
            let a = generate(&uart(options.clone()), &config).unwrap();
            let b = generate(&uart(options), &config).unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_optional_units() {
        let options = GenerationOptions {
            emit_stubs: true,
            emit_examples: true,
            access_checks: true,
            emit_reset_helper: false,
        };
        let config = GeneratorConfig::default().emit_ir_json(true);
        let units = generate(&uart(options), &config).unwrap();

        let header = units.get("uart.h").unwrap();
        assert!(header.contains("#ifndef UART_REGS_H"));
        assert!(header.contains("#define UART_CTRL_ADDR 0x1000ull"));
        assert!(header.contains("#define UART_CTRL_DLAB_SHIFT 7u"));
        assert!(header.contains("#define UART_CTRL_DLAB_MASK 0x80ull"));
        assert!(header.contains("#define UART_CHAN_CFG_ADDR 0x2000ull"));
        assert!(header.contains("#define UART_SRAM_SIZE 0x40ull"));

        let openocd = units.get("masters/openocd_master.rs").unwrap();
        assert!(openocd.contains("use super::super::uart_bindings as bindings;"));
        assert!(openocd.contains("OpenOcdMaster::connect(host, port)?"));
        let ssh = units.get("masters/ssh_devmem_master.rs").unwrap();
        assert!(ssh.contains("master.test_connection()?;"));
        assert!(units.get("masters/mod.rs").unwrap().contains("pub mod ssh_devmem_master;"));
        assert!(units.get("mod.rs").unwrap().contains("pub mod masters;"));

        let ir: serde_json::Value = serde_json::from_str(units.get("uart_ir.json").unwrap()).unwrap();
        assert_eq!(ir["name"], "uart");
        assert_eq!(ir["top"]["registers"][0]["name"], "CTRL");

        let desc = units.get("uart_descriptors.rs").unwrap();
        assert!(desc.contains("    access_checks: true,\n"));
    }

    #[test]
    fn test_reset_helper() {
        let options = GenerationOptions {
            emit_reset_helper: true,
            ..Default::default()
        };
        let units = generate(&uart(options), &GeneratorConfig::default()).unwrap();
        let bindings = units.get("uart_bindings.rs").unwrap();
        assert!(bindings.contains("use regbind_runtime::{AccessResult, Master, RegisterRef, Registry, Soc};"));
        assert!(bindings.contains(
            "pub fn reset_to_defaults<M: Master>(soc: &mut Soc<M>) -> AccessResult<()> {\n    ctrl(soc).write(3_u64)?;\n    Ok(())\n}"
        ));
    }

    #[test]
    fn test_sources_manifest() {
        let units = generate(&flat(4), &GeneratorConfig::default().split_bindings(2)).unwrap();
        let sources: toml::Value = toml::from_str(units.get("chip_sources.toml").unwrap()).unwrap();
        assert_eq!(sources["soc"].as_str(), Some("chip"));
        let listed: Vec<(&str, &str)> = sources["units"]
            .as_array()
            .unwrap()
            .iter()
            .map(|u| (u["path"].as_str().unwrap(), u["kind"].as_str().unwrap()))
            .collect();
        assert_eq!(
            listed,
            vec![
                ("chip_bindings.rs", "bindings"),
                ("chip_bindings_0.rs", "chunk"),
                ("chip_bindings_1.rs", "chunk"),
                ("chip_descriptors.rs", "descriptors"),
                ("mod.rs", "module"),
            ]
        );
    }

    #[test]
    fn test_identifier_collisions() {
        let tree = NodeTree::new([DesignNode::addrmap("chip").children([
            DesignNode::reg("A_B", 0x0),
            DesignNode::reg("type", 0x4),
            DesignNode::reg("bind", 0x8),
            DesignNode::regfile("a", 0x100).child(DesignNode::reg("b", 0x0)),
        ])]);
        let soc = ModelBuilder::new(4, true).build(&tree, "chip", "chip", "").unwrap();
        let symbols = Symbols::new(&soc, &BindingPlan::Single(soc.flatten_registers()));
        let by_path = |path: &str| soc.registers.iter().position(|r| r.path == path).unwrap();

        assert_eq!(symbols.registers[by_path("chip.A_B")], "A_B");
        assert_eq!(symbols.registers[by_path("chip.a.b")], "A_B_1");
        assert_eq!(symbols.accessors[by_path("chip.A_B")], "a_b");
        assert_eq!(symbols.accessors[by_path("chip.a.b")], "a_b_1");
        assert_eq!(symbols.accessors[by_path("chip.type")], "type_");
        assert_eq!(symbols.accessors[by_path("chip.bind")], "bind_1");
        assert_eq!(symbols.blocks[soc.top], "CHIP");
    }

    #[test]
    fn test_memory_entry_layout() {
        let tree = NodeTree::new([DesignNode::addrmap("chip").child(
            DesignNode::mem("ring", 0x4000, 8, 64).child(
                DesignNode::reg("DESC", 0x0).child(DesignNode::field("LEN", 0, 16)),
            ),
        )]);
        let soc = ModelBuilder::new(4, true).build(&tree, "chip", "chip", "").unwrap();
        let units = generate(&soc, &GeneratorConfig::default()).unwrap();
        let desc = units.get("chip_descriptors.rs").unwrap();
        assert!(desc.contains("pub static RING_ENTRY: BlockInfo = BlockInfo {"));
        assert!(desc.contains("    entry: Some(&RING_ENTRY),\n"));
        assert!(desc.contains("pub static RING_DESC: RegisterInfo"));
        // Entry layouts are described but not bound.
        let bindings = units.get("chip_bindings.rs").unwrap();
        assert!(!bindings.contains("RING_DESC"));
        assert!(bindings.contains("registry.add_memory(&desc::RING);"));
    }
}
