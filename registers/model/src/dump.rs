// Licensed under the Apache-2.0 license

//! JSON rendering of the IR.
//!
//! The arena is turned back into nested objects: blocks contain their
//! registers, child blocks and memories, registers contain their fields.

use crate::types::{BlockIdx, SocDescriptor};
use serde::ser::Error as _;
use serde::Serialize;
use serde_json::{Map, Value};

pub fn to_value(soc: &SocDescriptor) -> serde_json::Result<Value> {
    let mut obj = Map::new();
    obj.insert("name".into(), Value::from(soc.name.as_str()));
    obj.insert("namespace".into(), Value::from(soc.namespace.as_str()));
    obj.insert("word_bytes".into(), Value::from(soc.word_bytes));
    obj.insert("little_endian".into(), Value::from(soc.little_endian));
    obj.insert("options".into(), serde_json::to_value(&soc.options)?);
    obj.insert("top".into(), block_value(soc, soc.top)?);
    Ok(Value::Object(obj))
}

pub fn to_json(soc: &SocDescriptor) -> serde_json::Result<String> {
    let mut s = serde_json::to_string_pretty(&to_value(soc)?)?;
    s.push('\n');
    Ok(s)
}

fn object(item: &impl Serialize) -> serde_json::Result<Map<String, Value>> {
    match serde_json::to_value(item)? {
        Value::Object(obj) => Ok(obj),
        other => Err(serde_json::Error::custom(format!(
            "expected an object, got {other}"
        ))),
    }
}

fn block_value(soc: &SocDescriptor, idx: BlockIdx) -> serde_json::Result<Value> {
    let block = soc.block(idx);
    let mut obj = object(block)?;
    let registers = block
        .registers
        .iter()
        .map(|&r| serde_json::to_value(soc.register(r)))
        .collect::<serde_json::Result<Vec<_>>>()?;
    let blocks = block
        .blocks
        .iter()
        .map(|&b| block_value(soc, b))
        .collect::<serde_json::Result<Vec<_>>>()?;
    let mut memories = vec![];
    for &m in &block.memories {
        let memory = soc.memory(m);
        let mut value = object(memory)?;
        if let Some(entry) = memory.entry_template {
            value.insert("entry".into(), block_value(soc, entry)?);
        }
        memories.push(Value::Object(value));
    }
    obj.insert("registers".into(), Value::Array(registers));
    obj.insert("blocks".into(), Value::Array(blocks));
    obj.insert("memories".into(), Value::Array(memories));
    Ok(Value::Object(obj))
}
