// Licensed under the Apache-2.0 license

//! Name conversion and literal formatting for emitted code.

use std::collections::HashSet;

/// Converts a hierarchical name to snake_case.
///
/// Path separators, brackets and other punctuation become single
/// underscores; CamelCase transitions get a separator; leading digits get
/// an underscore prefix; Rust keywords get an underscore suffix.
///
/// # Examples
/// ```
/// use regbind_generator::util::snake_case;
/// assert_eq!(snake_case("uart.CTRL"), "uart_ctrl");
/// assert_eq!(snake_case("dma.chan[1].Cfg"), "dma_chan_1_cfg");
/// assert_eq!(snake_case("RxFifo"), "rx_fifo");
/// ```
pub fn snake_case(name: &str) -> String {
    let mut result = String::new();
    if name.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        result.push('_');
    }
    let mut prev = None;
    for c in name.chars() {
        if !c.is_ascii_alphanumeric() {
            if prev.is_some() && prev != Some('_') {
                result.push('_');
            }
            prev = Some('_');
            continue;
        }
        if let Some(prev) = prev {
            if (prev.is_ascii_lowercase() || prev.is_ascii_digit()) && c.is_ascii_uppercase() {
                result.push('_');
            }
        }
        prev = Some(c);
        result.push(c.to_ascii_lowercase());
    }
    let trimmed = result.trim_end_matches('_');
    if trimmed.is_empty() {
        return "_".to_string();
    }
    if KEYWORDS.contains(&trimmed) {
        return format!("{trimmed}_");
    }
    trimmed.to_string()
}

/// SCREAMING_SNAKE_CASE, used for statics and C macros.
pub fn upper_snake(name: &str) -> String {
    snake_case(name).trim_end_matches('_').to_ascii_uppercase()
}

/// Sanitizes a name for use in file and module names: anything outside
/// `[A-Za-z0-9_]` becomes `_`, a leading digit gets a `_` prefix, and an
/// empty result falls back to `soc`.
pub fn identifier(name: &str) -> String {
    let mut out: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if out.is_empty() {
        return "soc".to_string();
    }
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

/// Words `snake_case` output must not collide with: strict and reserved
/// keywords, lowercase only since the output is lowercase.
const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl",
    "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub",
    "ref", "return", "self", "static", "struct", "super", "trait", "true", "try", "type",
    "typeof", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Integer literal for emitted code: decimal below ten, otherwise hex with
/// `_` between groups of four digits counted from the right.
///
/// # Examples
/// ```
/// use regbind_generator::util::int_literal;
/// assert_eq!(int_literal(5), "5");
/// assert_eq!(int_literal(0x8_0000), "0x8_0000");
/// ```
pub fn int_literal(value: u64) -> String {
    if value < 10 {
        return value.to_string();
    }
    let digits = format!("{value:x}");
    let head = digits.len() % 4;
    let groups: Vec<&str> = std::iter::once(&digits[..head])
        .filter(|g| !g.is_empty())
        .chain((head..digits.len()).step_by(4).map(|i| &digits[i..i + 4]))
        .collect();
    format!("0x{}", groups.join("_"))
}

/// Hands out identifiers, suffixing `_1`, `_2`, ... on collision. The
/// result only depends on the order of requests.
#[derive(Default)]
pub struct Idents {
    used: HashSet<String>,
}

impl Idents {
    pub fn reserve(&mut self, name: &str) {
        self.used.insert(name.to_string());
    }

    pub fn unique(&mut self, base: String) -> String {
        if self.used.insert(base.clone()) {
            return base;
        }
        (1..)
            .map(|n| format!("{base}_{n}"))
            .find(|candidate| self.used.insert(candidate.clone()))
            .unwrap_or(base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_case() {
        assert_eq!(snake_case("MyRegister"), "my_register");
        assert_eq!(snake_case("I3C_CTRL"), "i3c_ctrl");
        assert_eq!(snake_case("HTTPServer"), "httpserver");
        assert_eq!(snake_case("type"), "type_");
        assert_eq!(snake_case("top.DATA[3]"), "top_data_3");
        assert_eq!(snake_case("3d"), "_3d");
    }

    #[test]
    fn test_upper_snake() {
        assert_eq!(upper_snake("uart.CTRL"), "UART_CTRL");
        assert_eq!(upper_snake("chan[0].cfg"), "CHAN_0_CFG");
    }

    #[test]
    fn test_identifier() {
        assert_eq!(identifier("my-soc"), "my_soc");
        assert_eq!(identifier("1chip"), "_1chip");
        assert_eq!(identifier(""), "soc");
        assert_eq!(identifier("ok_name"), "ok_name");
    }

    #[test]
    fn test_int_literal() {
        assert_eq!(int_literal(0), "0");
        assert_eq!(int_literal(9), "9");
        assert_eq!(int_literal(10), "0xa");
        assert_eq!(int_literal(0x1234), "0x1234");
        assert_eq!(int_literal(0x1_0000), "0x1_0000");
        assert_eq!(int_literal(0x12345678), "0x1234_5678");
        assert_eq!(int_literal(u64::MAX), "0xffff_ffff_ffff_ffff");
    }

    #[test]
    fn test_keywords_are_escaped() {
        for word in ["type", "mod", "fn", "self", "gen", "async"] {
            assert_eq!(snake_case(word), format!("{word}_"));
        }
        assert_eq!(snake_case("Self"), "self_");
        assert_eq!(snake_case("types"), "types");
        assert_eq!(upper_snake("type"), "TYPE");
    }

    #[test]
    fn test_idents() {
        let mut idents = Idents::default();
        idents.reserve("SOC");
        assert_eq!(idents.unique("SOC".into()), "SOC_1");
        assert_eq!(idents.unique("A".into()), "A");
        assert_eq!(idents.unique("A".into()), "A_1");
        assert_eq!(idents.unique("A".into()), "A_2");
    }
}
