//! `fwgen packs`: pack listing.

use std::fmt::Write as _;

use fwgen_catalog::Registry;

/// List every pack with the boards that use it.
pub fn list(registry: &Registry) {
    print!("{}", pack_table(registry));
}

pub(crate) fn pack_table(registry: &Registry) -> String {
    let mut out = String::new();
    if registry.packs.is_empty() {
        let _ = writeln!(out, "No packs in {}", registry.packs.dir().display());
        return out;
    }
    let _ = writeln!(out, "Packs:");
    let _ = writeln!(out);
    for pack in registry.packs.list() {
        let boards: Vec<&str> = registry
            .boards
            .list()
            .into_iter()
            .filter(|b| b.pack == pack.id)
            .map(|b| b.id.as_str())
            .collect();
        let _ = writeln!(out, "  {:<12} {:<24} {}", pack.id, pack.name, pack.cpu);
        if !boards.is_empty() {
            let _ = writeln!(out, "  {:<12} boards: {}", "", boards.join(", "));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::shipped_registry;

    #[test]
    fn table_lists_packs_with_boards() {
        let text = pack_table(&shipped_registry());
        assert!(text.contains("  stm32f0      STM32F0 (Cortex-M0)"));
        assert!(text.contains("boards: nucleo_f030r8, nucleo_f091rc"));
    }
}
