//! Offline symbol table backed by a PE/ELF binary
//!
//! Parses the binary with goblin, collects function symbols, and answers
//! covering-address queries the way a live debugger's symbol database would.
//! Mangled C++ names are demangled once at load time (with parameter types,
//! which the erasure pattern needs) using cpp_demangle.

use anyhow::{anyhow, Result};
use std::fs;
use std::path::Path;

use super::{HostError, SymbolTable};

/// One function symbol with a resolved (demangled) display name
#[derive(Debug, Clone)]
pub struct SymbolEntry {
    /// Virtual address of the function
    pub address: u64,
    /// Size in bytes (0 if the format does not record one)
    pub size: u64,
    /// Demangled name, or the raw name if demangling fails
    pub name: String,
}

/// Symbol database parsed out of an executable image.
///
/// Entries are kept sorted by address; `symbol_at` finds the entry covering
/// the queried address. A zero-size entry covers up to the next symbol.
pub struct BinarySymbolTable {
    symbols: Vec<SymbolEntry>,
}

impl BinarySymbolTable {
    /// Load and parse a binary file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read(&path)?;
        Self::from_bytes(&data)
    }

    /// Parse a binary image from bytes
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        match goblin::Object::parse(data)? {
            goblin::Object::Elf(elf) => Ok(Self::from_elf(&elf)),
            goblin::Object::PE(pe) => Ok(Self::from_pe(&pe)),
            _ => Err(anyhow!("unsupported binary format")),
        }
    }

    /// Build a table directly from raw symbol entries (names still mangled).
    pub fn from_symbols(raw: Vec<SymbolEntry>) -> Self {
        let mut symbols: Vec<SymbolEntry> = raw
            .into_iter()
            .map(|s| SymbolEntry {
                name: demangle(&s.name),
                ..s
            })
            .collect();
        symbols.sort_by_key(|s| s.address);
        Self { symbols }
    }

    fn from_elf(elf: &goblin::elf::Elf<'_>) -> Self {
        let mut raw = Vec::new();
        for sym in elf.syms.iter() {
            if !sym.is_function() || sym.st_value == 0 {
                continue;
            }
            let name = elf.strtab.get_at(sym.st_name).unwrap_or("");
            if name.is_empty() {
                continue;
            }
            raw.push(SymbolEntry {
                address: sym.st_value,
                size: sym.st_size,
                name: name.to_string(),
            });
        }
        // Dynamic symbols fill in when the static symtab is stripped
        for sym in elf.dynsyms.iter() {
            if !sym.is_function() || sym.st_value == 0 {
                continue;
            }
            let name = elf.dynstrtab.get_at(sym.st_name).unwrap_or("");
            if name.is_empty() {
                continue;
            }
            raw.push(SymbolEntry {
                address: sym.st_value,
                size: sym.st_size,
                name: name.to_string(),
            });
        }
        log::info!("loaded {} ELF function symbols", raw.len());
        Self::from_symbols(raw)
    }

    fn from_pe(pe: &goblin::pe::PE<'_>) -> Self {
        let image_base = pe.image_base as u64;
        let mut raw = Vec::new();
        for export in &pe.exports {
            if let Some(name) = &export.name {
                raw.push(SymbolEntry {
                    address: image_base + export.rva as u64,
                    size: 0,
                    name: name.to_string(),
                });
            }
        }
        log::info!("loaded {} PE export symbols", raw.len());
        Self::from_symbols(raw)
    }

    /// All symbols, sorted by address
    pub fn symbols(&self) -> &[SymbolEntry] {
        &self.symbols
    }

    fn covering(&self, address: u64) -> Option<&SymbolEntry> {
        let idx = match self.symbols.binary_search_by_key(&address, |s| s.address) {
            Ok(idx) => idx,
            Err(0) => return None,
            Err(idx) => idx - 1,
        };
        let entry = &self.symbols[idx];
        if entry.size > 0 {
            (address < entry.address + entry.size).then_some(entry)
        } else {
            // Zero-size symbol: treat it as covering up to the next symbol
            match self.symbols.get(idx + 1) {
                Some(next) => (address < next.address).then_some(entry),
                None => Some(entry),
            }
        }
    }
}

impl SymbolTable for BinarySymbolTable {
    fn symbol_at(&self, address: u64) -> Result<Option<String>, HostError> {
        Ok(self.covering(address).map(|s| s.name.clone()))
    }
}

/// Demangle an Itanium-mangled name, parameter types included.
/// Non-mangled or unparseable names pass through unchanged.
pub fn demangle(name: &str) -> String {
    if !name.starts_with("_Z") {
        return name.to_string();
    }
    match cpp_demangle::Symbol::new(name) {
        Ok(sym) => sym.to_string(),
        Err(e) => {
            log::debug!("failed to demangle {name}: {e}");
            name.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> BinarySymbolTable {
        BinarySymbolTable::from_symbols(vec![
            SymbolEntry {
                address: 0x2000,
                size: 0,
                name: "bar".to_string(),
            },
            SymbolEntry {
                address: 0x1000,
                size: 0x10,
                name: "_Z3foov".to_string(),
            },
        ])
    }

    #[test]
    fn names_are_demangled_at_load() {
        let t = table();
        assert_eq!(t.symbol_at(0x1000).unwrap(), Some("foo()".to_string()));
    }

    #[test]
    fn covering_lookup_respects_size() {
        let t = table();
        assert_eq!(t.symbol_at(0x100f).unwrap(), Some("foo()".to_string()));
        // Past foo's 0x10 bytes, before bar
        assert_eq!(t.symbol_at(0x1010).unwrap(), None);
    }

    #[test]
    fn zero_size_symbol_covers_to_next() {
        let t = table();
        assert_eq!(t.symbol_at(0x2abc).unwrap(), Some("bar".to_string()));
    }

    #[test]
    fn address_below_first_symbol_is_absent() {
        let t = table();
        assert_eq!(t.symbol_at(0x10).unwrap(), None);
    }

    #[test]
    fn unparseable_mangled_name_stays_raw() {
        assert_eq!(demangle("_Z@@@"), "_Z@@@");
        assert_eq!(demangle("plain_c_symbol"), "plain_c_symbol");
    }
}
