//! Symbol Resolver - address to symbol name
//!
//! Thin, failure-absorbing wrapper over the host's symbol query. A failed
//! query is logged and treated as "no symbol"; resolution never aborts
//! the render that asked for it.

use crate::host::SymbolTable;

/// Resolve `address` to the symbol text covering it, if any.
pub fn resolve(symbols: &dyn SymbolTable, address: u64) -> Option<String> {
    match symbols.symbol_at(address) {
        Ok(found) => found,
        Err(e) => {
            log::warn!("symbol query for {address:#x} failed: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HostError;

    struct FixedSymbols;

    impl SymbolTable for FixedSymbols {
        fn symbol_at(&self, address: u64) -> Result<Option<String>, HostError> {
            match address {
                0x1000 => Ok(Some("foo()".to_string())),
                0x2000 => Ok(None),
                _ => Err(HostError::Query("symbol server unreachable".to_string())),
            }
        }
    }

    #[test]
    fn present_symbol_resolves() {
        assert_eq!(resolve(&FixedSymbols, 0x1000), Some("foo()".to_string()));
    }

    #[test]
    fn missing_symbol_is_absent() {
        assert_eq!(resolve(&FixedSymbols, 0x2000), None);
    }

    #[test]
    fn query_failure_degrades_to_absent() {
        assert_eq!(resolve(&FixedSymbols, 0xdead), None);
    }
}
