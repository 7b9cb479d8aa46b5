//! Recovery core - from a code address back to the erased type
//!
//! Two steps, both pure with respect to the target process:
//! - `resolve`: address -> symbol text, via the host symbol table
//! - `extract`: symbol text -> the type argument embedded in the erasing
//!   function's instantiated name

pub mod extract;
pub mod resolve;

pub use extract::ErasurePattern;
pub use resolve::resolve;

/// Chain resolution and extraction on an erasing-function address.
pub fn recover_type(
    symbols: &dyn crate::host::SymbolTable,
    pattern: &ErasurePattern,
    address: u64,
) -> Option<String> {
    let symbol = resolve(symbols, address)?;
    pattern.extract(&symbol)
}
