//! Value Renderer - display a type-erased head as its original type
//!
//! The inspected program's `dixelu::details::custom_head` is a function
//! pointer (`mf`, instantiated per erased type) paired with an untyped data
//! pointer. Given a snapshot of those two fields, the printer recovers the
//! erased type from the function pointer's symbol and renders the payload
//! through the host's type system and memory, degrading step by step when
//! a host facility cannot deliver.

use std::fmt;

use crate::host::{SymbolTable, TargetMemory, TypeSystem};
use crate::recover::{recover_type, ErasurePattern};

pub mod registry;

pub use registry::{install_head_printer, PrinterRegistry, Registration, ValuePrinter};

/// Token in a recovered type name that marks the empty (default-constructed)
/// head, whose erasing function is the `nullptr_t` specialization.
const NULL_MARKER: &str = "nullptr";

/// Snapshot of a `custom_head` value's fields, taken fresh per render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErasedHead {
    /// The `mf` field: pointer to the type-specific erasing function
    pub mf: u64,
    /// The `data` field: untyped pointer to the erased payload
    pub data: u64,
}

/// Rendered value of one child in the expandable display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildValue {
    /// Payload decoded through the recovered type
    Value(String),
    /// Typed pointer that could not be dereferenced
    TypedPointer { type_name: String, address: u64 },
    /// Untyped data pointer (type unknown, or the head is empty)
    RawPointer(u64),
    /// Recovered type the host's type system does not know
    Unavailable(String),
}

impl fmt::Display for ChildValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChildValue::Value(text) => f.write_str(text),
            ChildValue::TypedPointer { type_name, address } => {
                write!(f, "({type_name} *) {address:#x}")
            }
            ChildValue::RawPointer(address) => write!(f, "(void *) {address:#x}"),
            ChildValue::Unavailable(name) => write!(f, "<unavailable type {name}>"),
        }
    }
}

/// Pretty printer for `dixelu::details::custom_head`.
///
/// Stateless across calls: `label` and `children` each re-run resolution and
/// extraction, so repeated or speculative renders of the same value are safe
/// and yield identical results.
pub struct HeadPrinter<'h> {
    symbols: &'h dyn SymbolTable,
    types: &'h dyn TypeSystem,
    memory: &'h dyn TargetMemory,
    pattern: &'h ErasurePattern,
}

impl<'h> HeadPrinter<'h> {
    pub fn new(
        symbols: &'h dyn SymbolTable,
        types: &'h dyn TypeSystem,
        memory: &'h dyn TargetMemory,
    ) -> Self {
        Self::with_pattern(symbols, types, memory, ErasurePattern::mfunc())
    }

    /// Printer with a non-default erasure convention.
    pub fn with_pattern(
        symbols: &'h dyn SymbolTable,
        types: &'h dyn TypeSystem,
        memory: &'h dyn TargetMemory,
        pattern: &'h ErasurePattern,
    ) -> Self {
        Self {
            symbols,
            types,
            memory,
            pattern,
        }
    }

    fn recover(&self, head: &ErasedHead) -> Option<String> {
        recover_type(self.symbols, self.pattern, head.mf)
    }

    /// One-line label: `custom_head<T>`, or `custom_head<unknown>` when the
    /// erased type cannot be recovered.
    pub fn label(&self, head: &ErasedHead) -> String {
        match self.recover(head) {
            Some(type_name) => format!("custom_head<{type_name}>"),
            None => "custom_head<unknown>".to_string(),
        }
    }

    /// Ordered children for expandable display. Always returns exactly one
    /// child; which one depends on how far the host lets recovery get:
    ///
    /// - no recovered type, or the null-marker type: `("empty", data as void*)`
    /// - type recovered but unknown to the host: `("data", <unavailable>)`
    /// - type resolved but payload unreadable: `("data", typed pointer)`
    /// - otherwise: `("data", decoded payload)`
    pub fn children(&self, head: &ErasedHead) -> Vec<(String, ChildValue)> {
        let type_name = match self.recover(head) {
            Some(name) if !name.contains(NULL_MARKER) => name,
            _ => return vec![("empty".to_string(), ChildValue::RawPointer(head.data))],
        };

        let ty = match self.types.lookup(&type_name) {
            Ok(ty) => ty,
            Err(e) => {
                log::debug!("type lookup for {type_name} failed: {e}");
                return vec![("data".to_string(), ChildValue::Unavailable(type_name))];
            }
        };

        match self.memory.deref_typed(head.data, &ty) {
            Ok(decoded) => vec![("data".to_string(), ChildValue::Value(decoded))],
            Err(e) => {
                log::debug!("dereference of {:#x} as {} failed: {e}", head.data, ty.name);
                vec![(
                    "data".to_string(),
                    ChildValue::TypedPointer {
                        type_name: ty.name,
                        address: head.data,
                    },
                )]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_values_display_like_a_debugger() {
        assert_eq!(ChildValue::Value("42".to_string()).to_string(), "42");
        assert_eq!(
            ChildValue::TypedPointer {
                type_name: "int".to_string(),
                address: 0x7000,
            }
            .to_string(),
            "(int *) 0x7000"
        );
        assert_eq!(ChildValue::RawPointer(0).to_string(), "(void *) 0x0");
        assert_eq!(
            ChildValue::Unavailable("my::ns::widget".to_string()).to_string(),
            "<unavailable type my::ns::widget>"
        );
    }
}
