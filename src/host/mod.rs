//! Host boundary - interfaces consumed from the debugger host
//!
//! Everything the recovery/render pipeline needs from the host is behind a
//! trait here: address-to-symbol lookup, type lookup by name, and typed
//! dereference of target memory. Host replies are converted to typed results
//! at this boundary so the rest of the crate never scans sentinel strings.

use thiserror::Error;

pub mod image;
pub mod symtab;

pub use image::StaticImage;
pub use symtab::BinarySymbolTable;

/// Sentinel substring in raw `info symbol`-style replies that means
/// "no symbol covers this address".
pub const NO_SYMBOL_SENTINEL: &str = "No symbol matches";

/// Errors surfaced by host queries
#[derive(Error, Debug)]
pub enum HostError {
    #[error("no symbol covers address {address:#x}")]
    NoSymbol { address: u64 },

    #[error("type not known to the host: {name}")]
    TypeNotFound { name: String },

    #[error("memory not readable at {address:#x}: {reason}")]
    Unreadable { address: u64, reason: String },

    #[error("host query failed: {0}")]
    Query(String),
}

/// Kind of a type descriptor, enough to drive layout-aware decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// Integer, signed or unsigned, of the descriptor's size
    Int { signed: bool },
    /// IEEE float of the descriptor's size (4 or 8)
    Float,
    Bool,
    Char,
    Pointer,
    /// Anything the host knows the size of but cannot decode field-wise
    Opaque,
}

/// Live type handle returned by the host's type system.
///
/// Carries enough layout information for a memory host to decode a value;
/// the renderer treats it as an opaque token passed back into `deref_typed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    /// Fully qualified type name
    pub name: String,
    /// Size in bytes
    pub size: usize,
    pub kind: TypeKind,
}

impl TypeDescriptor {
    pub fn new(name: impl Into<String>, size: usize, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            size,
            kind,
        }
    }
}

/// Address-to-symbol query against the inspected process.
pub trait SymbolTable {
    /// Symbol text covering `address`. `Ok(None)` means the address is valid
    /// to ask about but no symbol covers it; `Err` is a failed query.
    fn symbol_at(&self, address: u64) -> Result<Option<String>, HostError>;
}

/// Type lookup by fully qualified name.
pub trait TypeSystem {
    fn lookup(&self, name: &str) -> Result<TypeDescriptor, HostError>;
}

/// Read-only typed access to target memory.
pub trait TargetMemory {
    /// Decode the value at `address` as `ty` and render it as display text.
    fn deref_typed(&self, address: u64, ty: &TypeDescriptor) -> Result<String, HostError>;
}

/// Classify the raw reply text of an `info symbol`-style host query.
///
/// Hosts that answer symbol queries with free text signal absence with a
/// sentinel phrase rather than a distinct status. This is the single place
/// that scans for it; everything downstream sees `Option<String>`.
pub fn classify_symbol_reply(reply: &str) -> Option<String> {
    let trimmed = reply.trim();
    if trimmed.is_empty() || trimmed.contains(NO_SYMBOL_SENTINEL) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Symbol table over a host whose query yields raw reply text.
///
/// Wraps a closure (e.g. one that shells a command into a live debugger) and
/// applies [`classify_symbol_reply`] to its output.
pub struct ReplyTextSymbols<F>
where
    F: Fn(u64) -> Result<String, HostError>,
{
    query: F,
}

impl<F> ReplyTextSymbols<F>
where
    F: Fn(u64) -> Result<String, HostError>,
{
    pub fn new(query: F) -> Self {
        Self { query }
    }
}

impl<F> SymbolTable for ReplyTextSymbols<F>
where
    F: Fn(u64) -> Result<String, HostError>,
{
    fn symbol_at(&self, address: u64) -> Result<Option<String>, HostError> {
        let reply = (self.query)(address)?;
        Ok(classify_symbol_reply(&reply))
    }
}
