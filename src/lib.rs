//! Typelens - debugger-side type recovery for type-erased values
//!
//! The inspected program erases types behind a `(function pointer, void*)`
//! pair: the function is instantiated per erased type, so its debug symbol
//! name still carries the type as a template argument. This crate recovers
//! that type at display time and renders the payload as if the debugger had
//! full static type information.
//!
//! - [`host`] - boundary traits for the debugger host, plus offline hosts
//!   (binary-backed symbol table, snapshot-backed memory/type system)
//! - [`recover`] - the core: address -> symbol -> embedded type argument
//! - [`printer`] - label/children rendering and the registration contract

pub mod host;
pub mod printer;
pub mod recover;

pub use host::{BinarySymbolTable, HostError, StaticImage, TypeDescriptor, TypeKind};
pub use printer::{ChildValue, ErasedHead, HeadPrinter, PrinterRegistry};
pub use recover::ErasurePattern;
