//! Printer registry - the registration contract exposed to the host
//!
//! The host keeps one collection of pretty printers and picks one per value
//! by the value's structure name; higher priority wins over any weaker
//! default registered for the same structure. Installation is explicit and
//! idempotent so a host can safely re-run its load script.

use super::{ChildValue, ErasedHead, HeadPrinter};
use crate::host::{SymbolTable, TargetMemory, TypeSystem};

/// Fully qualified structure name this crate's printer is registered against
pub const HEAD_TYPE: &str = "dixelu::details::custom_head";

/// Priority assigned to the head printer, above the host's defaults
pub const HEAD_PRINTER_PRIORITY: i32 = 10;

/// Per-value display contract a registered printer implements.
///
/// Re-invocable with a fresh value on every call; implementations hold no
/// per-value state.
pub trait ValuePrinter {
    fn name(&self) -> &str;
    fn label(&self, head: &ErasedHead) -> String;
    fn children(&self, head: &ErasedHead) -> Vec<(String, ChildValue)>;
}

impl ValuePrinter for HeadPrinter<'_> {
    fn name(&self) -> &str {
        "custom_head"
    }

    fn label(&self, head: &ErasedHead) -> String {
        HeadPrinter::label(self, head)
    }

    fn children(&self, head: &ErasedHead) -> Vec<(String, ChildValue)> {
        HeadPrinter::children(self, head)
    }
}

/// One installed printer.
pub struct Registration<'h> {
    /// Printer name, unique per target type
    pub name: String,
    /// Fully qualified structure name the printer applies to
    pub target_type: String,
    /// Larger wins when several printers target the same structure
    pub priority: i32,
    pub printer: Box<dyn ValuePrinter + 'h>,
}

/// Host-side collection of printers, selected by structure name.
#[derive(Default)]
pub struct PrinterRegistry<'h> {
    entries: Vec<Registration<'h>>,
}

impl<'h> PrinterRegistry<'h> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Install a printer. Re-installing under the same name and target type
    /// replaces the previous registration.
    pub fn install(&mut self, registration: Registration<'h>) {
        self.entries.retain(|entry| {
            !(entry.name == registration.name && entry.target_type == registration.target_type)
        });
        log::info!(
            "registered printer {} for {} (priority {})",
            registration.name,
            registration.target_type,
            registration.priority
        );
        self.entries.push(registration);
    }

    /// Highest-priority printer registered for `target_type`, if any.
    pub fn lookup(&self, target_type: &str) -> Option<&dyn ValuePrinter> {
        self.entries
            .iter()
            .filter(|entry| entry.target_type == target_type)
            .max_by_key(|entry| entry.priority)
            .map(|entry| entry.printer.as_ref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Install the `custom_head` printer against its structure name, ahead of
/// any default printer. Called once when the host loads this extension.
pub fn install_head_printer<'h>(
    registry: &mut PrinterRegistry<'h>,
    symbols: &'h dyn SymbolTable,
    types: &'h dyn TypeSystem,
    memory: &'h dyn TargetMemory,
) {
    registry.install(Registration {
        name: "custom_head".to_string(),
        target_type: HEAD_TYPE.to_string(),
        priority: HEAD_PRINTER_PRIORITY,
        printer: Box::new(HeadPrinter::new(symbols, types, memory)),
    });
}
