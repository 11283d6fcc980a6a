//! Source analysis: language registry and file selection.

pub mod language;
pub mod selector;

pub use language::Language;
pub use selector::select_files;
