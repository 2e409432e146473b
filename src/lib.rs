//! Purpose: Shared core library crate used by the `menuforge` CLI and tests.
//! Exports: `core` (menu model, slot/requirement/argument codecs, YAML transcoder, errors).
//! Role: Internal library backing the binary; not yet a stable public SDK.
//! Invariants: Treat the crate API as internal until a dedicated library release.
//! Invariants: Core transcoder functions are pure; all I/O lives in the binary.
pub mod core;
