//! # Component Studio Core
//!
//! Editing state for the component studio: a catalog of parameterized UI
//! component templates, the property panel generated from a template's
//! schema, and an undo/redo revision history that survives reloads.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 StudioState                 │
//! ├─────────────────────────────────────────────┤
//! │  Catalog          │  Selection              │
//! │  - Built-ins      │  - Active template      │
//! │  - Generated      │  - Property values      │
//! ├─────────────────────────────────────────────┤
//! │  RevisionHistory  │  HistoryStore           │
//! │  - Undo / redo    │  - JSON file            │
//! │  - Star / evict   │  - Memory / browser     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Rendering lives in `studio-renderer`; the state only notifies an
//! observer when the selected template or its values change.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod ai;
mod builtin;
pub mod catalog;
pub mod error;
pub mod export;
pub mod history;
pub mod infer;
pub mod panel;
pub mod property;
pub mod state;
pub mod store;
pub mod template;

pub use ai::{
    EnhancementRequest, EnhancementResponse, Enhancements, GenerationRequest, GenerationResponse,
    GenerationTicket,
};
pub use catalog::{Catalog, CatalogEntry};
pub use error::{StudioError, StudioResult};
pub use export::ExportDocument;
pub use history::{
    BranchPolicy, FieldChange, HistoryConfig, NewRevision, Revision, RevisionHistory,
    RevisionKind,
};
pub use infer::InferredKind;
pub use panel::{generate_panel, Control, Panel, PanelField, PanelSection};
pub use property::{
    PropertyDescriptor, PropertyKind, PropertySchema, PropertyValue, PropertyValueMap,
    SchemaEntry,
};
pub use state::{system_clock, Clock, OnChangeCallback, StudioState};
pub use store::{FileHistoryStore, HistoryStore, MemoryHistoryStore, StoreError, STORAGE_KEY};
pub use template::{ComponentTemplate, TemplateCategory};

/// Studio core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
