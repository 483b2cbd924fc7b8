//! Generic Entity Console.
//!
//! A declarative list/create/edit/delete client for any admin resource:
//! describe the columns once and the console handles the full lifecycle
//! against the Resource Access Layer. Entity-specific consoles that need
//! cross-entity selects or one-time secrets live in [`pages`] and reproduce
//! the same four-operation shape.
//!
//! Two behaviors are contractual and deliberately asymmetric:
//!
//! - after a successful create or edit the console **re-fetches** the whole
//!   collection (consistency over latency);
//! - after a successful delete it **removes the row locally** without
//!   re-fetching (optimistic removal).

mod api;
mod console;
pub mod pages;
mod projection;
mod render;

pub use api::{ConsoleError, HttpResourceClient, ResourceApi};
pub use console::{Column, ConsoleConfig, EntityConsole, Modal, Phase};
pub use projection::{project, Projected};
pub use render::{default_cell, yes_no};
