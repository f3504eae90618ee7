//! Icon Hydrator - Modrinth project icons for shader cards
//!
//! Replaces the placeholder logo on each `article.shaderCard[data-modrinth]` card
//! with the project's icon from the Modrinth API. Icon URLs are cached in a
//! key-value store so repeat runs skip the network.

pub mod config;
pub mod error;
pub mod hydrator;
pub mod modrinth;
pub mod page;
pub mod probe;
pub mod store;

pub use config::{HydratorConfig, MarkupContract};
pub use error::{HydrateError, Result};
pub use hydrator::{CardOutcome, HydrationReport, Hydrator};
pub use modrinth::{ModrinthClient, ModrinthProject};
pub use page::{Card, Page};
pub use probe::{AssumeLoaded, HttpImageProbe, ImageLoad, ImageProbe};
pub use store::{IconCache, JsonFileStore, KeyValueStore, MemoryStore};
