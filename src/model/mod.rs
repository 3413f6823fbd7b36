//! Domain entities decoded from porcelain records
//!
//! Mapping is shape checking only: each entity declares the fields it needs via
//! serde, and a record that lacks them (or is not structured at all) fails with a
//! [`MappingError`]. Semantic rules, such as "a listed package has at least one
//! version", belong to the query layer.

mod category;
mod news;
mod package;
mod profile;

pub use category::{ANALYZER, BOARD_IMAGE, CategorySet, EMULATOR, SOURCE, TOOLCHAIN};
pub use news::{NewsItem, NewsLang};
pub use package::{Package, PackageManagerMeta, PackageVersion, ToolchainMeta};
pub use profile::Profile;

use crate::error::MappingError;
use crate::protocol::Record;
use serde::de::DeserializeOwned;

/// Deserialize a structured record into `T`
fn from_structured<T: DeserializeOwned>(
    record: &Record,
    entity: &'static str,
) -> Result<T, MappingError> {
    let doc = record
        .as_document()
        .ok_or_else(|| MappingError::NotStructured {
            entity,
            line: record.line().to_string(),
        })?;

    serde_json::from_value(doc.clone().into_value()).map_err(|e| MappingError::Shape {
        entity,
        reason: e.to_string(),
        line: doc.line().to_string(),
    })
}
