//! Entity structs for the OCD domain objects.
//!
//! Each entity maps to a table in the libSQL database (see `ocd-db`
//! migrations). All structs derive `Serialize`, `Deserialize`, and `JsonSchema`
//! for JSON roundtrip and schema validation.

mod audit;
mod decision;
mod item;

pub use audit::AuditEntry;
pub use decision::Decision;
pub use item::Item;
