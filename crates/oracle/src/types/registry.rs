//! Data-source and oracle-script registry metadata.

use serde::{Deserialize, Serialize};
use sibyl_core::Address;

/// Metadata of a registered external data source.
///
/// The actual fetch is performed by validator-side infrastructure; the chain
/// only records what exists so scripts can reference sources by id and the
/// query surface can list them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSourceMeta {
    /// Account allowed to edit the entry.
    pub owner: Address,
    /// Human-readable name.
    pub name: String,
    /// What the source provides.
    pub description: String,
}

/// Metadata of a registered oracle script.
///
/// The executable half of a script is a host-registered [`OracleScript`]
/// implementation looked up by id at prepare and execute time.
///
/// [`OracleScript`]: crate::script::OracleScript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleScriptMeta {
    /// Account allowed to edit the entry.
    pub owner: Address,
    /// Human-readable name.
    pub name: String,
    /// What the script computes.
    pub description: String,
}
