//! Data-source and oracle-script registries.

use crate::keeper::Keeper;
use crate::keys;
use crate::script::OracleScript;
use crate::types::{DataSourceId, DataSourceMeta, OracleScriptId, OracleScriptMeta};
use crate::{Error, Result};
use sibyl_core::{codec, Context};
use tracing::debug;

impl Keeper {
    /// Total number of registered data sources.
    pub fn data_source_count(&self, ctx: &Context) -> u64 {
        self.get_u64(ctx, keys::DATA_SOURCE_COUNT_KEY)
    }

    /// Registers a data source under the next id.
    pub fn add_data_source(&self, ctx: &mut Context, meta: DataSourceMeta) -> Result<DataSourceId> {
        let id = DataSourceId(self.data_source_count(ctx) + 1);
        ctx.set(&keys::data_source_key(id), &codec::encode(&meta)?);
        self.set_u64(ctx, keys::DATA_SOURCE_COUNT_KEY, id.into())?;
        debug!(data_source_id = %id, name = %meta.name, "registered data source");
        Ok(id)
    }

    /// The data source registered under `id`.
    pub fn get_data_source(&self, ctx: &Context, id: DataSourceId) -> Result<DataSourceMeta> {
        let bytes = ctx
            .get(&keys::data_source_key(id))
            .ok_or(Error::UnknownDataSource(id))?;
        Ok(codec::decode(&bytes)?)
    }

    /// Total number of registered oracle scripts.
    pub fn oracle_script_count(&self, ctx: &Context) -> u64 {
        self.get_u64(ctx, keys::ORACLE_SCRIPT_COUNT_KEY)
    }

    /// Registers an oracle script, metadata plus its executable, under the
    /// next id.
    pub fn register_oracle_script(
        &mut self,
        ctx: &mut Context,
        meta: OracleScriptMeta,
        script: Box<dyn OracleScript>,
    ) -> Result<OracleScriptId> {
        let id = OracleScriptId(self.oracle_script_count(ctx) + 1);
        ctx.set(&keys::oracle_script_key(id), &codec::encode(&meta)?);
        self.set_u64(ctx, keys::ORACLE_SCRIPT_COUNT_KEY, id.into())?;
        self.insert_script(id, script);
        debug!(oracle_script_id = %id, name = %meta.name, "registered oracle script");
        Ok(id)
    }

    /// The metadata of the oracle script registered under `id`.
    pub fn get_oracle_script(&self, ctx: &Context, id: OracleScriptId) -> Result<OracleScriptMeta> {
        let bytes = ctx
            .get(&keys::oracle_script_key(id))
            .ok_or(Error::UnknownOracleScript(id))?;
        Ok(codec::decode(&bytes)?)
    }
}
