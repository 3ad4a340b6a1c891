//! Prepare and execute environments.

use crate::script::{ScriptError, ScriptResult, RAW_REQUEST_GAS, REPORT_READ_GAS};
use crate::types::{DataSourceId, ExternalId, RawRequest, Report};
use sibyl_core::GasMeter;
use std::collections::BTreeMap;

/// Environment of a script's prepare phase.
///
/// Exposes the request parameters and collects the raw requests the script
/// asks for, enforcing the module limits and the prepare gas budget.
pub struct PrepareEnv {
    calldata: Vec<u8>,
    ask_count: u64,
    min_count: u64,
    max_raw_requests: u64,
    max_calldata_size: u64,
    data_source_count: u64,
    gas: GasMeter,
    raw_requests: Vec<RawRequest>,
}

impl PrepareEnv {
    pub(crate) fn new(
        calldata: Vec<u8>,
        ask_count: u64,
        min_count: u64,
        max_raw_requests: u64,
        max_calldata_size: u64,
        data_source_count: u64,
        prepare_gas: u64,
    ) -> Self {
        Self {
            calldata,
            ask_count,
            min_count,
            max_raw_requests,
            max_calldata_size,
            data_source_count,
            gas: GasMeter::with_limit(prepare_gas),
            raw_requests: Vec::new(),
        }
    }

    /// The request calldata.
    pub fn calldata(&self) -> &[u8] {
        &self.calldata
    }

    /// Number of validators asked.
    pub fn ask_count(&self) -> u64 {
        self.ask_count
    }

    /// Quorum threshold of the request.
    pub fn min_count(&self) -> u64 {
        self.min_count
    }

    /// Consumes gas from the prepare budget.
    pub fn consume_gas(&mut self, amount: u64) -> ScriptResult<()> {
        self.gas
            .consume(amount, "script")
            .map_err(|_| ScriptError::OutOfGas)
    }

    /// Emits one raw request for an external data source.
    pub fn ask_external_data(
        &mut self,
        external_id: ExternalId,
        data_source_id: DataSourceId,
        calldata: Vec<u8>,
    ) -> ScriptResult<()> {
        self.consume_gas(RAW_REQUEST_GAS)?;
        if self.raw_requests.len() as u64 >= self.max_raw_requests {
            return Err(ScriptError::TooManyRawRequests {
                limit: self.max_raw_requests,
            });
        }
        if calldata.len() as u64 > self.max_calldata_size {
            return Err(ScriptError::CalldataTooLarge {
                size: calldata.len(),
                limit: self.max_calldata_size,
            });
        }
        let id: u64 = data_source_id.into();
        if id == 0 || id > self.data_source_count {
            return Err(ScriptError::UnknownDataSource(data_source_id));
        }
        if self
            .raw_requests
            .iter()
            .any(|r| r.external_id == external_id)
        {
            return Err(ScriptError::DuplicateExternalId(external_id.into()));
        }
        self.raw_requests
            .push(RawRequest::new(external_id, data_source_id, calldata));
        Ok(())
    }

    pub(crate) fn into_raw_requests(self) -> Vec<RawRequest> {
        self.raw_requests
    }
}

/// Environment of a script's execute phase.
///
/// Exposes the request parameters, block time, and the reports collected
/// before resolution, under the execute gas budget.
pub struct ExecuteEnv<'a> {
    calldata: &'a [u8],
    ask_count: u64,
    min_count: u64,
    block_time: u64,
    reports: &'a [Report],
    gas: GasMeter,
}

impl<'a> ExecuteEnv<'a> {
    pub(crate) fn new(
        calldata: &'a [u8],
        ask_count: u64,
        min_count: u64,
        block_time: u64,
        reports: &'a [Report],
        execute_gas: u64,
    ) -> Self {
        Self {
            calldata,
            ask_count,
            min_count,
            block_time,
            reports,
            gas: GasMeter::with_limit(execute_gas),
        }
    }

    /// The request calldata.
    pub fn calldata(&self) -> &[u8] {
        self.calldata
    }

    /// Number of validators asked.
    pub fn ask_count(&self) -> u64 {
        self.ask_count
    }

    /// Quorum threshold of the request.
    pub fn min_count(&self) -> u64 {
        self.min_count
    }

    /// Number of reports collected.
    pub fn ans_count(&self) -> u64 {
        self.reports.len() as u64
    }

    /// Time of the resolving block, unix seconds.
    pub fn block_time(&self) -> u64 {
        self.block_time
    }

    /// The collected reports, in validator-address order.
    pub fn reports(&self) -> &[Report] {
        self.reports
    }

    /// Consumes gas from the execute budget.
    pub fn consume_gas(&mut self, amount: u64) -> ScriptResult<()> {
        self.gas
            .consume(amount, "script")
            .map_err(|_| ScriptError::OutOfGas)
    }

    /// The majority answer for one sub-request.
    ///
    /// Considers each validator's successful, non-empty answer for
    /// `external_id` and returns the most common payload; ties break toward
    /// the smallest payload bytes. `None` when no validator answered.
    pub fn majority_answer(&mut self, external_id: ExternalId) -> ScriptResult<Option<Vec<u8>>> {
        self.consume_gas(self.reports.len() as u64 * REPORT_READ_GAS)?;
        let mut votes: BTreeMap<&[u8], usize> = BTreeMap::new();
        for report in self.reports {
            if let Some(raw) = report.raw_report(external_id) {
                if raw.is_answered() {
                    *votes.entry(raw.data.as_slice()).or_insert(0) += 1;
                }
            }
        }
        let winner = votes
            .into_iter()
            .max_by(|(a_data, a_votes), (b_data, b_votes)| {
                a_votes.cmp(b_votes).then(b_data.cmp(a_data))
            })
            .map(|(data, _)| data.to_vec());
        Ok(winner)
    }

    pub(crate) fn gas_used(&self) -> u64 {
        self.gas.consumed()
    }
}
