//! Oracle data model: ids, requests, reports, results, and messages.

pub mod msgs;
pub mod registry;
pub mod report;
pub mod request;
pub mod result;
pub mod validator;

pub use msgs::Msg;
pub use registry::{DataSourceMeta, OracleScriptMeta};
pub use report::{RawReport, Report};
pub use request::{IbcChannel, RawRequest, Request};
pub use result::{OracleResult, ResolveStatus};
pub use validator::ValidatorStatus;

use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

/// Monotonically increasing data-request identifier. The first request on a
/// chain has id 1.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Default,
    Display,
    From,
    Into,
)]
pub struct RequestId(pub u64);

/// Oracle-script identifier.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Default,
    Display,
    From,
    Into,
)]
pub struct OracleScriptId(pub u64);

/// External data-source identifier.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Default,
    Display,
    From,
    Into,
)]
pub struct DataSourceId(pub u64);

/// Identifier of a raw sub-request, local to its request.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Default,
    Display,
    From,
    Into,
)]
pub struct ExternalId(pub u64);
