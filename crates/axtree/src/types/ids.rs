/*! Identifier newtypes. */

use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

/// Operating-system process id of an automation target.
///
/// Every cache table is keyed by this; different process ids are fully
/// independent.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
  Display,
  From,
  Into,
)]
#[display("{_0}")]
pub struct ProcessId(pub u32);
