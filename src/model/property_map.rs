//! PropertyMap — the flat attribute dictionary of an exported network.

use std::collections::BTreeMap;
use super::Value;

/// A map of attribute names (`pore.coords`, `throat.phase1_2`, ...) to values.
///
/// Ordered so that exports are byte-for-byte reproducible.
pub type PropertyMap = BTreeMap<String, Value>;
