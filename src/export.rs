//! Network export — flatten a `PoreNetwork` into OpenPNM-style keys.
//!
//! Typed attribute maps become flat `pore.*` / `throat.*` entries that a
//! simulation framework can load directly:
//!
//! ```text
//! PoreNetwork → to_property_map() → { "pore.phase1": [...], "throat.phase1_2": [...], ... }
//!   → to_json() / write_json()        (serde_json)
//!   → arrow::pore_batch() / throat_batch()   (feature `arrow-results`)
//! ```

use std::io::Write;

use crate::model::*;
use crate::Result;

// ============================================================================
// Key names
// ============================================================================

pub fn pore_phase_key(phase: PhaseId) -> String {
    format!("pore.phase{phase}")
}

pub fn throat_phase_key(phase: PhaseId) -> String {
    format!("throat.phase{phase}")
}

pub fn throat_pair_key(pair: PhasePair) -> String {
    format!("throat.phase{pair}")
}

pub fn interface_area_key(pair: PhasePair) -> String {
    format!("pore.p{pair}_area")
}

pub fn face_key(face: Face) -> String {
    format!("pore.{}", face.name())
}

// ============================================================================
// Property map
// ============================================================================

/// Every network attribute under its flat dictionary key.
pub fn to_property_map(network: &PoreNetwork) -> PropertyMap {
    let pores = &network.pores;
    let throats = &network.throats;
    let mut map = PropertyMap::new();

    map.insert("pore.coords".into(), Value::from(pores.coords.clone()));
    map.insert("pore.label".into(), Value::from(pores.label.clone()));
    map.insert("pore.volume".into(), Value::from(pores.volume.clone()));
    map.insert("pore.inscribed_diameter".into(), Value::from(pores.inscribed_diameter.clone()));
    map.insert("pore.equivalent_diameter".into(), Value::from(pores.equivalent_diameter.clone()));
    if let Some(area) = &pores.surface_area {
        map.insert("pore.surface_area".into(), Value::from(area.clone()));
    }
    map.insert("pore.boundary".into(), Value::from(pores.boundary.clone()));
    for (&phase, flags) in &pores.phase {
        map.insert(pore_phase_key(phase), Value::from(flags.clone()));
    }
    for (&face, flags) in &pores.face {
        map.insert(face_key(face), Value::from(flags.clone()));
    }
    for (&pair, areas) in &pores.interface_area {
        map.insert(interface_area_key(pair), Value::from(areas.clone()));
    }

    map.insert("throat.conns".into(), Value::from(throats.conns.clone()));
    map.insert("throat.area".into(), Value::from(throats.area.clone()));
    map.insert("throat.inscribed_diameter".into(), Value::from(throats.inscribed_diameter.clone()));
    map.insert("throat.boundary".into(), Value::from(throats.boundary.clone()));
    for (&phase, flags) in &throats.phase {
        map.insert(throat_phase_key(phase), Value::from(flags.clone()));
    }
    for (&pair, flags) in &throats.phase_pair {
        map.insert(throat_pair_key(pair), Value::from(flags.clone()));
    }

    map
}

// ============================================================================
// JSON
// ============================================================================

/// The flat dictionary as a JSON object of plain arrays.
pub fn to_json(network: &PoreNetwork) -> serde_json::Value {
    let map = to_property_map(network)
        .iter()
        .map(|(k, v)| (k.clone(), value_to_json(v)))
        .collect();
    serde_json::Value::Object(map)
}

pub fn write_json(network: &PoreNetwork, writer: &mut dyn Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, &to_json(network))?;
    writeln!(writer)?;
    Ok(())
}

fn value_to_json(v: &Value) -> serde_json::Value {
    match v {
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Int(i) => serde_json::json!(*i),
        Value::Float(f) => serde_json::json!(*f),
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Null => serde_json::Value::Null,
        Value::List(l) => serde_json::Value::Array(l.iter().map(value_to_json).collect()),
        Value::Map(m) => {
            let mut map = serde_json::Map::new();
            for (k, v) in m.iter() {
                map.insert(k.clone(), value_to_json(v));
            }
            serde_json::Value::Object(map)
        }
    }
}

// ============================================================================
// Arrow
// ============================================================================

/// Column-per-attribute record batches. Coordinates and connections are
/// split into one column per component.
#[cfg(feature = "arrow-results")]
pub mod arrow {
    use std::sync::Arc;

    use arrow_array::{ArrayRef, BooleanArray, Float64Array, RecordBatch, UInt32Array, UInt64Array};
    use arrow_schema::{DataType, Field, Schema};

    use super::*;
    use crate::Error;

    struct Columns {
        fields: Vec<Field>,
        arrays: Vec<ArrayRef>,
    }

    impl Columns {
        fn new() -> Self {
            Self { fields: Vec::new(), arrays: Vec::new() }
        }

        fn push(&mut self, name: impl Into<String>, data_type: DataType, array: ArrayRef) {
            self.fields.push(Field::new(name, data_type, false));
            self.arrays.push(array);
        }

        fn float(&mut self, name: impl Into<String>, values: Vec<f64>) {
            self.push(name, DataType::Float64, Arc::new(Float64Array::from(values)));
        }

        fn flag(&mut self, name: impl Into<String>, values: Vec<bool>) {
            self.push(name, DataType::Boolean, Arc::new(BooleanArray::from(values)));
        }

        fn finish(self) -> Result<RecordBatch> {
            RecordBatch::try_new(Arc::new(Schema::new(self.fields)), self.arrays)
                .map_err(|e| Error::ExportError(e.to_string()))
        }
    }

    pub fn pore_batch(network: &PoreNetwork) -> Result<RecordBatch> {
        let pores = &network.pores;
        let mut cols = Columns::new();
        for (axis, name) in ["pore.coords_x", "pore.coords_y", "pore.coords_z"].into_iter().enumerate() {
            cols.float(name, pores.coords.iter().map(|c| c[axis]).collect());
        }
        cols.push("pore.label", DataType::UInt32, Arc::new(UInt32Array::from(pores.label.clone())));
        cols.float("pore.volume", pores.volume.clone());
        cols.float("pore.inscribed_diameter", pores.inscribed_diameter.clone());
        cols.float("pore.equivalent_diameter", pores.equivalent_diameter.clone());
        if let Some(area) = &pores.surface_area {
            cols.float("pore.surface_area", area.clone());
        }
        cols.flag("pore.boundary", pores.boundary.clone());
        for (&phase, flags) in &pores.phase {
            cols.flag(pore_phase_key(phase), flags.clone());
        }
        for (&face, flags) in &pores.face {
            cols.flag(face_key(face), flags.clone());
        }
        for (&pair, areas) in &pores.interface_area {
            cols.float(interface_area_key(pair), areas.clone());
        }
        cols.finish()
    }

    pub fn throat_batch(network: &PoreNetwork) -> Result<RecordBatch> {
        let throats = &network.throats;
        let mut cols = Columns::new();
        for (end, name) in ["throat.conns_0", "throat.conns_1"].into_iter().enumerate() {
            let ids: Vec<u64> = throats.conns.iter().map(|c| c[end] as u64).collect();
            cols.push(name, DataType::UInt64, Arc::new(UInt64Array::from(ids)));
        }
        cols.float("throat.area", throats.area.clone());
        cols.float("throat.inscribed_diameter", throats.inscribed_diameter.clone());
        cols.flag("throat.boundary", throats.boundary.clone());
        for (&phase, flags) in &throats.phase {
            cols.flag(throat_phase_key(phase), flags.clone());
        }
        for (&pair, flags) in &throats.phase_pair {
            cols.flag(throat_pair_key(pair), flags.clone());
        }
        cols.finish()
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use super::super::tests::sample;

        #[test]
        fn test_pore_batch_columns() {
            let batch = pore_batch(&sample()).unwrap();
            assert_eq!(batch.num_rows(), 3);
            assert!(batch.schema().field_with_name("pore.phase1").is_ok());
            assert!(batch.schema().field_with_name("pore.p1_2_area").is_ok());
        }

        #[test]
        fn test_throat_batch_columns() {
            let batch = throat_batch(&sample()).unwrap();
            assert_eq!(batch.num_rows(), 2);
            assert!(batch.schema().field_with_name("throat.phase1_2").is_ok());
        }
    }
}
