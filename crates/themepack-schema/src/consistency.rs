//! # Relation Consistency
//!
//! A relation field's schema type must agree with the cardinality its UI
//! metadata declares: `isMultiple: true` requires an array, anything else
//! forbids one. Optional and defaulted wrappers are looked through.

use crate::descriptor::SchemaDescriptor;
use crate::error::{Cardinality, ConsistencyError};
use crate::ui::UiSchema;

/// Check every relation field of `ui` against `schema`.
///
/// UI keys that name no schema field are ignored.
///
/// # Errors
///
/// Returns [`ConsistencyError::CardinalityMismatch`] for the first field
/// (in UI key order) whose arrayness disagrees with `isMultiple`.
pub fn check_consistency(
    schema: &dyn SchemaDescriptor,
    ui: Option<&UiSchema>,
    name: &str,
) -> Result<(), ConsistencyError> {
    let Some(ui) = ui else {
        return Ok(());
    };

    for (field, relation) in ui.relations() {
        let Some(descriptor) = schema.field(field) else {
            continue;
        };
        let is_array = descriptor.unwrap_optional().is_array();
        let expected = match (relation.multiple, is_array) {
            (true, false) => Cardinality::Many,
            (false, true) => Cardinality::One,
            _ => continue,
        };
        return Err(ConsistencyError::CardinalityMismatch {
            schema_name: name.to_string(),
            field: field.to_string(),
            expected,
        });
    }
    Ok(())
}
