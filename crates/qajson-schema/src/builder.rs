//! Starting points for programmatically assembled documents.

use qajson_core::Root;

use crate::error::SchemaError;
use crate::locator::SchemaLocator;

/// The smallest valid document at the newest available schema version:
/// empty `raw_data` and `survey_products`, no `chart_adequacy`.
///
/// # Errors
///
/// [`SchemaError::NotFound`] if the locator has no bundles.
pub fn minimal_document(locator: &SchemaLocator) -> Result<Root, SchemaError> {
    let version = locator.latest_version()?;
    Ok(Root::minimal(version))
}
