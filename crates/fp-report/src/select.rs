//! Gathering result values for an element selection.

use fp_core::{CoreError, CoreResult};
use fp_model::Element;

/// Fetch `values[e.seq]` for each element, in selection order.
///
/// The output has the same length and order as `elements`; callers zip it
/// positionally with element IDs and part IDs. A sequential index outside the
/// array is a data-consistency violation (the selection and the array must
/// come from the same model) and fails loudly rather than wrapping or
/// truncating.
pub fn select(values: &[f64], elements: &[Element]) -> CoreResult<Vec<f64>> {
    let mut out = Vec::with_capacity(elements.len());
    for element in elements {
        let ix = element.seq.index();
        let value = values.get(ix).ok_or(CoreError::IndexOob {
            what: "element sequential index vs result array",
            index: ix,
            len: values.len(),
        })?;
        out.push(*value);
    }
    Ok(out)
}
