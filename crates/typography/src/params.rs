//! Parameter resolution: defaults → inline fluid sizes → shorthand range →
//! expanded longhands, later sources overwriting earlier ones.

use crate::properties::FluidProperty;
use fluid_syntax::Rule;
use fluid_values::scan_dimension_tokens;

/// Fully resolved bounds for one fluid declaration. All four fields are
/// populated once resolution finishes; the built-in defaults guarantee it.
/// Constructed fresh per matched declaration and consumed by synthesis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParameterSet {
    pub min_size: String,
    pub max_size: String,
    pub min_width: String,
    pub max_width: String,
}

/// Resolution result: the parameter set plus the indices of the consumed
/// shorthand/longhand declarations, removed from the rule in the apply
/// phase (they must never appear in output).
pub(crate) struct ResolvedParameters {
    pub params: ParameterSet,
    pub consumed: Vec<usize>,
}

pub(crate) fn resolve_parameters(rule: &Rule, property: FluidProperty) -> ResolvedParameters {
    let mut params = property.default_parameters();
    let mut consumed: Vec<usize> = Vec::new();

    // Inline sizes from the fluid declaration itself. A missing token keeps
    // the field at its prior value; duplicates resolve last-wins.
    for declaration in &rule.declarations {
        if declaration.name == property.name() && declaration.value.contains("fluid") {
            let tokens = scan_dimension_tokens(&declaration.value);
            if let Some(first) = tokens.first() {
                params.min_size = first.clone();
            }
            if let Some(second) = tokens.get(1) {
                params.max_size = second.clone();
            }
        }
    }

    // Shorthand range: both width bounds in one whitespace-separated value.
    for (index, declaration) in rule.declarations.iter().enumerate() {
        if declaration.name == property.range_name() {
            let mut bounds = declaration.value.split_whitespace();
            if let Some(lower) = bounds.next() {
                params.min_width = lower.to_owned();
            }
            if let Some(upper) = bounds.next() {
                params.max_width = upper.to_owned();
            }
            consumed.push(index);
        }
    }

    // Expanded longhands, highest precedence.
    let longhands = property.longhand_names();
    for (index, declaration) in rule.declarations.iter().enumerate() {
        let name = declaration.name.as_str();
        let value = declaration.value.trim();
        if name == longhands.min_size {
            params.min_size = value.to_owned();
        } else if name == longhands.max_size {
            params.max_size = value.to_owned();
        } else if name == longhands.min_width {
            params.min_width = value.to_owned();
        } else if name == longhands.max_width {
            params.max_width = value.to_owned();
        } else {
            continue;
        }
        consumed.push(index);
    }

    ResolvedParameters { params, consumed }
}
