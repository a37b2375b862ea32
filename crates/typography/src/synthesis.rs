//! Rule synthesis: unit reconciliation, the `calc()` interpolation
//! expression and the two boundary media blocks.

use crate::diagnostics::{TransformError, Warning};
use crate::params::ParameterSet;
use crate::properties::FluidProperty;
use fluid_syntax::{AtRule, Declaration, Rule};
use fluid_values::{UnitKind, find_unit, magnitude_or_nan, px_to_rem};
use log::{debug, warn};

/// Everything synthesis produces for one fluid declaration. Spliced into
/// the tree by the apply phase.
#[derive(Debug)]
pub(crate) struct Synthesized {
    /// The `calc()` value replacing the original declaration value.
    pub fluid_value: String,
    /// `screen and (max-width: <min_width>)` pinning the minimum size.
    pub min_media: AtRule,
    /// `screen and (min-width: <max_width>)` pinning the maximum size.
    pub max_media: AtRule,
}

/// Synthesize the fluid rewrite for one declaration.
///
/// The `calc()` denominator follows the size unit family (px widths are
/// converted when sizes are in rem); the media query bounds always keep the
/// raw declared widths.
///
/// # Errors
/// Returns [`TransformError::UnitlessSize`] when the minimum size has no
/// recognizable unit. Unit mismatches and unsupported combinations are
/// advisory only and recorded on the warning sink.
pub(crate) fn synthesize(
    rule: &Rule,
    property: FluidProperty,
    params: &ParameterSet,
    root_size: &str,
    warnings: &mut Vec<Warning>,
) -> Result<Synthesized, TransformError> {
    let size_unit = find_unit(&params.min_size);
    let max_size_unit = find_unit(&params.max_size);
    let width_unit = find_unit(&params.min_width);
    let max_width_unit = find_unit(&params.max_width);

    if size_unit == UnitKind::Unrecognized {
        return Err(TransformError::UnitlessSize {
            selector: rule.selector.clone(),
            position: rule.position,
        });
    }

    if size_unit != max_size_unit || width_unit != max_width_unit {
        push_warning(warnings, rule, "min/max unit types must match");
    }

    let (lower_width, upper_width) = if size_unit == UnitKind::Rem && width_unit == UnitKind::Px {
        (
            px_to_rem(&params.min_width, root_size),
            px_to_rem(&params.max_width, root_size),
        )
    } else if size_unit == width_unit || (size_unit == UnitKind::Rem && width_unit == UnitKind::Em)
    {
        (params.min_width.clone(), params.max_width.clone())
    } else {
        // Min-side units govern; the raw bounds are kept rather than
        // leaving the denominator undefined.
        push_warning(warnings, rule, "this combination of units is not supported");
        (params.min_width.clone(), params.max_width.clone())
    };

    let size_diff = magnitude_or_nan(&params.max_size) - magnitude_or_nan(&params.min_size);
    let range_diff = magnitude_or_nan(&upper_width) - magnitude_or_nan(&lower_width);

    let fluid_value = format!(
        "calc({} + {size_diff} * ((100vw - {lower_width}) / {range_diff}))",
        params.min_size
    );

    debug!(
        "[FLUID] {} {}: {} .. {} over {} .. {}",
        rule.selector,
        property.name(),
        params.min_size,
        params.max_size,
        params.min_width,
        params.max_width
    );

    Ok(Synthesized {
        fluid_value,
        min_media: boundary_media(rule, property, "max-width", &params.min_width, &params.min_size),
        max_media: boundary_media(rule, property, "min-width", &params.max_width, &params.max_size),
    })
}

/// One boundary media block: a clone of the original selector pinning the
/// property and its custom-property mirror to the boundary size.
fn boundary_media(
    rule: &Rule,
    property: FluidProperty,
    feature: &str,
    width: &str,
    size: &str,
) -> AtRule {
    AtRule {
        name: "media".to_owned(),
        params: format!("screen and ({feature}: {width})"),
        rules: vec![Rule {
            selector: rule.selector.clone(),
            declarations: vec![
                Declaration {
                    name: property.name().to_owned(),
                    value: size.to_owned(),
                    important: false,
                },
                Declaration {
                    name: property.custom_property_name(),
                    value: size.to_owned(),
                    important: false,
                },
            ],
            position: rule.position,
        }],
    }
}

fn push_warning(warnings: &mut Vec<Warning>, rule: &Rule, text: &str) {
    warn!("[FLUID] {} {}: {text}", rule.selector, rule.position);
    warnings.push(Warning {
        text: text.to_owned(),
        selector: rule.selector.clone(),
        position: rule.position,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use fluid_syntax::Position;

    fn sample_rule() -> Rule {
        Rule {
            selector: ".foo".to_owned(),
            declarations: Vec::new(),
            position: Position { line: 1, column: 1 },
        }
    }

    fn parameters(min_size: &str, max_size: &str, min_width: &str, max_width: &str) -> ParameterSet {
        ParameterSet {
            min_size: min_size.to_owned(),
            max_size: max_size.to_owned(),
            min_width: min_width.to_owned(),
            max_width: max_width.to_owned(),
        }
    }

    /// Evaluate the interpolation by hand: at viewport == min_width the
    /// expression must collapse to min_size, at max_width to max_size.
    fn interpolate(min_size: f64, size_diff: f64, min_width: f64, range_diff: f64, viewport: f64) -> f64 {
        size_diff.mul_add((viewport - min_width) / range_diff, min_size)
    }

    #[test]
    fn px_sizes_with_px_widths_interpolate_between_bounds() {
        let mut warnings = Vec::new();
        let params = parameters("12px", "21px", "420px", "1280px");
        let synthesized = synthesize(
            &sample_rule(),
            FluidProperty::FontSize,
            &params,
            "16px",
            &mut warnings,
        )
        .unwrap();
        assert_eq!(
            synthesized.fluid_value,
            "calc(12px + 9 * ((100vw - 420px) / 860))"
        );
        assert!(warnings.is_empty());
        let low = interpolate(12.0, 9.0, 420.0, 860.0, 420.0);
        let high = interpolate(12.0, 9.0, 420.0, 860.0, 1280.0);
        assert!((low - 12.0).abs() < 1e-9);
        assert!((high - 21.0).abs() < 1e-9);
    }

    #[test]
    fn rem_sizes_convert_px_widths_using_the_root_size() {
        let mut warnings = Vec::new();
        let params = parameters("1rem", "2rem", "420px", "1280px");
        let synthesized = synthesize(
            &sample_rule(),
            FluidProperty::FontSize,
            &params,
            "20px",
            &mut warnings,
        )
        .unwrap();
        assert_eq!(
            synthesized.fluid_value,
            "calc(1rem + 1 * ((100vw - 21rem) / 43))"
        );
        // Media bounds keep the raw px widths.
        assert_eq!(
            synthesized.min_media.params,
            "screen and (max-width: 420px)"
        );
        assert_eq!(
            synthesized.max_media.params,
            "screen and (min-width: 1280px)"
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn rem_sizes_accept_em_widths_unchanged() {
        let mut warnings = Vec::new();
        let params = parameters("1rem", "2rem", "30em", "80em");
        let synthesized = synthesize(
            &sample_rule(),
            FluidProperty::FontSize,
            &params,
            "16px",
            &mut warnings,
        )
        .unwrap();
        assert_eq!(
            synthesized.fluid_value,
            "calc(1rem + 1 * ((100vw - 30em) / 50))"
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn unitless_min_size_is_fatal() {
        let mut warnings = Vec::new();
        let params = parameters("1.5", "2", "420px", "1280px");
        let error = synthesize(
            &sample_rule(),
            FluidProperty::LineHeight,
            &params,
            "16px",
            &mut warnings,
        )
        .unwrap_err();
        assert_eq!(
            error.to_string(),
            "1:1: sizes with unitless values are not supported"
        );
        assert_eq!(error.selector(), ".foo");
    }

    #[test]
    fn size_unit_mismatch_alone_warns_but_continues() {
        let mut warnings = Vec::new();
        let params = parameters("16px", "2em", "420px", "1280px");
        let synthesized = synthesize(
            &sample_rule(),
            FluidProperty::FontSize,
            &params,
            "16px",
            &mut warnings,
        )
        .unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].text, "min/max unit types must match");
        // parseFloat("2em") - parseFloat("16px") == -14
        assert_eq!(
            synthesized.fluid_value,
            "calc(16px + -14 * ((100vw - 420px) / 860))"
        );
    }

    #[test]
    fn unsupported_combination_warns_and_keeps_raw_widths() {
        let mut warnings = Vec::new();
        let params = parameters("14px", "28px", "30rem", "80rem");
        let synthesized = synthesize(
            &sample_rule(),
            FluidProperty::FontSize,
            &params,
            "16px",
            &mut warnings,
        )
        .unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].text, "this combination of units is not supported");
        assert_eq!(
            synthesized.fluid_value,
            "calc(14px + 14 * ((100vw - 30rem) / 50))"
        );
    }

    #[test]
    fn media_blocks_mirror_the_custom_property() {
        let mut warnings = Vec::new();
        let params = parameters("12px", "21px", "420px", "1280px");
        let synthesized = synthesize(
            &sample_rule(),
            FluidProperty::FontSize,
            &params,
            "16px",
            &mut warnings,
        )
        .unwrap();
        let boundary = &synthesized.min_media.rules[0];
        assert_eq!(boundary.selector, ".foo");
        assert_eq!(boundary.declarations[0].name, "font-size");
        assert_eq!(boundary.declarations[0].value, "12px");
        assert_eq!(boundary.declarations[1].name, "--font-size");
        assert_eq!(boundary.declarations[1].value, "12px");
    }
}
