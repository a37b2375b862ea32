//! Fixture tests: whole-document comparison of transform output.
//!
//! Each case pairs an input stylesheet with the exact serialized output,
//! pinning the calc() expressions, the custom-property mirrors and the
//! media-block sibling order literally.

use fluid_typography::{Options, transform_css};

fn run_fixture(input: &str, expected: &str) {
    let _ = env_logger::builder().is_test(true).try_init();
    let output = transform_css(input, &Options::default()).unwrap();
    assert_eq!(output.css, expected);
    assert!(
        output.warnings.is_empty(),
        "unexpected warnings: {:?}",
        output.warnings
    );
}

fn run_fixture_with_warnings(input: &str, expected: &str, warning_texts: &[&str]) {
    let _ = env_logger::builder().is_test(true).try_init();
    let output = transform_css(input, &Options::default()).unwrap();
    assert_eq!(output.css, expected);
    let recorded: Vec<&str> = output
        .warnings
        .iter()
        .map(|warning| warning.text.as_str())
        .collect();
    assert_eq!(recorded, warning_texts);
}

#[test]
fn builds_fluid_type_with_defaults() {
    run_fixture(
        include_str!("fixtures/default.css"),
        include_str!("fixtures/default.expected.css"),
    );
}

#[test]
fn applies_custom_parameters() {
    run_fixture(
        include_str!("fixtures/custom.css"),
        include_str!("fixtures/custom.expected.css"),
    );
}

#[test]
fn works_with_shorthand_properties() {
    run_fixture(
        include_str!("fixtures/shorthand.css"),
        include_str!("fixtures/shorthand.expected.css"),
    );
}

#[test]
fn handles_mixed_units_with_a_warning() {
    run_fixture_with_warnings(
        include_str!("fixtures/mixed.css"),
        include_str!("fixtures/mixed.expected.css"),
        &["this combination of units is not supported"],
    );
}

#[test]
fn handles_em_units() {
    run_fixture(
        include_str!("fixtures/em.css"),
        include_str!("fixtures/em.expected.css"),
    );
}

#[test]
fn calculates_rem_from_the_root_font_size() {
    run_fixture(
        include_str!("fixtures/root.css"),
        include_str!("fixtures/root.expected.css"),
    );
}

#[test]
fn keeps_fallback_duplicate_properties() {
    run_fixture(
        include_str!("fixtures/fallback.css"),
        include_str!("fixtures/fallback.expected.css"),
    );
}

#[test]
fn sanitizes_messy_input() {
    run_fixture(
        include_str!("fixtures/formatting.css"),
        include_str!("fixtures/formatting.expected.css"),
    );
}

#[test]
fn sets_fluid_line_height() {
    run_fixture(
        include_str!("fixtures/lineheight.css"),
        include_str!("fixtures/lineheight.expected.css"),
    );
}

#[test]
fn sets_fluid_line_height_with_extended_syntax() {
    run_fixture(
        include_str!("fixtures/lineheight_extended.css"),
        include_str!("fixtures/lineheight_extended.expected.css"),
    );
}

#[test]
fn sets_fluid_letter_spacing() {
    run_fixture(
        include_str!("fixtures/letterspacing.css"),
        include_str!("fixtures/letterspacing.expected.css"),
    );
}

#[test]
fn sets_fluid_letter_spacing_with_extended_syntax() {
    run_fixture(
        include_str!("fixtures/letterspacing_extended.css"),
        include_str!("fixtures/letterspacing_extended.expected.css"),
    );
}

#[test]
fn sets_fluid_letter_spacing_with_negative_values() {
    run_fixture(
        include_str!("fixtures/letterspacing_negative.css"),
        include_str!("fixtures/letterspacing_negative.expected.css"),
    );
}

#[test]
fn transforms_every_rule_in_a_document() {
    run_fixture(
        include_str!("fixtures/document.css"),
        include_str!("fixtures/document.expected.css"),
    );
}
