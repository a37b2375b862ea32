//! Fluid typography transform.
//!
//! Rewrites declarative `fluid` sizing shorthand on `font-size`,
//! `line-height` and `letter-spacing` into viewport-responsive output: a
//! `calc()` interpolation expression, a custom-property mirror, and two
//! boundary media queries clamping the value outside the configured
//! viewport range.
//!
//! The transform is a single synchronous tree-to-tree rewrite. It runs in
//! two phases: a read-only plan phase that resolves parameters and
//! synthesizes replacement nodes for every fluid declaration, and an apply
//! phase that splices them in. A fatal error aborts during planning, so the
//! document is never left half-rewritten.

#![forbid(unsafe_code)]

use fluid_syntax::{Declaration, Node, Rule, Stylesheet};
use log::debug;

mod diagnostics;
mod params;
mod properties;
mod synthesis;

pub use diagnostics::{TransformError, Warning};
pub use fluid_syntax::Position;
pub use params::ParameterSet;
pub use properties::{FluidProperty, LonghandNames};

use params::resolve_parameters;
use synthesis::{Synthesized, synthesize};

/// Transform options. Accepted by both entry points; currently carries no
/// knobs (all behavior is default-driven) and exists so the call signature
/// stays stable when knobs arrive.
#[derive(Clone, Copy, Debug, Default)]
#[non_exhaustive]
pub struct Options {}

/// Result of [`transform_css`]: serialized output plus the warnings
/// recorded along the way.
#[derive(Clone, Debug)]
pub struct TransformOutput {
    pub css: String,
    pub warnings: Vec<Warning>,
}

/// Root font size assumed when no `:root`/`html` rule overrides it.
const DEFAULT_ROOT_SIZE: &str = "16px";

/// One planned rewrite: everything needed to splice a fluid declaration
/// without mutating the tree during the walk.
struct DeclarationPlan {
    node_index: usize,
    declaration_index: usize,
    property: FluidProperty,
    consumed: Vec<usize>,
    synthesized: Synthesized,
}

/// Per-invocation pass state. The root size lives here rather than in
/// process-wide state, so repeated invocations in one process cannot leak
/// into each other.
struct TransformPass {
    root_size: String,
    warnings: Vec<Warning>,
}

impl TransformPass {
    fn new() -> Self {
        Self {
            root_size: DEFAULT_ROOT_SIZE.to_owned(),
            warnings: Vec::new(),
        }
    }

    /// Stage 1: record the document root font size for px→rem conversion.
    /// Only top-level `:root`/`html` rules with a pixel font-size count;
    /// the last one encountered wins. The source declaration stays.
    fn detect_root_size(&mut self, sheet: &Stylesheet) {
        for node in &sheet.nodes {
            let Node::Rule(rule) = node else { continue };
            let selector = rule.selector.trim();
            if selector != ":root" && selector != "html" {
                continue;
            }
            for declaration in &rule.declarations {
                if declaration.name == "font-size" && declaration.value.contains("px") {
                    self.root_size = declaration.value.clone();
                    debug!("[FLUID] root font size {} ({selector})", self.root_size);
                }
            }
        }
    }

    /// Stages 2+3: resolve and synthesize every fluid declaration. No tree
    /// mutation happens here, so a fatal error leaves the document
    /// untouched.
    fn plan(&mut self, sheet: &Stylesheet) -> Result<Vec<DeclarationPlan>, TransformError> {
        let mut plans: Vec<DeclarationPlan> = Vec::new();
        for (node_index, node) in sheet.nodes.iter().enumerate() {
            let Node::Rule(rule) = node else { continue };
            for (declaration_index, declaration) in rule.declarations.iter().enumerate() {
                let Some(property) = FluidProperty::from_name(&declaration.name) else {
                    continue;
                };
                if !declaration.value.contains("fluid") {
                    continue;
                }
                let resolved = resolve_parameters(rule, property);
                let synthesized = synthesize(
                    rule,
                    property,
                    &resolved.params,
                    &self.root_size,
                    &mut self.warnings,
                )?;
                plans.push(DeclarationPlan {
                    node_index,
                    declaration_index,
                    property,
                    consumed: resolved.consumed,
                    synthesized,
                });
            }
        }
        Ok(plans)
    }
}

/// Transform a stylesheet tree in place.
///
/// Returns the advisory warnings recorded during the rewrite.
///
/// # Errors
/// Returns [`TransformError`] when a fluid minimum size has no recognizable
/// unit. The tree is left unmodified in that case.
pub fn transform(
    sheet: &mut Stylesheet,
    _options: &Options,
) -> Result<Vec<Warning>, TransformError> {
    let mut pass = TransformPass::new();
    pass.detect_root_size(sheet);
    let plans = pass.plan(sheet)?;
    apply(sheet, plans);
    Ok(pass.warnings)
}

/// Parse, transform and serialize in one call.
///
/// # Errors
/// Fails on the same fatal condition as [`transform`]; the typed
/// [`TransformError`] stays reachable through `downcast_ref`.
pub fn transform_css(css: &str, options: &Options) -> anyhow::Result<TransformOutput> {
    let mut sheet = fluid_syntax::parse_stylesheet(css);
    let warnings = transform(&mut sheet, options)?;
    Ok(TransformOutput {
        css: sheet.to_css_string(),
        warnings,
    })
}

/// Apply phase: splice planned rewrites, processing rules in reverse
/// document order so node indices stay valid across sibling insertions.
fn apply(sheet: &mut Stylesheet, mut plans: Vec<DeclarationPlan>) {
    while let Some(node_index) = plans.last().map(|plan| plan.node_index) {
        let first = plans
            .iter()
            .position(|plan| plan.node_index == node_index)
            .unwrap_or(plans.len() - 1);
        let group = plans.split_off(first);
        apply_to_rule(sheet, node_index, group);
    }
}

/// Rebuild one rule's declaration list (dropping consumed range/longhand
/// declarations, replacing each fluid declaration and appending its
/// mirror), then insert the boundary media blocks directly after the rule.
fn apply_to_rule(sheet: &mut Stylesheet, node_index: usize, group: Vec<DeclarationPlan>) {
    if let Some(Node::Rule(rule)) = sheet.nodes.get_mut(node_index) {
        rebuild_declarations(rule, &group);
    } else {
        return;
    }

    // Repeated insert-after: a later declaration's block pair lands closer
    // to the rule, and within a pair the min-width block precedes the
    // max-width block.
    for plan in group {
        let Synthesized {
            min_media,
            max_media,
            ..
        } = plan.synthesized;
        sheet.nodes.insert(node_index + 1, Node::AtRule(min_media));
        sheet.nodes.insert(node_index + 1, Node::AtRule(max_media));
    }
}

fn rebuild_declarations(rule: &mut Rule, group: &[DeclarationPlan]) {
    let old = core::mem::take(&mut rule.declarations);
    let mut rebuilt: Vec<Declaration> = Vec::with_capacity(old.len() + group.len());
    for (index, declaration) in old.into_iter().enumerate() {
        if group.iter().any(|plan| plan.consumed.contains(&index)) {
            continue;
        }
        if let Some(plan) = group
            .iter()
            .find(|plan| plan.declaration_index == index)
        {
            rebuilt.push(Declaration {
                name: declaration.name,
                value: plan.synthesized.fluid_value.clone(),
                important: false,
            });
            rebuilt.push(Declaration {
                name: plan.property.custom_property_name(),
                value: plan.synthesized.fluid_value.clone(),
                important: false,
            });
        } else {
            rebuilt.push(declaration);
        }
    }
    rule.declarations = rebuilt;
}
