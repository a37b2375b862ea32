//! The three recognized properties and their declaration tables.

use crate::params::ParameterSet;

/// A size property eligible for fluid interpolation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FluidProperty {
    FontSize,
    LineHeight,
    LetterSpacing,
}

/// Names of the four expanded longhand declarations for one property.
#[derive(Clone, Copy, Debug)]
pub struct LonghandNames {
    pub min_size: &'static str,
    pub max_size: &'static str,
    pub min_width: &'static str,
    pub max_width: &'static str,
}

impl FluidProperty {
    /// Match an exact (lowercased) property name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "font-size" => Some(Self::FontSize),
            "line-height" => Some(Self::LineHeight),
            "letter-spacing" => Some(Self::LetterSpacing),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::FontSize => "font-size",
            Self::LineHeight => "line-height",
            Self::LetterSpacing => "letter-spacing",
        }
    }

    /// Shorthand declaration carrying both width bounds, consumed on read.
    pub const fn range_name(self) -> &'static str {
        match self {
            Self::FontSize => "font-range",
            Self::LineHeight => "line-height-range",
            Self::LetterSpacing => "letter-spacing-range",
        }
    }

    /// Expanded longhand declarations, highest precedence, consumed on read.
    pub const fn longhand_names(self) -> LonghandNames {
        match self {
            Self::FontSize => LonghandNames {
                min_size: "min-font-size",
                max_size: "max-font-size",
                min_width: "lower-font-range",
                max_width: "upper-font-range",
            },
            Self::LineHeight => LonghandNames {
                min_size: "min-line-height",
                max_size: "max-line-height",
                min_width: "lower-line-height-range",
                max_width: "upper-line-height-range",
            },
            Self::LetterSpacing => LonghandNames {
                min_size: "min-letter-spacing",
                max_size: "max-letter-spacing",
                min_width: "lower-letter-spacing-range",
                max_width: "upper-letter-spacing-range",
            },
        }
    }

    /// Built-in defaults seeding parameter resolution.
    pub fn default_parameters(self) -> ParameterSet {
        let (min_size, max_size) = match self {
            Self::FontSize => ("12px", "21px"),
            Self::LineHeight => ("1.2em", "1.8em"),
            Self::LetterSpacing => ("0px", "4px"),
        };
        ParameterSet {
            min_size: min_size.to_owned(),
            max_size: max_size.to_owned(),
            min_width: "420px".to_owned(),
            max_width: "1280px".to_owned(),
        }
    }

    /// Name of the custom-property mirror inserted next to every
    /// synthesized declaration.
    pub fn custom_property_name(self) -> String {
        format!("--{}", self.name())
    }
}
