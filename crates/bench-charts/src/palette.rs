//! Fixed component colors.

use indexmap::IndexMap;
use plotters::style::RGBColor;

/// Default categorical palette (matplotlib "tab10").
pub const PALETTE: [RGBColor; 10] = [
    RGBColor(0x1f, 0x77, 0xb4),
    RGBColor(0xff, 0x7f, 0x0e),
    RGBColor(0x2c, 0xa0, 0x2c),
    RGBColor(0xd6, 0x27, 0x28),
    RGBColor(0x94, 0x67, 0xbd),
    RGBColor(0x8c, 0x56, 0x4b),
    RGBColor(0xe3, 0x77, 0xc2),
    RGBColor(0x7f, 0x7f, 0x7f),
    RGBColor(0xbc, 0xbd, 0x22),
    RGBColor(0x17, 0xbe, 0xcf),
];

/// Ordered mapping from component name to color.
///
/// Built once per run so that a component is drawn with the same color on every chart.
#[derive(Clone)]
pub struct ColorMap {
    colors: IndexMap<String, RGBColor>,
}

impl ColorMap {
    /// Assigns palette colors to components in order, cycling if there are more than ten.
    pub fn new<S: AsRef<str>>(components: &[S]) -> Self {
        let colors = components
            .iter()
            .zip(PALETTE.iter().cycle())
            .map(|(name, color)| (name.as_ref().to_string(), *color))
            .collect();
        Self { colors }
    }

    /// Returns the color of a component. Unknown components get the last palette color.
    pub fn color(&self, component: &str) -> RGBColor {
        self.colors.get(component).copied().unwrap_or(PALETTE[PALETTE.len() - 1])
    }

    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.colors.keys().map(|s| s.as_str())
    }
}
