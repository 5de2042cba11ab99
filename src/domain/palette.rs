use crate::domain::HexColor;

/// Ordered, duplicate-free list of saved colors. Insertion order is the
/// order colors are shown and exported in.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Palette {
    colors: Vec<HexColor>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AddOutcome {
    Added(HexColor),
    AlreadyPresent(HexColor),
}

impl AddOutcome {
    pub fn notice(&self) -> String {
        match self {
            Self::Added(color) => format!("Added {color} to palette"),
            Self::AlreadyPresent(color) => format!("{color} already in palette"),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ClearOutcome {
    AlreadyEmpty,
    Declined,
    Cleared { removed: usize },
}

pub const CLEAR_CONFIRM_PROMPT: &str = "Clear all saved colors?";

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a palette from colors in order, dropping repeats.
    pub fn from_colors(colors: impl IntoIterator<Item = HexColor>) -> Self {
        let mut palette = Self::new();
        for color in colors {
            let _ = palette.add(color);
        }
        palette
    }

    pub fn colors(&self) -> &[HexColor] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn contains(&self, color: &HexColor) -> bool {
        self.colors.contains(color)
    }

    pub fn add(&mut self, color: HexColor) -> AddOutcome {
        if self.contains(&color) {
            return AddOutcome::AlreadyPresent(color);
        }
        self.colors.push(color.clone());
        AddOutcome::Added(color)
    }

    /// Indices come from a list the caller just rendered; anything out of
    /// range is ignored.
    pub fn remove_at(&mut self, index: usize) -> Option<HexColor> {
        if index >= self.colors.len() {
            return None;
        }
        Some(self.colors.remove(index))
    }

    pub fn clear(&mut self) -> usize {
        let removed = self.colors.len();
        self.colors.clear();
        removed
    }

    /// `None` when there is nothing to export.
    pub fn to_css_variables(&self) -> Option<String> {
        if self.colors.is_empty() {
            return None;
        }
        Some(format_css_variables(&self.colors))
    }
}

pub fn format_css_variables(colors: &[HexColor]) -> String {
    let body = colors
        .iter()
        .enumerate()
        .map(|(idx, color)| format!("  --color-{}: {color};", idx + 1))
        .collect::<Vec<_>>()
        .join("\n");
    format!(":root {{\n{body}\n}}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color(value: &str) -> HexColor {
        HexColor::parse(value).expect("valid color")
    }

    #[test]
    fn add_dedups_case_insensitively() {
        let mut palette = Palette::new();
        assert_eq!(
            palette.add(color("#ABCDEF")),
            AddOutcome::Added(color("#ABCDEF"))
        );
        let second = palette.add(color("#abcdef"));
        assert_eq!(second, AddOutcome::AlreadyPresent(color("#ABCDEF")));
        assert_eq!(second.notice(), "#ABCDEF already in palette");
        assert_eq!(palette.len(), 1);
    }

    #[test]
    fn remove_at_returns_removed_color_and_keeps_order() {
        let mut palette =
            Palette::from_colors([color("#AAAAAA"), color("#BBBBBB"), color("#CCCCCC")]);
        assert_eq!(palette.remove_at(0), Some(color("#AAAAAA")));
        assert_eq!(palette.colors(), &[color("#BBBBBB"), color("#CCCCCC")]);
    }

    #[test]
    fn remove_at_ignores_out_of_range_index() {
        let mut palette = Palette::from_colors([color("#AAAAAA")]);
        assert_eq!(palette.remove_at(1), None);
        assert_eq!(palette.len(), 1);
    }

    #[test]
    fn from_colors_drops_repeats() {
        let palette = Palette::from_colors([color("#111111"), color("#222222"), color("#111111")]);
        assert_eq!(palette.colors(), &[color("#111111"), color("#222222")]);
    }

    #[test]
    fn exports_css_variables_in_order() {
        let palette = Palette::from_colors([color("#111111"), color("#222222")]);
        assert_eq!(
            palette.to_css_variables().as_deref(),
            Some(":root {\n  --color-1: #111111;\n  --color-2: #222222;\n}")
        );
    }

    #[test]
    fn export_of_empty_palette_is_refused() {
        assert_eq!(Palette::new().to_css_variables(), None);
    }
}
