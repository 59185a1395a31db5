use crossterm::style::Color;

/// Color theme for the board and overlays
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    /// Cell borders
    pub border: Color,
    /// Clue digits
    pub clue: Color,
    /// Player-entered digits
    pub filled: Color,
    /// Inequality markers between cells
    pub marker: Color,
    /// Cell under the cursor
    pub cursor_bg: Color,
    /// Cell selected for entry
    pub selected_bg: Color,
    /// Overlay panels
    pub panel_bg: Color,
    pub success: Color,
    /// Timer and info text
    pub info: Color,
    /// Key binding text
    pub key: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            bg: Color::Rgb { r: 20, g: 22, b: 30 },
            fg: Color::Rgb { r: 230, g: 230, b: 240 },
            border: Color::Rgb { r: 90, g: 95, b: 115 },
            clue: Color::Rgb { r: 255, g: 255, b: 255 },
            filled: Color::Rgb { r: 80, g: 180, b: 255 },
            marker: Color::Rgb { r: 255, g: 170, b: 80 },
            cursor_bg: Color::Rgb { r: 45, g: 50, b: 70 },
            selected_bg: Color::Rgb { r: 70, g: 90, b: 140 },
            panel_bg: Color::Rgb { r: 30, g: 34, b: 48 },
            success: Color::Rgb { r: 90, g: 255, b: 130 },
            info: Color::Rgb { r: 160, g: 165, b: 185 },
            key: Color::Rgb { r: 255, g: 210, b: 100 },
        }
    }

    pub fn light() -> Self {
        Self {
            bg: Color::Rgb { r: 248, g: 248, b: 252 },
            fg: Color::Rgb { r: 30, g: 30, b: 40 },
            border: Color::Rgb { r: 150, g: 150, b: 170 },
            clue: Color::Rgb { r: 0, g: 0, b: 0 },
            filled: Color::Rgb { r: 30, g: 100, b: 200 },
            marker: Color::Rgb { r: 200, g: 100, b: 20 },
            cursor_bg: Color::Rgb { r: 225, g: 228, b: 240 },
            selected_bg: Color::Rgb { r: 180, g: 200, b: 255 },
            panel_bg: Color::Rgb { r: 235, g: 236, b: 245 },
            success: Color::Rgb { r: 40, g: 160, b: 60 },
            info: Color::Rgb { r: 90, g: 90, b: 110 },
            key: Color::Rgb { r: 200, g: 120, b: 20 },
        }
    }

    /// The other theme
    pub fn toggled(&self) -> Self {
        if *self == Self::dark() {
            Self::light()
        } else {
            Self::dark()
        }
    }
}
