use yansi::Paint;

/// Color palette for consistent theming
pub struct ColorPalette {
    pub primary: (u8, u8, u8),   // source paths, muted text
    pub secondary: (u8, u8, u8), // headers, arrows
    pub timestamp: (u8, u8, u8), // identity prefix of destinations
    pub highlight: (u8, u8, u8), // slug part of destinations
}

impl ColorPalette {
    pub const CATPPUCCIN: Self = Self {
        primary: (108, 112, 134),   // Gray
        secondary: (148, 226, 213), // Teal
        timestamp: (137, 180, 250), // Blue
        highlight: (243, 139, 168), // Pink
    };
}

/// Formatting context for the run report
pub struct FormatContext {
    pub use_color: bool,
    pub palette: ColorPalette,
}

impl FormatContext {
    pub fn new(use_color: bool) -> Self {
        Self { use_color, palette: ColorPalette::CATPPUCCIN }
    }

    fn rgb(&self, text: &str, (r, g, b): (u8, u8, u8)) -> String {
        if self.use_color {
            Paint::rgb(text, r, g, b).to_string()
        } else {
            text.to_string()
        }
    }

    pub fn format_source(&self, path: &str) -> String {
        self.rgb(path, self.palette.primary)
    }

    /// Destination with the `<id>-` prefix and the rest colored apart.
    pub fn format_destination(&self, path: &str) -> String {
        if !self.use_color {
            return path.to_string();
        }
        let name_start = path.rfind('/').map(|i| i + 1).unwrap_or(0);
        let (dir, name) = path.split_at(name_start);
        let split = name.find('-').map(|i| i + 1).unwrap_or(0);
        let (id, rest) = name.split_at(split);
        format!(
            "{}{}{}",
            self.rgb(dir, self.palette.primary),
            self.rgb(id, self.palette.timestamp),
            self.rgb(rest, self.palette.highlight)
        )
    }

    /// One `source  ->  destination` report line.
    pub fn format_mapping(&self, src: &str, dst: &str) -> String {
        format!(
            "{}  {}  {}",
            self.format_source(src),
            self.format_header("->"),
            self.format_destination(dst)
        )
    }

    pub fn format_header(&self, text: &str) -> String {
        if self.use_color {
            let (r, g, b) = self.palette.secondary;
            Paint::rgb(text, r, g, b).bold().to_string()
        } else {
            text.to_string()
        }
    }
}
