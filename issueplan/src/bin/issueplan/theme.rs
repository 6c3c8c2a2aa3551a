use colored::Color;

/// Palette shared by `--help` rendering and status lines.
pub struct Palette {
    pub ok: Color,
    pub failure: Color,
    pub caution: Color,
    pub note: Color,
    pub heading: Color,
    pub dim: Color,
    pub accent: Color,
    pub command: Color,
    pub env_name: Color,
    pub env_text: Color,
}

pub const PALETTE: Palette = Palette {
    ok: Color::Green,
    failure: Color::Red,
    caution: Color::Yellow,
    note: Color::Blue,
    heading: Color::Cyan,
    dim: Color::BrightBlack,
    accent: Color::BrightBlue,
    command: Color::Magenta,
    env_name: Color::BrightCyan,
    env_text: Color::White,
};

/// Status line glyphs.
pub struct Glyphs {
    pub ok: &'static str,
    pub failure: &'static str,
    pub caution: &'static str,
    pub note: &'static str,
    pub arrow: &'static str,
    pub bullet: &'static str,
    pub pending: &'static str,
}

pub const GLYPHS: Glyphs = Glyphs {
    ok: "✓",
    failure: "✗",
    caution: "⚠",
    note: "ℹ",
    arrow: "→",
    bullet: "•",
    pending: "⟳",
};
