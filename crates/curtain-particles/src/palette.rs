#![forbid(unsafe_code)]

//! Site themes and the particle colours derived from them.

use std::fmt;
use std::str::FromStr;

/// An sRGB colour with straight (non-premultiplied) alpha in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Same colour, different alpha (clamped to `[0, 1]`).
    #[inline]
    #[must_use]
    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// CSS `rgba(r, g, b, a)` form, as accepted by canvas fill/stroke styles.
    #[must_use]
    pub fn to_css(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// Site colour theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Theme {
    #[default]
    White,
    Lavender,
    Mint,
    Peach,
    Sky,
    Rose,
}

impl Theme {
    pub const ALL: [Self; 6] = [
        Self::White,
        Self::Lavender,
        Self::Mint,
        Self::Peach,
        Self::Sky,
        Self::Rose,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Lavender => "lavender",
            Self::Mint => "mint",
            Self::Peach => "peach",
            Self::Sky => "sky",
            Self::Rose => "rose",
        }
    }

    /// Base RGB triples, in draw-cycle order.
    const fn rgb(self) -> [(u8, u8, u8); 3] {
        match self {
            Self::White => [(44, 95, 93), (58, 115, 113), (74, 135, 133)],
            Self::Lavender => [(59, 130, 246), (139, 92, 246), (99, 102, 241)],
            Self::Mint => [(52, 211, 153), (16, 185, 129), (110, 231, 183)],
            Self::Peach => [(251, 146, 60), (249, 115, 22), (253, 186, 116)],
            Self::Sky => [(56, 189, 248), (14, 165, 233), (125, 211, 252)],
            Self::Rose => [(244, 114, 182), (236, 72, 153), (251, 113, 133)],
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a theme name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseThemeError(pub String);

impl fmt::Display for ParseThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown theme: {:?}", self.0)
    }
}

impl std::error::Error for ParseThemeError {}

impl FromStr for Theme {
    type Err = ParseThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseThemeError(s.to_owned()))
    }
}

/// Light or dark page mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    #[default]
    Light,
    Dark,
}

impl Mode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Particle alpha for this mode.
    #[must_use]
    pub const fn particle_alpha(self) -> f32 {
        match self {
            Self::Light => 0.3,
            Self::Dark => 0.4,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a mode name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseModeError(pub String);

impl fmt::Display for ParseModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown mode: {:?}", self.0)
    }
}

impl std::error::Error for ParseModeError {}

impl FromStr for Mode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(ParseModeError(other.to_owned())),
        }
    }
}

/// The three particle colours for one theme and mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    theme: Theme,
    mode: Mode,
    colors: [Rgba; 3],
}

impl Palette {
    #[must_use]
    pub fn new(theme: Theme, mode: Mode) -> Self {
        // White's dark variant is lifted a step; every other theme keeps its
        // hues across modes.
        let rgb = match (theme, mode) {
            (Theme::White, Mode::Dark) => [(74, 135, 133), (90, 155, 152), (106, 175, 172)],
            _ => theme.rgb(),
        };
        let a = mode.particle_alpha();
        Self {
            theme,
            mode,
            colors: rgb.map(|(r, g, b)| Rgba::new(r, g, b, a)),
        }
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn colors(&self) -> &[Rgba; 3] {
        &self.colors
    }

    /// Fill colour for the particle at `index`.
    #[must_use]
    pub fn particle_color(&self, index: usize) -> Rgba {
        self.colors[index % self.colors.len()]
    }

    /// Connector stroke at the given opacity.
    #[must_use]
    pub fn link_color(&self, opacity: f32) -> Rgba {
        self.colors[0].with_alpha(opacity)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(Theme::default(), Mode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_form_matches_canvas_syntax() {
        assert_eq!(Rgba::new(59, 130, 246, 0.3).to_css(), "rgba(59, 130, 246, 0.3)");
    }

    #[test]
    fn theme_names_parse_case_insensitively() {
        for t in Theme::ALL {
            assert_eq!(t.as_str().parse::<Theme>(), Ok(t));
            assert_eq!(t.as_str().to_uppercase().parse::<Theme>(), Ok(t));
        }
        assert!("teal".parse::<Theme>().is_err());
    }

    #[test]
    fn modes_parse() {
        assert_eq!(" Dark ".parse::<Mode>(), Ok(Mode::Dark));
        assert_eq!("light".parse::<Mode>(), Ok(Mode::Light));
        let err = "dim".parse::<Mode>().unwrap_err();
        assert_eq!(err.to_string(), "unknown mode: \"dim\"");
    }

    #[test]
    fn alpha_follows_mode() {
        for t in Theme::ALL {
            assert!(Palette::new(t, Mode::Light).colors().iter().all(|c| c.a == 0.3));
            assert!(Palette::new(t, Mode::Dark).colors().iter().all(|c| c.a == 0.4));
        }
    }

    #[test]
    fn white_dark_is_lifted() {
        let light = Palette::new(Theme::White, Mode::Light);
        let dark = Palette::new(Theme::White, Mode::Dark);
        assert_eq!(light.colors()[0], Rgba::new(44, 95, 93, 0.3));
        assert_eq!(dark.colors()[0], Rgba::new(74, 135, 133, 0.4));
    }

    #[test]
    fn particle_colors_cycle_in_threes() {
        let p = Palette::new(Theme::Rose, Mode::Light);
        assert_eq!(p.particle_color(0), p.particle_color(3));
        assert_eq!(p.particle_color(1), p.colors()[1]);
        assert_eq!(p.particle_color(5), p.colors()[2]);
    }

    #[test]
    fn link_color_keeps_first_hue() {
        let p = Palette::new(Theme::Mint, Mode::Dark);
        let link = p.link_color(0.075);
        assert_eq!((link.r, link.g, link.b), (52, 211, 153));
        assert_eq!(link.a, 0.075);
    }
}
