use crate::gfx::math::Color;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn is_dark(self) -> bool {
        matches!(self, Theme::Dark)
    }
}

/// Theme colors, built once per animation.
#[derive(Debug, Clone)]
pub struct Palette {
    pub primary: Color,
    pub secondary: Color,
    pub tertiary: Color,
    pub background: Color,
    pub accents: [Color; 5],
    /// Chart titles and labels.
    pub text: Color,
    pub text_muted: Color,
    /// Axis lines, outlines, inactive tracks.
    pub grid: Color,
    /// Panels behind the story line and gauge hub.
    pub panel: Color,
    /// Gradient ends of the greeting text.
    pub greeting: (Color, Color),
    pub alert: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                primary: Color::rgb(0x00, 0x71, 0xe3),
                secondary: Color::rgb(0x28, 0xa7, 0x45),
                tertiary: Color::rgb(0xdc, 0x35, 0x45),
                background: Color::rgba(245, 245, 247, 230),
                accents: [
                    Color::rgb(0xff, 0x9f, 0x0a),
                    Color::rgb(0x5e, 0x5c, 0xe6),
                    Color::rgb(0xbf, 0x5a, 0xf2),
                    Color::rgb(0x30, 0xd1, 0x58),
                    Color::rgb(0x64, 0xd2, 0xff),
                ],
                text: Color::rgba(29, 29, 31, 230),
                text_muted: Color::rgba(0, 0, 0, 153),
                grid: Color::rgba(0, 0, 0, 51),
                panel: Color::rgba(240, 240, 245, 179),
                greeting: (Color::rgb(0x00, 0x71, 0xe3), Color::rgb(0x1d, 0x1d, 0x1f)),
                alert: Color::rgb(0xdc, 0x35, 0x45),
            },
            Theme::Dark => Self {
                primary: Color::rgb(0x29, 0x97, 0xff),
                secondary: Color::rgb(0x39, 0xe7, 0x5f),
                tertiary: Color::rgb(0xff, 0x37, 0x5f),
                background: Color::rgba(0, 0, 0, 230),
                accents: [
                    Color::rgb(0xff, 0x9f, 0x0a),
                    Color::rgb(0x5e, 0x5c, 0xe6),
                    Color::rgb(0xbf, 0x5a, 0xf2),
                    Color::rgb(0x32, 0xd7, 0x4b),
                    Color::rgb(0x64, 0xd2, 0xff),
                ],
                text: Color::rgba(245, 245, 247, 230),
                text_muted: Color::rgba(255, 255, 255, 153),
                grid: Color::rgba(255, 255, 255, 77),
                panel: Color::rgba(50, 50, 55, 179),
                greeting: (Color::rgb(0x5e, 0x9e, 0xff), Color::rgb(0xf5, 0xf5, 0xf7)),
                alert: Color::rgb(0xff, 0x37, 0x5f),
            },
        }
    }

    /// The three colors particles are drawn from.
    pub fn particle_colors(&self) -> [Color; 3] {
        [self.primary, self.secondary, self.tertiary]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn themes_differ_in_primary() {
        let light = Palette::for_theme(Theme::Light);
        let dark = Palette::for_theme(Theme::Dark);
        assert_ne!(light.primary, dark.primary);
        assert_eq!(light.primary, Color::rgb(0, 113, 227));
        assert!(Theme::Dark.is_dark());
    }

    #[test]
    fn theme_names_in_config() {
        #[derive(Deserialize)]
        struct Wrap {
            theme: Theme,
        }
        let w: Wrap = toml::from_str("theme = \"dark\"").unwrap();
        assert_eq!(w.theme, Theme::Dark);
    }
}
