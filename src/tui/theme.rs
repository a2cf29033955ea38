use derive_more::Display;
use ratatui::style::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, clap::ValueEnum)]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Cafe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub bg: Color,
    pub fg: Color,
    pub accent: Color,
    pub muted: Color,
    pub error: Color,
}

impl Theme {
    pub fn next(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Cafe,
            Theme::Cafe => Theme::Light,
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Light => Palette {
                bg: Color::Rgb(0xf5, 0xf7, 0xfa),
                fg: Color::Rgb(0x33, 0x33, 0x33),
                accent: Color::Rgb(0x52, 0x5a, 0xff),
                muted: Color::Rgb(0x6c, 0x75, 0x7d),
                error: Color::Rgb(0xc0, 0x39, 0x2b),
            },
            Theme::Dark => Palette {
                bg: Color::Rgb(0x2c, 0x3e, 0x50),
                fg: Color::Rgb(0xec, 0xf0, 0xf1),
                accent: Color::Rgb(0xff, 0x00, 0xff),
                muted: Color::Rgb(0x95, 0xa5, 0xa6),
                error: Color::Rgb(0xe7, 0x4c, 0x3c),
            },
            Theme::Cafe => Palette {
                bg: Color::Rgb(0xd7, 0xcc, 0xc8),
                fg: Color::Rgb(0x4e, 0x34, 0x2e),
                accent: Color::Rgb(0x80, 0x00, 0x80),
                muted: Color::Rgb(0x8d, 0x6e, 0x63),
                error: Color::Rgb(0xb7, 0x1c, 0x1c),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Theme;

    #[test]
    fn cycling_visits_every_theme() {
        let mut theme = Theme::default();
        let mut seen = vec![theme];
        for _ in 0..3 {
            theme = theme.next();
            seen.push(theme);
        }
        assert_eq!(seen, vec![Theme::Light, Theme::Dark, Theme::Cafe, Theme::Light]);
    }
}
