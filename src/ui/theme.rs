use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeKind {
    #[default]
    Dark,
    Light,
}

impl ThemeKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "dark" | "default" => Some(ThemeKind::Dark),
            "light" => Some(ThemeKind::Light),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ThemeKind::Dark => "dark",
            ThemeKind::Light => "light",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemeKind::Dark => ThemeKind::Light,
            ThemeKind::Light => ThemeKind::Dark,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Theme {
    // Overall background color to paint the full frame
    pub background_color: Color,
    pub sidebar_background: Color,

    // Chat message styles
    pub user_prefix_style: Style,
    pub user_text_style: Style,
    pub assistant_prefix_style: Style,
    pub assistant_text_style: Style,

    // Chrome
    pub title_style: Style,
    pub secondary_text_style: Style,
    pub muted_text_style: Style,
    pub accent_style: Style,
    pub connected_style: Style,
    pub disconnected_style: Style,
    pub thinking_indicator_style: Style,
    pub status_style: Style,

    // Input area
    pub input_border_style: Style,
    pub input_title_style: Style,
    pub input_text_style: Style,
    pub input_disabled_style: Style,
}

const SLATE_900: Color = Color::Rgb(0x0f, 0x17, 0x2a);
const SLATE_800: Color = Color::Rgb(0x1e, 0x29, 0x3b);
const SLATE_600: Color = Color::Rgb(0x47, 0x55, 0x69);
const SLATE_500: Color = Color::Rgb(0x64, 0x74, 0x8b);
const SLATE_400: Color = Color::Rgb(0x94, 0xa3, 0xb8);
const SLATE_300: Color = Color::Rgb(0xcb, 0xd5, 0xe1);
const SLATE_50: Color = Color::Rgb(0xf8, 0xfa, 0xfc);
const SKY_50: Color = Color::Rgb(0xe0, 0xf2, 0xfe);
const BLUE_400: Color = Color::Rgb(0x60, 0xa5, 0xfa);
const BLUE_500: Color = Color::Rgb(0x3b, 0x82, 0xf6);
const BLUE_600: Color = Color::Rgb(0x25, 0x63, 0xeb);
const VIOLET_400: Color = Color::Rgb(0xa7, 0x8b, 0xfa);
const VIOLET_500: Color = Color::Rgb(0x8b, 0x5c, 0xf6);
const EMERALD_500: Color = Color::Rgb(0x10, 0xb9, 0x81);
const RED_500: Color = Color::Rgb(0xef, 0x44, 0x44);

impl Theme {
    pub fn dark() -> Self {
        Theme {
            background_color: SLATE_900,
            sidebar_background: SLATE_800,

            user_prefix_style: Style::default()
                .fg(VIOLET_400)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(BLUE_400),
            assistant_prefix_style: Style::default()
                .fg(BLUE_400)
                .add_modifier(Modifier::BOLD),
            assistant_text_style: Style::default().fg(Color::White),

            title_style: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            secondary_text_style: Style::default().fg(SLATE_300),
            muted_text_style: Style::default().fg(SLATE_500),
            accent_style: Style::default().fg(BLUE_400),
            connected_style: Style::default().fg(EMERALD_500),
            disconnected_style: Style::default().fg(RED_500),
            thinking_indicator_style: Style::default().fg(VIOLET_400),
            status_style: Style::default().fg(SLATE_400),

            input_border_style: Style::default().fg(SLATE_600),
            input_title_style: Style::default().fg(SLATE_400),
            input_text_style: Style::default().fg(Color::White),
            input_disabled_style: Style::default().fg(SLATE_600),
        }
    }

    pub fn light() -> Self {
        Theme {
            background_color: SLATE_50,
            sidebar_background: SKY_50,

            user_prefix_style: Style::default()
                .fg(VIOLET_500)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(BLUE_500),
            assistant_prefix_style: Style::default()
                .fg(BLUE_600)
                .add_modifier(Modifier::BOLD),
            assistant_text_style: Style::default().fg(SLATE_900),

            title_style: Style::default()
                .fg(SLATE_900)
                .add_modifier(Modifier::BOLD),
            secondary_text_style: Style::default().fg(SLATE_600),
            muted_text_style: Style::default().fg(SLATE_400),
            accent_style: Style::default().fg(BLUE_600),
            connected_style: Style::default().fg(EMERALD_500),
            disconnected_style: Style::default().fg(RED_500),
            thinking_indicator_style: Style::default().fg(VIOLET_500),
            status_style: Style::default().fg(SLATE_500),

            input_border_style: Style::default().fg(SLATE_400),
            input_title_style: Style::default().fg(SLATE_500),
            input_text_style: Style::default().fg(SLATE_900),
            input_disabled_style: Style::default().fg(SLATE_400),
        }
    }

    pub fn for_kind(kind: ThemeKind) -> Self {
        match kind {
            ThemeKind::Dark => Self::dark(),
            ThemeKind::Light => Self::light(),
        }
    }
}
