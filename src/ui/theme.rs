use iced::widget::{button, container, text, text_input};
use iced::{Border, Color, Shadow, Theme};

/// Window background
pub const BACKGROUND: Color = Color {
    r: 0.12,
    g: 0.12,
    b: 0.15,
    a: 1.0,
};

/// Slightly lighter surface color for the search box
const SURFACE: Color = Color {
    r: 0.18,
    g: 0.18,
    b: 0.22,
    a: 1.0,
};

const ACCENT: Color = Color {
    r: 0.35,
    g: 0.55,
    b: 0.85,
    a: 1.0,
};

const ERROR: Color = Color {
    r: 0.91,
    g: 0.36,
    b: 0.36,
    a: 1.0,
};

const TEXT_PRIMARY: Color = Color {
    r: 0.9,
    g: 0.9,
    b: 0.92,
    a: 1.0,
};

const TEXT_SECONDARY: Color = Color {
    r: 0.55,
    g: 0.55,
    b: 0.6,
    a: 1.0,
};

fn with_alpha(color: Color, a: f32) -> Color {
    Color { a, ..color }
}

/// Style for the container wrapping the whole widget
pub fn main_container(theme: &Theme) -> container::Style {
    let _ = theme;
    container::Style {
        background: Some(BACKGROUND.into()),
        border: Border {
            color: with_alpha(Color::WHITE, 0.08),
            width: 1.0,
            radius: 12.0.into(),
        },
        shadow: Shadow {
            color: Color::BLACK,
            offset: iced::Vector::new(0.0, 4.0),
            blur_radius: 20.0,
        },
        text_color: Some(TEXT_PRIMARY),
        snap: false,
    }
}

pub fn search_box(_theme: &Theme) -> container::Style {
    search_box_bordered(Color::TRANSPARENT)
}

/// Search box while an error is shown
pub fn search_box_error(_theme: &Theme) -> container::Style {
    search_box_bordered(ERROR)
}

fn search_box_bordered(color: Color) -> container::Style {
    container::Style {
        background: Some(SURFACE.into()),
        border: Border {
            color,
            width: 2.0,
            radius: 8.0.into(),
        },
        text_color: Some(TEXT_PRIMARY),
        ..container::Style::default()
    }
}

/// The input sits inside the search box, which owns the border.
pub fn search_input(theme: &Theme, status: text_input::Status) -> text_input::Style {
    let _ = theme;
    let focused = matches!(status, text_input::Status::Focused { .. });
    text_input::Style {
        background: Color::TRANSPARENT.into(),
        border: Border {
            color: if focused {
                with_alpha(ACCENT, 0.6)
            } else {
                Color::TRANSPARENT
            },
            width: if focused { 1.0 } else { 0.0 },
            radius: 6.0.into(),
        },
        icon: TEXT_SECONDARY,
        placeholder: TEXT_SECONDARY,
        value: TEXT_PRIMARY,
        selection: with_alpha(ACCENT, 0.3),
    }
}

pub fn track_button(theme: &Theme, status: button::Status) -> button::Style {
    let _ = theme;
    let background = match status {
        button::Status::Hovered | button::Status::Pressed => with_alpha(ACCENT, 0.85),
        button::Status::Disabled => with_alpha(ACCENT, 0.4),
        button::Status::Active => ACCENT,
    };
    button::Style {
        background: Some(background.into()),
        text_color: Color::WHITE,
        border: Border {
            color: Color::TRANSPARENT,
            width: 0.0,
            radius: 6.0.into(),
        },
        ..button::Style::default()
    }
}

/// Round grey button inside the input
pub fn clear_button(theme: &Theme, status: button::Status) -> button::Style {
    let _ = theme;
    let alpha = if matches!(status, button::Status::Hovered) {
        0.9
    } else {
        0.6
    };
    button::Style {
        background: Some(with_alpha(TEXT_SECONDARY, alpha).into()),
        text_color: Color::WHITE,
        border: Border {
            color: Color::TRANSPARENT,
            width: 0.0,
            radius: 10.0.into(),
        },
        ..button::Style::default()
    }
}

pub fn title(_theme: &Theme) -> text::Style {
    text::Style {
        color: Some(TEXT_PRIMARY),
    }
}

pub fn error_text(_theme: &Theme) -> text::Style {
    text::Style { color: Some(ERROR) }
}
