//! Draws the widget's element tree with iced widgets.
//!
//! Only what the widget renders is understood: headings, the text input,
//! buttons and `div` containers. SVG icons and anything hidden with
//! `display: none` are skipped. Controls only produce messages when the
//! widget has a listener wired on them.

use iced::widget::{button, container, text, text_input, Column, Row};
use iced::{Center, Element, Fill};

use crate::app::Message;
use crate::dom::{self, DomEvent, EventKind, NodeRef};
use crate::ui::theme;
use crate::widget::render::{Role, SEARCH_BOX_ERROR_CLASS, VISIBLE_CLASS};

/// The search input ID for focus management
pub const SEARCH_INPUT_ID: &str = "order-tracking-search-input";

const INPUT_WRAPPER_CLASS: &str = "order-tracking-search-input-wrapper";

pub fn view(node: &NodeRef) -> Option<Element<'static, Message>> {
    let element = node.borrow();
    if element.tag() == "svg" || element.style("display") == Some("none") {
        return None;
    }
    let role = element.attr("data-role").and_then(Role::from_attr);

    match element.tag() {
        "h1" => Some(
            text(element.text().to_string())
                .size(24)
                .style(theme::title)
                .into(),
        ),
        "input" => Some(input(&element, role)),
        "button" => Some(control(&element, role)),
        _ => match role {
            Some(Role::ErrorMessage) => error_slot(&element),
            Some(Role::SearchBox) => {
                let style: fn(&iced::Theme) -> container::Style =
                    if element.has_class(SEARCH_BOX_ERROR_CLASS) {
                        theme::search_box_error
                    } else {
                        theme::search_box
                    };
                Some(
                    container(row(&element))
                        .padding(4)
                        .width(Fill)
                        .style(style)
                        .into(),
                )
            }
            _ if element.has_class(INPUT_WRAPPER_CLASS) => Some(row(&element).width(Fill).into()),
            _ => Some(
                Column::with_children(children(&element))
                    .spacing(12)
                    .width(Fill)
                    .into(),
            ),
        },
    }
}

fn children(element: &dom::Element) -> Vec<Element<'static, Message>> {
    element.children().iter().filter_map(view).collect()
}

fn row(element: &dom::Element) -> Row<'static, Message> {
    Row::with_children(children(element))
        .spacing(8)
        .align_y(Center)
}

fn input(element: &dom::Element, role: Option<Role>) -> Element<'static, Message> {
    let mut input = text_input(
        element.attr("placeholder").unwrap_or_default(),
        element.attr("value").unwrap_or_default(),
    )
    .id(SEARCH_INPUT_ID)
    .padding(12)
    .size(18)
    .width(Fill)
    .style(theme::search_input);

    if let Some(role) = role {
        if element.has_listener(EventKind::Input) {
            input = input.on_input(move |value| Message::Dom {
                role,
                event: DomEvent::Input { value },
            });
        }
        // Enter is the only key iced reports from a text input.
        if element.has_listener(EventKind::KeyPress) {
            input = input.on_submit(Message::Dom {
                role,
                event: DomEvent::KeyPress {
                    key: "Enter".to_string(),
                },
            });
        }
    }
    input.into()
}

fn control(element: &dom::Element, role: Option<Role>) -> Element<'static, Message> {
    let clear = role == Some(Role::ClearButton);
    let label = if clear && element.text().is_empty() {
        "✕".to_string()
    } else {
        element.text().to_string()
    };

    let mut control = if clear {
        button(text(label).size(10))
            .padding([2, 6])
            .style(theme::clear_button)
    } else {
        button(text(label).size(16))
            .padding([10, 20])
            .style(theme::track_button)
    };
    if role == Some(Role::SearchButtonMobile) {
        control = control.width(Fill);
    }
    if let Some(role) = role.filter(|_| element.has_listener(EventKind::Click)) {
        control = control.on_press(Message::Dom {
            role,
            event: DomEvent::Click,
        });
    }
    control.into()
}

fn error_slot(element: &dom::Element) -> Option<Element<'static, Message>> {
    if !element.has_class(VISIBLE_CLASS) {
        return None;
    }
    Some(
        text(element.text().to_string())
            .size(14)
            .style(theme::error_text)
            .into(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Element as Node;
    use crate::options::TextLabels;
    use crate::responsive::LayoutMode;
    use crate::widget::render;

    fn mounted(mode: LayoutMode) -> NodeRef {
        render::markup(&TextLabels::default(), mode, "").into_ref()
    }

    #[test]
    fn test_hidden_and_icon_nodes_are_skipped() {
        let hidden = Node::new("button").with_style("display", "none").into_ref();
        assert!(view(&hidden).is_none());

        let icon = Node::new("svg").into_ref();
        assert!(view(&icon).is_none());
    }

    #[test]
    fn test_error_slot_follows_visibility() {
        let slot = Node::new("div")
            .with_attr("data-role", Role::ErrorMessage.as_str())
            .with_text("Could Not Find Order")
            .into_ref();
        assert!(view(&slot).is_none());

        slot.borrow_mut().add_class(VISIBLE_CLASS);
        assert!(view(&slot).is_some());
    }

    #[test]
    fn test_both_layouts_translate() {
        assert!(view(&mounted(LayoutMode::Desktop)).is_some());
        assert!(view(&mounted(LayoutMode::Mobile)).is_some());
    }
}
