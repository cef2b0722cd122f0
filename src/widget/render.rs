use crate::dom::Element;
use crate::options::TextLabels;
use crate::responsive::LayoutMode;

pub const SEARCH_BOX_ERROR_CLASS: &str = "order-tracking-search-box-error";
pub const VISIBLE_CLASS: &str = "visible";

/// `data-role` values of the elements the widget looks up after rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    SearchBox,
    SearchInput,
    ClearButton,
    SearchButton,
    SearchButtonMobile,
    ErrorMessage,
}

impl Role {
    pub const ALL: [Self; 6] = [
        Self::SearchBox,
        Self::SearchInput,
        Self::ClearButton,
        Self::SearchButton,
        Self::SearchButtonMobile,
        Self::ErrorMessage,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::SearchBox => "search-box",
            Self::SearchInput => "search-input",
            Self::ClearButton => "clear-button",
            Self::SearchButton => "search-button",
            Self::SearchButtonMobile => "search-button-mobile",
            Self::ErrorMessage => "error-message",
        }
    }

    pub fn from_attr(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == value)
    }
}

const SEARCH_ICON_CIRCLE: &str = "M7.33333 12.6667C10.2789 12.6667 12.6667 10.2789 12.6667 7.33333C12.6667 4.38781 10.2789 2 7.33333 2C4.38781 2 2 4.38781 2 7.33333C2 10.2789 4.38781 12.6667 7.33333 12.6667Z";
const SEARCH_ICON_HANDLE: &str = "M14 14L11.1 11.1";
const CLEAR_ICON: &str = "M1 1L9 9M9 1L1 9";

/// Build the widget subtree. The search box is the same in both layouts;
/// desktop puts the track button inside it, mobile appends a full-width
/// button under the error slot.
pub fn markup(labels: &TextLabels, mode: LayoutMode, input_value: &str) -> Element {
    let input_wrapper = Element::new("div")
        .with_class("order-tracking-search-input-wrapper")
        .with_child(
            Element::new("input")
                .with_class("order-tracking-search-input")
                .with_attr("type", "text")
                .with_attr("placeholder", labels.placeholder.as_str())
                .with_attr("value", input_value)
                .with_attr("data-role", Role::SearchInput.as_str()),
        )
        .with_child(
            Element::new("button")
                .with_class("order-tracking-clear-button")
                .with_attr("data-role", Role::ClearButton.as_str())
                .with_attr("type", "button")
                .with_style("display", "none")
                .with_child(clear_icon()),
        );

    let mut search_box = Element::new("div")
        .with_class("order-tracking-search-box")
        .with_attr("data-role", Role::SearchBox.as_str())
        .with_child(input_wrapper);
    if mode == LayoutMode::Desktop {
        search_box = search_box.with_child(track_button(Role::SearchButton, labels));
    }

    let mut container = Element::new("div")
        .with_class("order-tracking-search-container")
        .with_child(
            Element::new("h1")
                .with_class("order-tracking-search-title")
                .with_text(labels.title.as_str()),
        )
        .with_child(search_box)
        .with_child(
            Element::new("div")
                .with_class("order-tracking-error-message")
                .with_attr("data-role", Role::ErrorMessage.as_str()),
        );
    if mode == LayoutMode::Mobile {
        container = container.with_child(
            Element::new("div")
                .with_class("order-tracking-search-mobile")
                .with_child(track_button(Role::SearchButtonMobile, labels)),
        );
    }

    Element::new("div")
        .with_class("order-tracking-search-section")
        .with_child(container)
}

fn track_button(role: Role, labels: &TextLabels) -> Element {
    Element::new("button")
        .with_class("order-tracking-search-button")
        .with_attr("data-role", role.as_str())
        .with_child(search_icon())
        .with_text(labels.track_button.as_str())
}

fn search_icon() -> Element {
    let stroke = |d: &str| {
        Element::new("path")
            .with_attr("d", d)
            .with_attr("stroke", "currentColor")
            .with_attr("stroke-width", "1.5")
            .with_attr("stroke-linecap", "round")
            .with_attr("stroke-linejoin", "round")
    };
    svg(16)
        .with_class("order-tracking-search-icon")
        .with_child(stroke(SEARCH_ICON_CIRCLE))
        .with_child(stroke(SEARCH_ICON_HANDLE))
}

fn clear_icon() -> Element {
    svg(10).with_child(
        Element::new("path")
            .with_attr("d", CLEAR_ICON)
            .with_attr("stroke", "white")
            .with_attr("stroke-width", "1.5")
            .with_attr("stroke-linecap", "round"),
    )
}

fn svg(size: u32) -> Element {
    Element::new("svg")
        .with_attr("width", size.to_string())
        .with_attr("height", size.to_string())
        .with_attr("viewBox", format!("0 0 {size} {size}"))
        .with_attr("fill", "none")
        .with_attr("xmlns", "http://www.w3.org/2000/svg")
}
