use super::contract::PeerAnswer;
use super::view::{Element, ListItem, WidgetView};

pub const PEER_ITEM_CLASS: &str = "other-student-responses";
pub const PLACEHOLDER_CLASS: &str = "no-response";
pub const HIDDEN_CLASS: &str = "hidden";

/// Fills the "other responses" panel from a submit response.
#[derive(Debug, Clone)]
pub struct PeerResponseRenderer {
    /// localized placeholder supplied by the host markup
    no_responses_text: String,
}

impl PeerResponseRenderer {
    pub fn new(no_responses_text: &str) -> Self {
        Self {
            no_responses_text: no_responses_text.to_string(),
        }
    }

    pub fn render(&self, view: &mut dyn WidgetView, display: bool, answers: &[PeerAnswer]) {
        if !display {
            // hiding only, the previous list stays in place
            view.add_class(Element::PeerPanel, HIDDEN_CLASS);
            return;
        }

        let mut items: Vec<ListItem> = answers
            .iter()
            .map(|peer| ListItem::new(PEER_ITEM_CLASS, &peer.answer))
            .collect();
        if items.is_empty() {
            items.push(ListItem::new(PLACEHOLDER_CLASS, &self.no_responses_text));
        }

        view.set_items(Element::PeerList, items);
        view.remove_class(Element::PeerPanel, HIDDEN_CLASS);
    }

    /// Flips the list visibility and swaps the show/hide labels. Local only.
    pub fn toggle(&self, view: &mut dyn WidgetView) {
        for element in [
            Element::PeerList,
            Element::PeerToggleHide,
            Element::PeerToggleShow,
        ] {
            let visible = view.is_visible(element);
            view.set_visible(element, !visible);
        }
    }
}
