use serde::{Deserialize, Serialize};

use super::view::{Element, WidgetView};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IndicatorStatus {
    #[default]
    #[serde(rename = "unanswered")]
    Unanswered,
    #[serde(rename = "correct")]
    Correct,
    #[serde(rename = "incorrect")]
    Incorrect,
}

impl IndicatorStatus {
    pub const ALL: [IndicatorStatus; 3] = [
        IndicatorStatus::Unanswered,
        IndicatorStatus::Correct,
        IndicatorStatus::Incorrect,
    ];

    pub fn class_name(self) -> &'static str {
        match self {
            IndicatorStatus::Unanswered => "unanswered",
            IndicatorStatus::Correct => "correct",
            IndicatorStatus::Incorrect => "incorrect",
        }
    }
}

const STATUS_TARGETS: [Element; 2] = [Element::AnswerContainer, Element::FeedbackStatus];

/// Latest known grading status of the current answer.
///
/// There is no terminal state: a graded answer goes back to `Unanswered` as
/// soon as it is edited, and any state moves on a new submit response.
#[derive(Debug, Default)]
pub struct IndicatorStateMachine {
    status: IndicatorStatus,
}

impl IndicatorStateMachine {
    pub fn new(initial: IndicatorStatus) -> Self {
        Self { status: initial }
    }

    /// Adopts the status the host markup already shows on the answer
    /// container. Markup with no marker, or with conflicting ones, is
    /// normalized to `Unanswered`.
    pub fn from_view(view: &mut dyn WidgetView) -> Self {
        let shown: Vec<IndicatorStatus> = IndicatorStatus::ALL
            .into_iter()
            .filter(|s| view.has_class(Element::AnswerContainer, s.class_name()))
            .collect();

        match shown.as_slice() {
            [status] => Self::new(*status),
            _ => {
                let mut machine = Self::default();
                machine.apply(view, IndicatorStatus::Unanswered);
                machine
            }
        }
    }

    pub fn status(&self) -> IndicatorStatus {
        self.status
    }

    pub fn on_graded(&mut self, view: &mut dyn WidgetView, status: IndicatorStatus) {
        self.apply(view, status);
    }

    pub fn on_edited(&mut self, view: &mut dyn WidgetView) {
        self.apply(view, IndicatorStatus::Unanswered);
    }

    /// Writes the current status to the view, clearing the other two markers first.
    pub fn apply(&mut self, view: &mut dyn WidgetView, status: IndicatorStatus) {
        self.status = status;
        for target in STATUS_TARGETS {
            for other in IndicatorStatus::ALL {
                view.remove_class(target, other.class_name());
            }
            view.add_class(target, status.class_name());
        }
    }
}
