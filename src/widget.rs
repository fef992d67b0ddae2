mod cache;
mod contract;
mod host;
mod indicator;
mod lifecycle;
mod peers;
mod transport;
mod view;

pub use cache::{ResponseStore, SequenceCache};
pub use contract::{
    CacheEntry, HintRequest, HintResponse, PeerAnswer, SaveRequest, SaveResponse, SubmitRequest,
    SubmitResponse,
};
pub use host::{BaseUrlHandlers, HandlerUrls, Host, LogNotifier, Notification, Notifier, NotifyState};
pub use indicator::{IndicatorStateMachine, IndicatorStatus};
pub use lifecycle::{Action, AnswerWidget, ControlLabels, MountOptions, PendingRequest, WidgetLabels};
pub use peers::{PeerResponseRenderer, HIDDEN_CLASS, PEER_ITEM_CLASS, PLACEHOLDER_CLASS};
pub use transport::{RequestError, Transport, UreqTransport};
pub use view::{Element, ElementState, ListItem, MemoryView, WidgetView};
