use serde::Serialize;
use tracing::debug;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotifyState {
    Start,
    End,
}

/// Payload of a lifecycle notification; `{}` for errors and cancels.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Notification {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<NotifyState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Notification {
    pub fn start(message: &str) -> Self {
        Self {
            state: Some(NotifyState::Start),
            message: Some(message.to_string()),
        }
    }

    pub fn end() -> Self {
        Self {
            state: Some(NotifyState::End),
            message: None,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

/// Sink for the host's global busy/error indication.
pub trait Notifier {
    fn notify(&self, event: &str, notification: &Notification);
}

/// Stand-in used when the host runtime has no notification sink.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, event: &str, notification: &Notification) {
        debug!(event, ?notification, "host has no notifier, dropping notification");
    }
}

pub trait HandlerUrls {
    fn handler_url(&self, handler: &str) -> String;
}

/// Resolves `{base}/xblock/{usage_id}/handler/{handler}`.
#[derive(Debug, Clone)]
pub struct BaseUrlHandlers {
    base_url: String,
    usage_id: String,
}

impl BaseUrlHandlers {
    pub fn new(base_url: &str, usage_id: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            usage_id: usage_id.to_string(),
        }
    }
}

impl HandlerUrls for BaseUrlHandlers {
    fn handler_url(&self, handler: &str) -> String {
        format!(
            "{}/xblock/{}/handler/{}",
            self.base_url, self.usage_id, handler
        )
    }
}

/// Capabilities the host runtime hands to a widget at mount time.
pub struct Host {
    urls: Box<dyn HandlerUrls>,
    notifier: Box<dyn Notifier>,
}

impl Host {
    pub fn new(urls: Box<dyn HandlerUrls>, notifier: Option<Box<dyn Notifier>>) -> Self {
        Self {
            urls,
            notifier: notifier.unwrap_or_else(|| Box::new(LogNotifier)),
        }
    }

    pub fn handler_url(&self, handler: &str) -> String {
        self.urls.handler_url(handler)
    }

    pub fn notify(&self, event: &str, notification: &Notification) {
        self.notifier.notify(event, notification);
    }
}
