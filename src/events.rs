//! Manager event bus.
//!
//! Form controllers fire named events before and while a form renders.
//! Plugins answer with HTML fragments that are spliced into the page.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::errors::AppError;

/// Events fired around the template edit form, in firing order.
pub const TEMPLATE_FORM_EVENTS: [&str; 2] = ["OnTempFormPrerender", "OnTempFormRender"];

/// Data handed to every event handler.
#[derive(Debug, Clone, Serialize)]
pub struct EventPayload {
    /// Element being edited (0 for a new element).
    pub id: i64,
    /// Action code of the controller firing the event.
    pub action: i64,
}

/// What the bus got back from the handlers of one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventResponse {
    /// No handler responded.
    None,
    Scalar(String),
    List(Vec<String>),
}

impl EventResponse {
    /// Fold the response into a single string: lists are concatenated with no separator.
    pub fn into_output(self) -> String {
        match self {
            EventResponse::None => String::new(),
            EventResponse::Scalar(s) => s,
            EventResponse::List(parts) => parts.concat(),
        }
    }
}

#[async_trait]
pub trait EventBus: Send + Sync {
    async fn invoke(&self, name: &str, payload: &EventPayload) -> Result<EventResponse, AppError>;
}

/// Output of a single event, ready for the view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventOutput {
    pub name: String,
    pub output: String,
}

/// Ordered event outputs with lookup by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EventOutputs(pub Vec<EventOutput>);

impl EventOutputs {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.output.as_str())
    }
}

/// Fire each event in order and collect its folded output.
///
/// Bus failures propagate; there is no retry.
pub async fn run_events(
    bus: &dyn EventBus,
    names: &[&str],
    payload: &EventPayload,
) -> Result<EventOutputs, AppError> {
    let mut out = Vec::with_capacity(names.len());
    for name in names {
        let response = bus.invoke(name, payload).await?;
        out.push(EventOutput {
            name: (*name).to_string(),
            output: response.into_output(),
        });
    }
    Ok(EventOutputs(out))
}

/// A plugin handler: `None` means "not interested in this call".
pub type PluginHandler = Arc<dyn Fn(&EventPayload) -> Option<String> + Send + Sync>;

/// In-process event bus backed by handlers registered per event name.
#[derive(Clone, Default)]
pub struct PluginRegistry {
    handlers: HashMap<String, Vec<PluginHandler>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, event: &str, handler: F)
    where
        F: Fn(&EventPayload) -> Option<String> + Send + Sync + 'static,
    {
        self.handlers
            .entry(event.to_string())
            .or_default()
            .push(Arc::new(handler));
    }
}

#[async_trait]
impl EventBus for PluginRegistry {
    async fn invoke(&self, name: &str, payload: &EventPayload) -> Result<EventResponse, AppError> {
        let Some(handlers) = self.handlers.get(name) else {
            return Ok(EventResponse::None);
        };
        let results: Vec<String> = handlers.iter().filter_map(|h| h(payload)).collect();
        log::debug!(
            "Event {name} for element {}: {} of {} handler(s) responded",
            payload.id,
            results.len(),
            handlers.len()
        );
        if results.is_empty() {
            Ok(EventResponse::None)
        } else {
            Ok(EventResponse::List(results))
        }
    }
}
