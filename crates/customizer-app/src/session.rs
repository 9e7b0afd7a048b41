//! One customization session: a render pipeline and a dispatcher fed by
//! the same setting changes.

use std::sync::Arc;

use customizer_common::{Event, EventBus, SettingValue};
use customizer_config::CustomizerConfig;
use customizer_dispatch::{
    Dispatcher, DispatcherOptions, HostSignal, Priority, Transport, UpdateTicket,
};
use customizer_render::{PipelineBuilder, RenderPipeline, StyleSink};
use serde_json::json;
use tokio::sync::broadcast;
use tracing::info;

/// Remote action used to persist a single setting.
pub const SAVE_ACTION: &str = "save_setting";

pub struct Session {
    pipeline: RenderPipeline,
    dispatcher: Dispatcher,
    events: EventBus,
}

impl Session {
    /// Build both subsystems from config, publishing on one shared bus.
    pub fn from_config(
        config: &CustomizerConfig,
        sink: impl StyleSink + 'static,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let events = EventBus::default();
        let pipeline = PipelineBuilder::from_config(&config.render)
            .events(events.clone())
            .build(sink);
        let dispatcher = Dispatcher::builder_arc(transport)
            .options(DispatcherOptions::from(&config.dispatch))
            .credential_token(config.endpoint.credential_token.clone())
            .events(events.clone())
            .build();
        Self {
            pipeline,
            dispatcher,
            events,
        }
    }

    /// Preview the change on the next frame and persist it remotely.
    pub fn on_setting_changed(&self, key: &str, value: impl Into<SettingValue>) -> UpdateTicket {
        let value = value.into();
        self.pipeline.enqueue(key, value.clone());
        self.dispatcher
            .submit(SAVE_ACTION, json!({ key: value }), Priority::Normal)
    }

    /// Replace the previewed state with a full settings snapshot.
    pub fn load<I, K, V>(&self, settings: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<SettingValue>,
    {
        self.pipeline.reload(settings);
    }

    pub fn handle_signal(&self, signal: HostSignal) {
        self.dispatcher.handle_signal(signal);
    }

    /// Cancel outstanding saves and blank the preview.
    pub fn shutdown(&self) {
        let cancelled = self.dispatcher.abort_all();
        self.pipeline.clear();
        info!(cancelled, "session shut down");
    }

    pub fn pipeline(&self) -> &RenderPipeline {
        &self.pipeline
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }
}
