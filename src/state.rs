use crate::backend::HttpBackend;
use crate::config::FormConfig;
use crate::errors::FormError;
use crate::form::AttendanceForm;
use crate::identity::{UnverifiedJwtDecoder, WidgetSettings};
use chrono::Utc;
use std::{sync::Arc, time::Duration};
use tokio::{sync::Mutex, task::JoinHandle, time::MissedTickBehavior};
use tracing::debug;

pub type HostedForm = AttendanceForm<HttpBackend, UnverifiedJwtDecoder>;

/// One form per host process; the lock serializes events like a page's event loop.
#[derive(Clone)]
pub struct AppState {
    pub form: Arc<Mutex<HostedForm>>,
    pub widget: Arc<WidgetSettings>,
}

impl AppState {
    pub fn new(form: HostedForm, widget: WidgetSettings) -> Self {
        Self {
            form: Arc::new(Mutex::new(form)),
            widget: Arc::new(widget),
        }
    }

    pub fn from_config(config: &FormConfig) -> Result<Self, FormError> {
        let backend = HttpBackend::new(config.api_base.clone(), config.api_timeout)?;
        let form = AttendanceForm::new(backend, UnverifiedJwtDecoder, config.clock_offset);
        Ok(Self::new(form, WidgetSettings::new(config.client_id.clone())))
    }
}

/// Re-stamps the time field every `period` while it is populated.
pub fn spawn_clock_ticker(state: AppState, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // the first tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let mut form = state.form.lock().await;
            if form.refresh_clock(Utc::now()) {
                debug!("clock refreshed");
            }
        }
    })
}
