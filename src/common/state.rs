use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::config::Config;
use crate::notify::{LogSink, NotificationSink};
use crate::series::AlertState;

/// Edge-trigger memory per location. One lock spans the read-evaluate-write
/// step of a refresh; refresh cycles for the same location must not overlap.
pub type AlertRegistry = Arc<Mutex<HashMap<String, AlertState>>>;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub alerts: AlertRegistry,
    pub notifier: Arc<dyn NotificationSink>,
}

impl AppState {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self::with_notifier(config, Arc::new(LogSink))
    }

    #[must_use]
    pub fn with_notifier(config: Config, notifier: Arc<dyn NotificationSink>) -> Self {
        Self {
            config: Arc::new(config),
            alerts: Arc::new(Mutex::new(HashMap::new())),
            notifier,
        }
    }
}
