use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::services::location_service::{GeocodeOutcome, Geocoder};

/// Geocoder that plays back canned outcomes per query and records every call.
/// Unscripted queries answer `NotFound`; the last scripted outcome repeats.
#[derive(Default)]
pub struct ScriptedGeocoder {
    scripts: Mutex<HashMap<String, VecDeque<GeocodeOutcome>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(self, query: &str, outcomes: Vec<GeocodeOutcome>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(query.to_string(), outcomes.into());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Geocoder for ScriptedGeocoder {
    async fn geocode(&self, query: &str) -> GeocodeOutcome {
        self.calls.lock().unwrap().push(query.to_string());
        let mut scripts = self.scripts.lock().unwrap();
        match scripts.get_mut(query) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or(GeocodeOutcome::NotFound),
            Some(queue) => queue.front().cloned().unwrap_or(GeocodeOutcome::NotFound),
            None => GeocodeOutcome::NotFound,
        }
    }
}
