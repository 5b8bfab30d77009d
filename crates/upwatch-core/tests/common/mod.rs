//! Shared helpers for integration tests.
#![allow(dead_code)]

pub mod status_server;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use upwatch_core::status::{FetchError, StatusResponse, StatusSource};
use upwatch_core::view::{BarWidth, ProgressView};

/// Status source that replays a fixed script, then reports `Unavailable` forever.
#[derive(Default)]
pub struct ScriptedSource {
    script: Mutex<VecDeque<Result<StatusResponse, FetchError>>>,
    requested: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(script: Vec<Result<StatusResponse, FetchError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            ..Self::default()
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

impl StatusSource for ScriptedSource {
    async fn fetch(&self, transport_id: &str) -> Result<StatusResponse, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().unwrap().push(transport_id.to_string());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(StatusResponse::Unavailable))
    }
}

pub fn progress(pos: u64, length: u64) -> Result<StatusResponse, FetchError> {
    Ok(StatusResponse::Progress { pos, length })
}

pub fn unavailable() -> Result<StatusResponse, FetchError> {
    Ok(StatusResponse::Unavailable)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    Mount,
    Reveal,
    Bar(BarWidth),
    Label(String),
}

/// View that records every call; clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingView {
    events: Arc<Mutex<Vec<ViewEvent>>>,
}

impl RecordingView {
    pub fn events(&self) -> Vec<ViewEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn visible(&self) -> bool {
        self.events().contains(&ViewEvent::Reveal)
    }

    pub fn bar(&self) -> Option<BarWidth> {
        self.events().into_iter().rev().find_map(|e| match e {
            ViewEvent::Bar(w) => Some(w),
            _ => None,
        })
    }

    pub fn label(&self) -> Option<String> {
        self.events().into_iter().rev().find_map(|e| match e {
            ViewEvent::Label(l) => Some(l),
            _ => None,
        })
    }

    fn push(&self, event: ViewEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl ProgressView for RecordingView {
    fn mount(&mut self) {
        self.push(ViewEvent::Mount);
    }

    fn reveal(&mut self) {
        self.push(ViewEvent::Reveal);
    }

    fn set_bar_width(&mut self, width: BarWidth) {
        self.push(ViewEvent::Bar(width));
    }

    fn set_label(&mut self, text: &str) {
        self.push(ViewEvent::Label(text.to_string()));
    }
}
