pub mod fixtures;

use quire::{Notice, PaginationEngine, PaginationError, StatusSink, Studio, StudioConfig};
use std::sync::{Arc, Mutex};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// How the fake pagination engine behaves after `load`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineBehavior {
    /// Reports this many pages immediately.
    Pages(usize),
    /// Never produces a page.
    Stall,
    /// Rejects the document.
    FailLoad,
}

/// Pagination engine that records every document it is given.
pub struct FakeEngine {
    behavior: EngineBehavior,
    loaded: Arc<Mutex<Vec<String>>>,
    fonts_ready: bool,
}

impl FakeEngine {
    pub fn new(behavior: EngineBehavior) -> (Self, Arc<Mutex<Vec<String>>>) {
        let loaded = Arc::new(Mutex::new(Vec::new()));
        let engine = Self {
            behavior,
            loaded: Arc::clone(&loaded),
            fonts_ready: true,
        };
        (engine, loaded)
    }

    pub fn with_fonts_ready(mut self, ready: bool) -> Self {
        self.fonts_ready = ready;
        self
    }
}

impl PaginationEngine for FakeEngine {
    fn load(&mut self, document: &str) -> Result<(), PaginationError> {
        if self.behavior == EngineBehavior::FailLoad {
            return Err(PaginationError::LoadFailed("syntax error".to_string()));
        }
        self.loaded.lock().unwrap().push(document.to_string());
        Ok(())
    }

    fn page_count(&self) -> usize {
        match self.behavior {
            EngineBehavior::Pages(n) if !self.loaded.lock().unwrap().is_empty() => n,
            _ => 0,
        }
    }

    fn fonts_ready(&self) -> bool {
        self.fonts_ready
    }

    fn name(&self) -> &'static str {
        "FakeEngine"
    }
}

/// Status sink that keeps everything it is told.
#[derive(Default)]
pub struct RecordingStatus {
    loading: Mutex<Vec<bool>>,
    notices: Mutex<Vec<Notice>>,
}

impl RecordingStatus {
    pub fn is_loading(&self) -> bool {
        self.loading.lock().unwrap().last().copied().unwrap_or(false)
    }

    pub fn loading_transitions(&self) -> Vec<bool> {
        self.loading.lock().unwrap().clone()
    }

    pub fn failures(&self) -> Vec<String> {
        self.notices
            .lock()
            .unwrap()
            .iter()
            .filter_map(|n| match n {
                Notice::Failure(msg) => Some(msg.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn successes(&self) -> usize {
        self.notices
            .lock()
            .unwrap()
            .iter()
            .filter(|n| matches!(n, Notice::Success(_)))
            .count()
    }
}

impl StatusSink for RecordingStatus {
    fn set_loading(&self, loading: bool) {
        self.loading.lock().unwrap().push(loading);
    }

    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

/// A studio wired to a recording status sink and, optionally, a fake engine.
pub fn studio(engine: Option<FakeEngine>) -> (Studio, Arc<RecordingStatus>) {
    init_logger();
    let status = Arc::new(RecordingStatus::default());
    let mut builder = Studio::builder()
        .with_config(StudioConfig::default())
        .with_status(status.clone());
    if let Some(engine) = engine {
        builder = builder.with_engine(engine);
    }
    (builder.build().expect("default config is valid"), status)
}
