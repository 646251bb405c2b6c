#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use api_session::{ApiSession, Config, Navigator};

#[derive(Clone, Default)]
pub struct RecordingNavigator {
    paths: Arc<Mutex<Vec<String>>>,
}

impl RecordingNavigator {
    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.paths.lock().unwrap().push(path.to_string());
    }
}

pub fn session(config: Config) -> (ApiSession, RecordingNavigator) {
    let navigator = RecordingNavigator::default();
    let session = ApiSession::new(config)
        .expect("session builds")
        .with_navigator(Arc::new(navigator.clone()));
    (session, navigator)
}

pub fn temp_path(name: &str) -> std::path::PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("api-session-{}-{}", name, uuid::Uuid::new_v4()));
    path
}
