// ABOUTME: In-memory provider, fetcher, and writer doubles for engine and listing tests
// ABOUTME: Records calls so tests can assert on what the engine asked for

use async_trait::async_trait;
use gifpeek_sdk::{Fetcher, GifError, GifResult, Result as SdkResult, SearchOptions, SearchProvider};
use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

pub fn result(id: &str, title: &str) -> GifResult {
    GifResult {
        id: id.to_string(),
        title: title.to_string(),
        url: format!("https://media.example/{}/full.gif", id),
        preview_url: format!("https://media.example/{}/tiny.gif", id),
        ..Default::default()
    }
}

#[derive(Default)]
pub struct FakeProvider {
    pub results: Vec<GifResult>,
    pub fail_with: Option<u16>,
    pub queries: Mutex<Vec<String>>,
}

impl FakeProvider {
    pub fn with_results(results: Vec<GifResult>) -> Self {
        Self {
            results,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchProvider for FakeProvider {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn search(&self, query: &str, _options: &SearchOptions) -> SdkResult<Vec<GifResult>> {
        self.queries.lock().unwrap().push(query.to_string());
        match self.fail_with {
            Some(status) => Err(GifError::Http(status)),
            None => Ok(self.results.clone()),
        }
    }
}

/// Serves fixed bytes per URL; unknown URLs fail with HTTP 404.
#[derive(Default)]
pub struct FakeFetcher {
    pub bodies: HashMap<String, Vec<u8>>,
    pub fetched: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn serve(mut self, url: &str, body: Vec<u8>) -> Self {
        self.bodies.insert(url.to_string(), body);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> SdkResult<Vec<u8>> {
        self.fetched.lock().unwrap().push(url.to_string());
        self.bodies.get(url).cloned().ok_or(GifError::Http(404))
    }
}

/// Cloneable writer whose contents stay readable after the writer is moved away.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
