// ABOUTME: Library exports for gifpeek CLI modules for testing and external use
// ABOUTME: Exposes the preview engine and listing modules to integration tests and benches

pub mod cli;
pub mod cli_output;
pub mod config;
pub mod constants;
pub mod decode;
pub mod download;
pub mod error;
pub mod image_protocols;
pub mod output;
pub mod providers;
pub mod text;
pub mod thumbs;
pub mod tui;

#[cfg(test)]
mod test_support;
