//! # World Engine Entry Point
//!
//! This is the entry point for the headless driver binary. It simply calls
//! into the library's `run()` function to load the scene and step the
//! simulation.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release -- [config.json]
//! ```

fn main() {
    world_engine::run();
}
