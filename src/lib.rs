//! Client-side behavior of a personal portfolio page.
//!
//! Four independent components: a particle backdrop on a canvas, a card list of
//! the owner's GitHub repositories, a light/dark theme toggle and a reveal
//! animation for elements entering the viewport. The browser wiring lives in
//! the `web` module, compiled for `wasm32` only; everything else runs natively
//! against the in-memory stand-ins in [`dom`] and [`particles`].

pub mod config;
pub mod dom;
pub mod error;
pub mod github;
pub mod models;
pub mod particles;
pub mod repos;
pub mod reveal;
pub mod theme;
pub mod types;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::SiteConfig;
pub use error::{PortfolioError, Result};
