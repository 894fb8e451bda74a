//! DigitalOcean provider for Dropkeep
//!
//! This crate implements the DropletProvider trait over the DigitalOcean v2
//! REST API, so the lifecycle orchestrator can back up, restore and destroy
//! droplets.
//!
//! # Features
//!
//! - Droplet, image and SSH key listing (all pages)
//! - Droplet creation, shutdown, snapshot and deletion
//! - Image deletion
//! - Action status polling
//!
//! # Requirements
//!
//! - A personal access token with read/write scope
//!
//! # Example
//!
//! ```ignore
//! use dropkeep_cloud::{DropletLifecycle, LifecycleConfig, TracingReporter};
//! use dropkeep_cloud_digitalocean::DigitalOceanProvider;
//! use std::sync::Arc;
//!
//! let provider = DigitalOceanProvider::new(token);
//! let lifecycle = DropletLifecycle::new(
//!     provider,
//!     LifecycleConfig::default(),
//!     Arc::new(TracingReporter),
//! );
//!
//! lifecycle.backup("web-01", None).await?;
//! ```

pub mod api;
pub mod error;
pub mod provider;

pub use api::{DIGITALOCEAN_API_BASE, DigitalOceanApi};
pub use error::{DigitalOceanError, Result};
pub use provider::DigitalOceanProvider;
