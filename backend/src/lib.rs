//! Tubely upload service
//!
//! Accepts thumbnail and video uploads for existing video records. Thumbnails are kept on
//! the local asset volume, videos are probed, remuxed for fast start and pushed to S3.

#![deny(clippy::all, clippy::pedantic, clippy::nursery)]

/// Random asset names
pub mod asset_name;

/// Local asset volume for thumbnails
pub mod asset_storage;

/// JWT issuing and validation
pub mod jwt;

/// Aspect probing, fast-start remuxing and scratch files
pub mod media_processing;

/// S3 object storage for videos
pub mod media_storage;

/// Request authentication
pub mod middleware;

/// HTTP routes
pub mod routes;

/// Server bootstrap
pub mod server;

/// Shared types (environment, errors, extractors)
pub mod types;

/// Multipart intake
pub mod upload;
