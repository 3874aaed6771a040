//! Video metadata storage for Tubely
//!
//! This crate owns the video record and the gateway the upload service uses to read a
//! record and commit its asset URLs. Records are created and migrated elsewhere; this
//! crate never deletes them.

pub mod video;
