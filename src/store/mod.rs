//! Client for the experiment-tracking artifact store.
//!
//! The store is an external HTTP service exposing the three things the
//! cleaning step needs: resolving a named artifact to a downloadable
//! file, publishing a local file as a new artifact version, and a run
//! context for attaching configuration and marking completion.

pub mod artifact;
pub mod client;
pub mod run;

pub use artifact::{ArtifactDraft, ArtifactHandle, PublishedArtifact};
pub use client::StoreClient;
pub use run::RunContext;
