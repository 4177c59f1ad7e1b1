//! Cloud Firestore backend over the REST v1 API.
//!
//! - `client`: document get/set/update/delete/list with API-key auth
//! - `value`: JSON ⇄ Firestore typed value conversion
//! - `repositories`: record, prompt and conversation repositories

pub mod client;
pub mod repositories;
pub mod value;

pub use client::{FirestoreClient, FirestoreError};
pub use repositories::{
    FirestoreConversationRepository, FirestoreDivinationRepository, FirestorePromptRepository,
};
