//! Test doubles for external collaborators

mod publishing_api;

pub use publishing_api::{FakePublishingApi, InjectedFailure, Operation};
