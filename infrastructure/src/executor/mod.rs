//! Task executor adapters

mod fixture;

pub use fixture::{FixtureExecutor, FixtureResponse};
