//! SDK credentials scoping a client to one tenant

mod credential;

pub use credential::Credentials;
