//! Request and Response models for the library API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{CreateBookRequest, CreateLoanRequest, UpdateBookRequest};
pub use responses::{HealthResponse, Resource, ResourceLinks, StatsResponse};
