//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate editor components and repositories into use-case APIs.
//! - Keep UI layers decoupled from storage details.

pub mod document_session;
pub mod editor_session;
pub mod style_service;
