//! Slug-addressed website page rendering.
//!
//! A request slug resolves to a static page or a content record, is rendered
//! through a template together with the site frame, and the markup is cached
//! per slug. [`application::site::SiteRenderer::render`] is the entry point
//! and always yields a page.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
