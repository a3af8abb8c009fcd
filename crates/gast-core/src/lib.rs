//! Core types for gast: the generic node table every source language is
//! normalized into, its structural validation, batch configuration, and the
//! on-disk layout of batch output streams.

pub mod config;
pub mod node;
pub mod storage;
pub mod validate;
