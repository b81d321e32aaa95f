//! HTTP route handlers

pub mod chat;
pub mod news;
pub mod pages;
pub mod quiz;
