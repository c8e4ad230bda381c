pub mod adapters;
pub mod repositories;
pub mod web;
