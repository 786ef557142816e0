//! Plots the accounts a user follows on a world map, using the free-text
//! location on each followed profile.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod web;
