//! Gambit: a chess academy site with a file-backed blog and booking by
//! messaging deep link.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
