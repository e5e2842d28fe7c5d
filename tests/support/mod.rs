#![allow(dead_code)]

pub mod fixtures;
pub mod scripted_fetcher;
pub mod socket_guard;
