pub mod client;

pub use client::{BoardClient, Notice};
