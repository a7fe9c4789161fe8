#![allow(clippy::doc_markdown)]
#![doc = include_str!("../README.md")]

pub mod consumption;
pub mod error;
pub mod fuel;
pub mod planner;
pub mod policy;
pub mod ports;
pub mod prelude;
pub mod price;
pub mod quantity;
pub mod ranking;
pub mod rob;
pub mod route;
pub mod vessel;
