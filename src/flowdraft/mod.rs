// SPDX-License-Identifier: MIT

pub mod config;
pub mod generator;
pub mod server;
pub mod tools;
pub mod workflow;
