// SPDX-License-Identifier: MIT

//! Agent development kit: models, tools and the tool-calling agent loop.

pub mod agent;
pub mod error;
pub mod model;
pub mod tool;
