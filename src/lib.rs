// SPDX-License-Identifier: MIT

//! Turns free-text process descriptions into flowchart-ready workflow graphs.

pub mod adk;
pub mod flowdraft;
