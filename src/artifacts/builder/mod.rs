//! Turning staged entries into trees and trees into commits

pub mod commit_builder;
pub mod tree_builder;
