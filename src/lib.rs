//! School timetable generation service.
//!
//! This library provides the domain model, curriculum catalog, occupancy
//! grid and greedy block-packing generator for weekly school timetables,
//! plus the REST layer that exposes them.

pub mod api;
pub mod catalog;
pub mod demo_data;
pub mod domain;
pub mod generator;
pub mod grid;
pub mod store;
