#![warn(clippy::all, clippy::pedantic)]

pub mod systems_tests;
