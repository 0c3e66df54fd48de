//! Command line tooling for the data files of *Aurora* (Odyssey) engine games

pub mod commands;
