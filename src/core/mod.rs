// src/core/mod.rs
pub mod control_loop;
pub mod input_types;
pub mod knowledge;
pub mod matcher;
pub mod overlay;
