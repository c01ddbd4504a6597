// Application layer: the commands the binary exposes, on top of domain and persistence.

pub mod commands;
