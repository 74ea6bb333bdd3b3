// Domain layer: entities and ports. No knowledge of files or command-line parsing.

pub mod model;
pub mod ports;
