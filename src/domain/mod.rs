// Domain layer: entities, organization services and ports. No file IO here.

pub mod model;
pub mod ports;
pub mod registry;
pub mod services;
