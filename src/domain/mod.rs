// Domain layer: request/response models and the generator port.

pub mod model;
pub mod ports;
