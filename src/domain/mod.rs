// Domain layer: data model and service ports. Concrete HTTP clients live under adapters.

pub mod model;
pub mod ports;
