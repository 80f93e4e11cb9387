// Domain layer: models, ports and the field acceptance rules. No I/O here.

pub mod field;
pub mod model;
pub mod ports;
