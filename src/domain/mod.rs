// Domain layer: roster and allocation models plus the ports the pipeline talks through.

pub mod model;
pub mod ports;
