// Domain layer: core models and ports (interfaces). Concrete loaders, validators
// and formatters live in adapters/ and core/.

pub mod model;
pub mod ports;
