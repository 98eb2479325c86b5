pub mod container_config;

pub use container_config::ContainerConfig;
