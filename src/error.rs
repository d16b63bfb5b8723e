use thiserror::Error;

/// Rejected simulation configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid range for `{name}`: min {min} > max {max}")]
    InvalidRange { name: &'static str, min: f32, max: f32 },

    #[error("`{name}` must be positive, got {value}")]
    NotPositive { name: &'static str, value: f32 },

    #[error("`{name}` must be at least {min}, got {value}")]
    TooSmall { name: &'static str, min: u32, value: u32 },

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Failures while bringing up the window or the GPU.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter found")]
    NoAdapter,

    #[error("failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
}
