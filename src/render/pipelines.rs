use wgpu::*;

/// `src * src_alpha + dst`: overlapping sparks brighten instead of occluding.
pub fn create_additive_blend_state() -> BlendState {
    BlendState {
        color: BlendComponent {
            src_factor: BlendFactor::SrcAlpha,
            dst_factor: BlendFactor::One,
            operation: BlendOperation::Add,
        },
        alpha: BlendComponent {
            src_factor: BlendFactor::One,
            dst_factor: BlendFactor::One,
            operation: BlendOperation::Add,
        },
    }
}

pub fn create_color_target_state(surface_format: TextureFormat) -> ColorTargetState {
    ColorTargetState {
        format: surface_format,
        blend: Some(create_additive_blend_state()),
        write_mask: ColorWrites::ALL,
    }
}
