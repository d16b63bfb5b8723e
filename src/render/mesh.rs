use std::f32::consts::TAU;

use bytemuck::{Pod, Zeroable};
use wgpu::*;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
}

impl MeshVertex {
    pub fn desc() -> VertexBufferLayout<'static> {
        VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as BufferAddress,
            step_mode: VertexStepMode::Vertex,
            attributes: &[VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: VertexFormat::Float32x3,
            }],
        }
    }
}

/// Unit circle as a fan: `arc_vertices` rim vertices followed by the centre.
///
/// wgpu has no fan topology, so the fan comes with triangle-list indices
/// `(centre, i, i + 1)` wrapping back to the first rim vertex.
pub fn circle_fan(arc_vertices: u32) -> (Vec<MeshVertex>, Vec<u32>) {
    let step = TAU / arc_vertices as f32;

    let mut vertices: Vec<MeshVertex> = (0..arc_vertices)
        .map(|i| {
            let theta = step * i as f32;
            MeshVertex { position: [theta.cos(), theta.sin(), 0.0] }
        })
        .collect();
    vertices.push(MeshVertex { position: [0.0, 0.0, 0.0] });

    let centre = arc_vertices;
    let indices = (0..arc_vertices)
        .flat_map(|i| [centre, i, (i + 1) % arc_vertices])
        .collect();

    (vertices, indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fan_has_rim_plus_centre() {
        let (vertices, indices) = circle_fan(50);

        assert_eq!(vertices.len(), 51);
        assert_eq!(vertices[50].position, [0.0, 0.0, 0.0]);
        assert_eq!(indices.len(), 50 * 3);
        for vertex in &vertices[..50] {
            let [x, y, z] = vertex.position;
            assert!(((x * x + y * y).sqrt() - 1.0).abs() < 1e-5);
            assert_eq!(z, 0.0);
        }
    }

    #[test]
    fn fan_closes_the_circle() {
        let (_, indices) = circle_fan(4);
        assert_eq!(indices, vec![4, 0, 1, 4, 1, 2, 4, 2, 3, 4, 3, 0]);
    }
}
