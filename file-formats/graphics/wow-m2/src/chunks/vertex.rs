use wow_data::prelude::*;

/// Represents a vertex in an M2 model (48 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Default, WowDataW)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-support", serde(default))]
pub struct M2Vertex {
    /// Position of the vertex
    pub position: C3Vector,
    /// Bone weights (0-255), summing to 255
    pub bone_weights: [u8; 4],
    /// Bone indices into the bone list
    pub bone_indices: [u8; 4],
    /// Normal vector
    pub normal: C3Vector,
    /// Primary texture coordinates
    pub tex_coords: C2Vector,
    /// Secondary texture coordinates
    pub tex_coords2: C2Vector,
}

impl M2Vertex {
    /// A vertex fully weighted to one bone
    pub fn rigid(position: C3Vector, normal: C3Vector, tex_coords: C2Vector, bone: u8) -> Self {
        Self {
            position,
            bone_weights: [255, 0, 0, 0],
            bone_indices: [bone, 0, 0, 0],
            normal,
            tex_coords,
            tex_coords2: C2Vector::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_vertex_layout() {
        assert_eq!(M2Vertex::WOW_SIZE, 48);

        let vertex = M2Vertex::rigid(
            C3Vector::new(1.0, 0.0, 0.0),
            C3Vector::new(0.0, 0.0, 1.0),
            C2Vector::new(0.5, 0.5),
            2,
        );
        let bytes = vertex.wow_bytes().unwrap();
        assert_eq!(bytes[12..20], [255, 0, 0, 0, 2, 0, 0, 0]);
        assert_eq!(bytes[28..32], 1.0_f32.to_le_bytes());
        assert_eq!(bytes[32..36], 0.5_f32.to_le_bytes());
        assert_eq!(bytes[40..48], [0; 8]);
    }
}
