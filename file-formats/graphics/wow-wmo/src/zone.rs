//! In-memory description of a zone, the input to the WMO assemblers

use crate::error::{Result, WmoError};
use crate::liquid::LiquidPlane;
use crate::types::{BoundingBox, Color, Quat, TexCoord, Vec3};
use crate::wmo_group_types::WmoBspNode;
use crate::wmo_types::{ConvexVolumePlane, WmoBlendMode, WmoMaterialFlags};

/// A material shared by every group of the zone
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-support", serde(default))]
pub struct ZoneMaterial {
    /// Texture name without folder or extension
    pub texture: Option<String>,
    pub blend_mode: WmoBlendMode,
    pub flags: WmoMaterialFlags,
    /// Triangles using a non-renderable material only collide
    pub renderable: bool,
}

impl Default for ZoneMaterial {
    fn default() -> Self {
        Self {
            texture: None,
            blend_mode: WmoBlendMode::Opaque,
            flags: WmoMaterialFlags::empty(),
            renderable: true,
        }
    }
}

/// Which side of the world a group sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-support", serde(rename_all = "snake_case"))]
pub enum GroupPlacement {
    #[default]
    Exterior,
    Interior,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct ZoneTriangle {
    pub vertices: [u16; 3],
    pub material: u16,
}

/// Collision tree built upstream, encoded as `MOBN`/`MOBR`
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-support", serde(default))]
pub struct BspTree {
    pub nodes: Vec<WmoBspNode>,
    pub face_indices: Vec<u16>,
}

impl BspTree {
    /// A single leaf holding every triangle
    pub fn single_leaf(triangle_count: u16) -> Self {
        Self {
            nodes: vec![WmoBspNode::leaf(0, triangle_count)],
            face_indices: (0..triangle_count).collect(),
        }
    }
}

/// One disjoint mesh partition, written as its own group file
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-support", serde(default))]
pub struct ZoneGroup {
    /// Group name, the zone name when absent
    pub name: Option<String>,
    /// Descriptive name, the zone's descriptive name when absent
    pub descriptive_name: Option<String>,
    /// `WMOAreaTable` group id
    pub group_id: u32,
    pub placement: GroupPlacement,
    pub liquid_volume: bool,
    /// Computed from the vertices when absent
    pub bounding_box: Option<BoundingBox>,
    pub vertices: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub tex_coords: Vec<TexCoord>,
    pub vertex_colors: Vec<Color>,
    pub triangles: Vec<ZoneTriangle>,
    pub light_refs: Vec<u16>,
    pub doodad_refs: Vec<u16>,
    /// A single leaf over every triangle when absent
    pub bsp: Option<BspTree>,
    pub liquid: Option<LiquidPlane>,
}

impl ZoneGroup {
    pub fn bounds(&self) -> BoundingBox {
        self.bounding_box
            .or_else(|| BoundingBox::from_points(&self.vertices))
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-support", serde(default))]
pub struct ZoneLight {
    pub position: Vec3,
    pub color: Color,
    pub intensity: f32,
    pub attenuation_start: f32,
    pub attenuation_end: f32,
}

impl Default for ZoneLight {
    fn default() -> Self {
        Self {
            position: Vec3::default(),
            color: Color::WHITE,
            intensity: 1.0,
            attenuation_start: 0.0,
            attenuation_end: 0.0,
        }
    }
}

/// A placed static model
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-support", serde(default))]
pub struct ZoneDoodad {
    /// Model name without folder or extension
    pub model_name: String,
    pub position: Vec3,
    pub orientation: Quat,
    pub scale: f32,
    pub color: Color,
    pub flags: u8,
}

impl Default for ZoneDoodad {
    fn default() -> Self {
        Self {
            model_name: String::new(),
            position: Vec3::default(),
            orientation: Quat::IDENTITY,
            scale: 1.0,
            color: Color::WHITE,
            flags: 0,
        }
    }
}

/// Fog written to `MFOG`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-support", serde(default))]
pub struct ZoneFog {
    pub infinite_radius: bool,
    pub position: Vec3,
    pub near_radius: f32,
    pub far_radius: f32,
    pub end: f32,
    pub start_scalar: f32,
    pub color: Color,
    pub underwater_end: f32,
    pub underwater_start_scalar: f32,
    pub underwater_color: Color,
}

impl Default for ZoneFog {
    fn default() -> Self {
        Self {
            infinite_radius: false,
            position: Vec3::default(),
            near_radius: 0.0,
            far_radius: 0.0,
            end: 444.4445,
            start_scalar: 0.25,
            color: Color::WHITE,
            underwater_end: 222.2222,
            underwater_start_scalar: -0.5,
            underwater_color: Color::WHITE,
        }
    }
}

/// A complete zone: one root file plus one group file per [`ZoneGroup`]
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-support", serde(default))]
pub struct Zone {
    /// Short name, used for file names and texture folders
    pub name: String,
    pub descriptive_name: String,
    /// `WMOAreaTable` root id
    pub wmo_id: u32,
    pub ambient_color: Option<Color>,
    /// Union of the group bounds when absent
    pub bounding_box: Option<BoundingBox>,
    pub materials: Vec<ZoneMaterial>,
    pub groups: Vec<ZoneGroup>,
    pub lights: Vec<ZoneLight>,
    pub doodads: Vec<ZoneDoodad>,
    pub fog: ZoneFog,
    pub convex_volume_planes: Vec<ConvexVolumePlane>,
}

impl Zone {
    pub fn bounds(&self) -> BoundingBox {
        if let Some(bounds) = self.bounding_box {
            return bounds;
        }
        let corners: Vec<Vec3> = self
            .groups
            .iter()
            .map(ZoneGroup::bounds)
            .flat_map(|b| [b.min, b.max])
            .collect();
        BoundingBox::from_points(&corners).unwrap_or_default()
    }

    /// Check every cross-reference before anything is rendered
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() || !self.name.is_ascii() {
            return Err(WmoError::InvalidFormat(format!(
                "zone name {:?} must be non-empty ASCII",
                self.name
            )));
        }
        // 0xFF marks collision-only triangles in MOPY
        if self.materials.len() > 0xFF {
            return Err(WmoError::reference("materials", self.materials.len(), 0xFF));
        }

        for (index, group) in self.groups.iter().enumerate() {
            self.validate_group(index, group)?;
        }
        Ok(())
    }

    fn validate_group(&self, index: usize, group: &ZoneGroup) -> Result<()> {
        let vertex_count = group.vertices.len();
        if vertex_count > usize::from(u16::MAX) + 1 {
            return Err(WmoError::reference(
                format!("group {index} vertices"),
                vertex_count,
                usize::from(u16::MAX) + 1,
            ));
        }
        for (what, len) in [
            ("normals", group.normals.len()),
            ("texture coordinates", group.tex_coords.len()),
        ] {
            if len != vertex_count {
                return Err(WmoError::InvalidFormat(format!(
                    "group {index} has {len} {what} for {vertex_count} vertices"
                )));
            }
        }
        if !group.vertex_colors.is_empty() && group.vertex_colors.len() != vertex_count {
            return Err(WmoError::InvalidFormat(format!(
                "group {index} has {} vertex colors for {vertex_count} vertices",
                group.vertex_colors.len()
            )));
        }

        for triangle in &group.triangles {
            if let Some(&v) = triangle.vertices.iter().find(|&&v| usize::from(v) >= vertex_count) {
                return Err(WmoError::reference(
                    format!("group {index} triangle vertex"),
                    usize::from(v),
                    vertex_count,
                ));
            }
            if usize::from(triangle.material) >= self.materials.len() {
                return Err(WmoError::reference(
                    format!("group {index} triangle material"),
                    usize::from(triangle.material),
                    self.materials.len(),
                ));
            }
        }

        let refs = [
            ("light reference", &group.light_refs, self.lights.len()),
            ("doodad reference", &group.doodad_refs, self.doodads.len()),
        ];
        for (what, list, max) in refs {
            if let Some(&bad) = list.iter().find(|&&r| usize::from(r) >= max) {
                return Err(WmoError::reference(
                    format!("group {index} {what}"),
                    usize::from(bad),
                    max,
                ));
            }
        }

        if let Some(bsp) = &group.bsp {
            validate_bsp(index, bsp, group.triangles.len())?;
        }
        Ok(())
    }
}

fn validate_bsp(index: usize, bsp: &BspTree, triangle_count: usize) -> Result<()> {
    if let Some(&face) = bsp
        .face_indices
        .iter()
        .find(|&&f| usize::from(f) >= triangle_count)
    {
        return Err(WmoError::reference(
            format!("group {index} BSP face"),
            usize::from(face),
            triangle_count,
        ));
    }
    for node in &bsp.nodes {
        for child in [node.negative_child, node.positive_child] {
            if child >= 0 && child as usize >= bsp.nodes.len() {
                return Err(WmoError::reference(
                    format!("group {index} BSP child"),
                    child as usize,
                    bsp.nodes.len(),
                ));
            }
        }
        let end = node.first_face as usize + usize::from(node.face_count);
        if node.is_leaf() && end > bsp.face_indices.len() {
            return Err(WmoError::reference(
                format!("group {index} BSP leaf faces"),
                end,
                bsp.face_indices.len(),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::quad_group;

    fn zone() -> Zone {
        Zone {
            name: "qeynos".into(),
            materials: vec![ZoneMaterial::default()],
            groups: vec![quad_group()],
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_zone() {
        zone().validate().unwrap();
    }

    #[test]
    fn test_bounds_from_groups() {
        let bounds = zone().bounds();
        assert_eq!(bounds.min, Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(bounds.max, Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_bad_triangle_material() {
        let mut zone = zone();
        zone.groups[0].triangles[1].material = 3;
        assert!(matches!(
            zone.validate(),
            Err(WmoError::InvalidReference { value: 3, max: 1, .. })
        ));
    }

    #[test]
    fn test_bad_doodad_reference() {
        let mut zone = zone();
        zone.groups[0].doodad_refs = vec![0];
        assert!(matches!(
            zone.validate(),
            Err(WmoError::InvalidReference { value: 0, max: 0, .. })
        ));
    }

    #[test]
    fn test_mismatched_normals() {
        let mut zone = zone();
        zone.groups[0].normals.pop();
        assert!(matches!(zone.validate(), Err(WmoError::InvalidFormat(_))));
    }

    #[test]
    fn test_bsp_face_out_of_range() {
        let mut zone = zone();
        zone.groups[0].bsp = Some(BspTree {
            nodes: vec![WmoBspNode::leaf(0, 1)],
            face_indices: vec![5],
        });
        assert!(zone.validate().is_err());

        zone.groups[0].bsp = Some(BspTree::single_leaf(2));
        zone.validate().unwrap();
    }

    #[test]
    fn test_empty_name() {
        let zone = Zone {
            name: String::new(),
            ..zone()
        };
        assert!(matches!(zone.validate(), Err(WmoError::InvalidFormat(_))));
    }
}
