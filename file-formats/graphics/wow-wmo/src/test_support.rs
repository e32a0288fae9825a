//! Small zones shared by the unit tests

use crate::types::{Color, TexCoord, Vec3};
use crate::zone::{Zone, ZoneDoodad, ZoneGroup, ZoneLight, ZoneMaterial, ZoneTriangle};

/// One quad in the XY plane made of two triangles on material 0
pub(crate) fn quad_group() -> ZoneGroup {
    let vertices = vec![
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
    ];
    ZoneGroup {
        normals: vec![Vec3::new(0.0, 0.0, 1.0); 4],
        tex_coords: vec![TexCoord::default(); 4],
        vertices,
        triangles: vec![
            ZoneTriangle {
                vertices: [0, 1, 2],
                material: 0,
            },
            ZoneTriangle {
                vertices: [0, 2, 3],
                material: 0,
            },
        ],
        ..Default::default()
    }
}

/// Two textured materials, one light, two doodads sharing a model
pub(crate) fn sample_zone() -> Zone {
    Zone {
        name: "qeynos".into(),
        descriptive_name: "South Qeynos".into(),
        wmo_id: 7,
        ambient_color: Some(Color::rgba(10, 20, 30, 255)),
        materials: vec![
            ZoneMaterial {
                texture: Some("grass01".into()),
                ..Default::default()
            },
            ZoneMaterial {
                texture: Some("stone".into()),
                ..Default::default()
            },
        ],
        groups: vec![quad_group()],
        lights: vec![ZoneLight {
            position: Vec3::new(1.0, 2.0, 3.0),
            attenuation_start: 2.0,
            attenuation_end: 8.0,
            ..Default::default()
        }],
        doodads: vec![
            ZoneDoodad {
                model_name: "lamp".into(),
                ..Default::default()
            },
            ZoneDoodad {
                model_name: "barrel".into(),
                ..Default::default()
            },
            ZoneDoodad {
                model_name: "lamp".into(),
                position: Vec3::new(5.0, 0.0, 0.0),
                ..Default::default()
            },
        ],
        ..Default::default()
    }
}
