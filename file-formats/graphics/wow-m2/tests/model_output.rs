//! Integration tests for assembling and writing M2 models

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::{fixture, rstest};
use tempfile::TempDir;
use wow_data::prelude::*;
use wow_m2::chunks::{M2BlendMode, M2Material, M2RenderFlags, M2Sequence, M2Vertex};
use wow_m2::common::Fixed16;
use wow_m2::domain::{ModelBone, ModelTexture, ModelTriangle};
use wow_m2::{M2Header, M2Model, M2WriteOptions, ModelType, ObjectModel, Skin};

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

/// Every (count, offset) pair in the fixed header, with its element size
fn header_arrays(header: &M2Header) -> Vec<(&'static str, u32, u32, usize)> {
    vec![
        ("name", header.name.count, header.name.offset, 1),
        ("global loops", header.global_loops.count, header.global_loops.offset, 4),
        ("sequences", header.sequences.count, header.sequences.offset, 64),
        ("bones", header.bones.count, header.bones.offset, 88),
        ("vertices", header.vertices.count, header.vertices.offset, 48),
        ("textures", header.textures.count, header.textures.offset, 16),
        ("materials", header.materials.count, header.materials.offset, 4),
        ("bone lookup", header.bone_lookup.count, header.bone_lookup.offset, 2),
        ("attachments", header.attachments.count, header.attachments.offset, 40),
        ("events", header.events.count, header.events.offset, 36),
        ("cameras", header.cameras.count, header.cameras.offset, 100),
    ]
}

#[fixture]
fn static_model() -> ObjectModel {
    let corners = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
    ObjectModel {
        name: "Crate01".into(),
        bones: vec![ModelBone::default()],
        vertices: corners
            .iter()
            .map(|&(x, y)| {
                M2Vertex::rigid(
                    C3Vector::new(x, y, 0.0),
                    C3Vector::new(0.0, 0.0, 1.0),
                    C2Vector::new(x, y),
                    0,
                )
            })
            .collect(),
        triangles: vec![
            ModelTriangle {
                vertices: [0, 1, 2],
                material: 0,
            },
            ModelTriangle {
                vertices: [0, 2, 3],
                material: 0,
            },
        ],
        textures: vec![ModelTexture {
            name: "crate01".into(),
            ..Default::default()
        }],
        materials: vec![M2Material::new(M2RenderFlags::empty(), M2BlendMode::Opaque)],
        texture_lookup: vec![0],
        texture_mapping_lookup: vec![0],
        transparency_lookup: vec![0],
        texture_transparencies: vec![TrackSequence::constant(
            Interpolation::None,
            Fixed16::OPAQUE,
        )],
        bounding_box: BoundingBox::new(C3Vector::origin(), C3Vector::new(1.0, 1.0, 0.0)),
        bounding_radius: 0.75,
        ..Default::default()
    }
}

#[fixture]
fn skeletal_model(static_model: ObjectModel) -> ObjectModel {
    let mut bone = ModelBone::default();
    bone.translation
        .add_sequence([(0, C3Vector::origin()), (500, C3Vector::new(0.0, 0.0, 1.0))]);
    bone.rotation.add_sequence([(0, Quaternion::identity())]);

    ObjectModel {
        name: "Skeleton".into(),
        model_type: ModelType::Skeletal,
        sequences: vec![M2Sequence::default(), M2Sequence::default()],
        sequence_lookup: vec![0],
        bones: vec![bone, ModelBone::default()],
        key_bone_lookup: vec![-1; 27],
        idle_sound: Some(42),
        combat_events: true,
        ..static_model
    }
}

#[rstest]
fn test_single_static_model(static_model: ObjectModel) {
    let m2 = M2Model::from_object_model(&static_model, &M2WriteOptions::default()).unwrap();
    let header = m2.emit().unwrap().descriptor;

    assert_eq!(header.bones.count, 1);
    assert_eq!(header.vertices.count, 4);
    assert_eq!(header.sequences.count, 0);
    assert_eq!(header.num_skin_profiles, 1);

    let skin = m2.skin.emit().unwrap().descriptor;
    assert_eq!(skin.triangles.count, 6);
    assert_eq!(skin.submeshes.count, 1);
}

#[rstest]
fn test_write_to_dir(static_model: ObjectModel) {
    let dir = TempDir::new().unwrap();
    let m2 = M2Model::from_object_model(&static_model, &M2WriteOptions::default()).unwrap();
    let path = m2.write_to_dir(dir.path().join("out")).unwrap();

    assert_eq!(path, dir.path().join("out").join("Crate01.m2"));
    let model_bytes = std::fs::read(&path).unwrap();
    assert_eq!(model_bytes, m2.to_bytes().unwrap());

    let skin_bytes = std::fs::read(dir.path().join("out").join(Skin::file_name("Crate01"))).unwrap();
    assert_eq!(&skin_bytes[..4], b"SKIN");
    assert_eq!(read_u32(&skin_bytes, 12), 6);

    let leftovers: Vec<_> = std::fs::read_dir(dir.path().join("out"))
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[rstest]
fn test_arrays_point_past_header(skeletal_model: ObjectModel) {
    let m2 = M2Model::from_object_model(&skeletal_model, &M2WriteOptions::default()).unwrap();
    let emitted = m2.emit().unwrap();

    for (name, count, offset, size) in header_arrays(&emitted.descriptor) {
        if count == 0 {
            assert_eq!(offset, 0, "{name}");
            continue;
        }
        assert!(offset as usize >= M2Header::BASE_SIZE, "{name}");
        assert_eq!(offset % 16, 0, "{name}");
        assert!(offset as usize + count as usize * size <= emitted.len(), "{name}");
    }
    assert_eq!(emitted.descriptor.attachments.count, 11);
    assert_eq!(emitted.descriptor.events.count, 9);
    assert_eq!(emitted.descriptor.cameras.count, 1);
}

#[rstest]
fn test_header_matches_bytes(skeletal_model: ObjectModel) {
    let m2 = M2Model::from_object_model(&skeletal_model, &M2WriteOptions::default()).unwrap();
    let emitted = m2.emit().unwrap();
    assert_eq!(
        emitted.bytes[..M2Header::BASE_SIZE],
        emitted.descriptor.wow_bytes().unwrap()[..]
    );
}

proptest! {
    #[test]
    fn test_sections_stay_aligned(
        vertex_count in 3usize..40,
        loops in proptest::collection::vec(1u32..10_000, 0..5),
        name in "[A-Za-z]{1,24}",
        texture_names in proptest::collection::vec("[a-z]{1,12}", 1..4),
    ) {
        let vertices = (0..vertex_count)
            .map(|i| M2Vertex::rigid(
                C3Vector::new(i as f32, 0.0, 0.0),
                C3Vector::new(0.0, 0.0, 1.0),
                C2Vector::default(),
                0,
            ))
            .collect();
        let model = ObjectModel {
            name,
            bones: vec![ModelBone::default()],
            vertices,
            global_loops: loops,
            textures: texture_names
                .into_iter()
                .map(|name| ModelTexture { name, ..Default::default() })
                .collect(),
            ..Default::default()
        };

        let m2 = M2Model::from_object_model(&model, &M2WriteOptions::default()).unwrap();
        let emitted = m2.emit().unwrap();
        prop_assert_eq!(emitted.len() % 16, 0);
        for (name, count, offset, size) in header_arrays(&emitted.descriptor) {
            if count > 0 {
                prop_assert!(offset as usize >= M2Header::BASE_SIZE, "{}", name);
                prop_assert!(offset as usize + count as usize * size <= emitted.len(), "{}", name);
            }
        }
    }
}
