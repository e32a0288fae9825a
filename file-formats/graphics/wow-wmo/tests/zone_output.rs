//! Integration tests for assembling and writing zones

use std::io;
use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::{fixture, rstest};
use tempfile::TempDir;
use wow_wmo::{
    LiquidKind, LiquidPlane, LiquidSlant, TexCoord, Vec3, WmoWriteOptions, WmoWriter, Zone,
    ZoneGroup, ZoneMaterial, ZoneTriangle,
};

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

/// Walk the top-level chunks of a file and return the payload of `id`
fn find_chunk<'a>(bytes: &'a [u8], id: &[u8; 4]) -> Option<&'a [u8]> {
    let stored = [id[3], id[2], id[1], id[0]];
    let mut at = 0;
    while at + 8 <= bytes.len() {
        let size = read_u32(bytes, at + 4) as usize;
        let payload = &bytes[at + 8..at + 8 + size];
        if bytes[at..at + 4] == stored {
            return Some(payload);
        }
        at += 8 + size;
    }
    None
}

fn quad_group(offset: f32) -> ZoneGroup {
    let vertices: Vec<Vec3> = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]
        .iter()
        .map(|&(x, y)| Vec3::new(x + offset, y, 0.0))
        .collect();
    ZoneGroup {
        normals: vec![Vec3::new(0.0, 0.0, 1.0); vertices.len()],
        tex_coords: vec![TexCoord::default(); vertices.len()],
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

fn zone_with_groups(count: usize) -> Zone {
    Zone {
        name: "freporte".into(),
        descriptive_name: "East Freeport".into(),
        materials: vec![ZoneMaterial {
            texture: Some("water".into()),
            ..Default::default()
        }],
        groups: (0..count).map(|i| quad_group(i as f32)).collect(),
        ..Default::default()
    }
}

#[fixture]
fn lake_zone() -> Zone {
    let mut zone = zone_with_groups(2);
    zone.groups[1].liquid = Some(LiquidPlane {
        high_z: 10.0,
        low_z: 0.0,
        slant: LiquidSlant::NorthHighSouthLow,
        ..LiquidPlane::flat(LiquidKind::Water, [0.0, 0.0], [10.0, 10.0], 10.0)
    });
    zone
}

/// Captures formatted log output of everything run inside [`capture_logs`]
#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = SharedBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    let logs = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
    (result, logs)
}

#[test]
fn test_thousand_groups_logged_not_fatal() {
    let dir = TempDir::new().unwrap();
    let zone = zone_with_groups(1000);

    let (written, logs) =
        capture_logs(|| WmoWriter::default().write_to_dir(&zone, dir.path()).unwrap());

    assert!(logs.contains("ERROR"), "{logs}");
    assert!(logs.contains("1000 groups"), "{logs}");
    assert_eq!(written.groups.len(), 1000);
    assert_eq!(
        written.groups.last().unwrap(),
        &dir.path().join("freporte_999.wmo")
    );

    let root = std::fs::read(&written.root).unwrap();
    let mohd = find_chunk(&root, b"MOHD").unwrap();
    assert_eq!(read_u32(mohd, 4), 1000);
    assert_eq!(find_chunk(&root, b"MOGI").unwrap().len(), 1000 * 32);
}

#[test]
fn test_small_zone_logs_nothing() {
    let (assembled, logs) = capture_logs(|| WmoWriter::default().assemble(&zone_with_groups(3)));
    assert_eq!(assembled.unwrap().groups.len(), 3);
    assert!(logs.is_empty(), "{logs}");
}

#[test]
fn test_unknown_slant_logs_error() {
    let (slant, logs) = capture_logs(|| LiquidSlant::from_raw(7));
    assert_eq!(slant, LiquidSlant::None);
    assert!(logs.contains("ERROR"), "{logs}");
}

#[rstest]
fn test_liquid_group_file(lake_zone: Zone) {
    let assembled = WmoWriter::default().assemble(&lake_zone).unwrap();

    let dry = find_chunk(&assembled.groups[0], b"MOGP").unwrap();
    assert!(find_chunk(&dry[68..], b"MLIQ").is_none());

    let wet = find_chunk(&assembled.groups[1], b"MOGP").unwrap();
    let mliq = find_chunk(&wet[68..], b"MLIQ").unwrap();
    assert_eq!(read_u32(mliq, 0), 4);
    assert_eq!(read_u32(mliq, 4), 4);
    assert_eq!(read_u32(mliq, 8), 3);
    assert_eq!(read_u32(mliq, 12), 3);
    // 16 water vertices then 9 tile flags
    assert_eq!(mliq.len(), 30 + 16 * 8 + 9);

    let height = |i: usize| {
        let at = 30 + i * 8 + 4;
        f32::from_le_bytes([mliq[at], mliq[at + 1], mliq[at + 2], mliq[at + 3]])
    };
    assert!(height(0).abs() < 1e-4);
    assert!((height(3) - 10.0).abs() < 1e-4);
}

#[rstest]
fn test_root_header_bytes(lake_zone: Zone) {
    let root = WmoWriter::default().assemble(&lake_zone).unwrap().root;

    assert_eq!(&root[..12], b"REVM\x04\0\0\0\x11\0\0\0");
    let mohd = find_chunk(&root, b"MOHD").unwrap();
    assert_eq!(mohd.len(), 64);
    assert_eq!(read_u32(mohd, 0), 1); // materials
    assert_eq!(read_u32(mohd, 4), 2); // groups
    assert_eq!(read_u32(mohd, 24), 1); // doodad sets

    let motx = find_chunk(&root, b"MOTX").unwrap();
    assert!(motx.starts_with(b"WORLD\\EVERQUEST\\ZONETEXTURES\\FREPORTE\\WATER.BLP\0"));
    assert!(find_chunk(&root, b"MCVP").is_none());
}

#[rstest]
fn test_custom_folders(lake_zone: Zone) {
    let options = WmoWriteOptions {
        zone_texture_folder: "WORLD\\CUSTOM".into(),
        add_convex_volume_planes: true,
        ..Default::default()
    };
    let root = WmoWriter::new(options).assemble(&lake_zone).unwrap().root;

    let motx = find_chunk(&root, b"MOTX").unwrap();
    assert!(motx.starts_with(b"WORLD\\CUSTOM\\FREPORTE\\WATER.BLP\0"));
    assert_eq!(find_chunk(&root, b"MCVP").unwrap().len(), 0);
}

proptest! {
    #[test]
    fn test_group_count_matches_root(count in 0usize..24) {
        let assembled = WmoWriter::default().assemble(&zone_with_groups(count)).unwrap();
        prop_assert_eq!(assembled.groups.len(), count);

        let mohd = find_chunk(&assembled.root, b"MOHD").unwrap();
        prop_assert_eq!(read_u32(mohd, 4) as usize, count);
        prop_assert_eq!(find_chunk(&assembled.root, b"MOGI").unwrap().len(), count * 32);

        for group in &assembled.groups {
            prop_assert_eq!(&group[..4], b"REVM");
            let mogp = find_chunk(group, b"MOGP").unwrap();
            prop_assert_eq!(mogp.len() + 20, group.len());
        }
    }
}
