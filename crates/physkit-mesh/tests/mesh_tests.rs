//! Integration tests for physkit-mesh.

use physkit_math::{DVec2, DVec3};
use physkit_mesh::generators::{quad_grid, unit_cube};
use physkit_mesh::normals::compute_vertex_normals;
use physkit_mesh::{Face, Group, Material, SurfaceMesh, VertexRef};
use physkit_types::{MaterialId, NormalId, PositionId, TexCoordId};

// ─── SurfaceMesh Tests ────────────────────────────────────────

fn make_single_triangle() -> SurfaceMesh {
    let mut mesh = SurfaceMesh::new();
    let a = mesh.add_position(DVec3::new(0.0, 0.0, 0.0));
    let b = mesh.add_position(DVec3::new(1.0, 0.0, 0.0));
    let c = mesh.add_position(DVec3::new(0.0, 1.0, 0.0));
    let mut group = Group::new("tri");
    group.add_face(Face::from_vertices(vec![
        VertexRef::new(a),
        VertexRef::new(b),
        VertexRef::new(c),
    ]));
    mesh.add_group(group).unwrap();
    mesh
}

#[test]
fn pools_return_sequential_ids() {
    let mut mesh = SurfaceMesh::new();
    assert_eq!(mesh.add_position(DVec3::X), PositionId(0));
    assert_eq!(mesh.add_position(DVec3::Y), PositionId(1));
    assert_eq!(mesh.add_normal(DVec3::Z), NormalId(0));
    assert_eq!(mesh.add_texture_coordinate(DVec2::new(0.5, 0.5)), TexCoordId(0));
    assert_eq!(mesh.vertex_count(), 2);
    assert_eq!(mesh.normal_count(), 1);
    assert_eq!(mesh.texture_coordinate_count(), 1);
    assert_eq!(mesh.position(PositionId(1)), DVec3::Y);
}

#[test]
fn basic_counts() {
    let mesh = make_single_triangle();
    assert_eq!(mesh.vertex_count(), 3);
    assert_eq!(mesh.group_count(), 1);
    assert_eq!(mesh.face_count(), 1);
}

#[test]
fn validate_ok() {
    assert!(make_single_triangle().validate().is_ok());
}

#[test]
fn duplicate_group_name_rejected() {
    let mut mesh = make_single_triangle();
    assert!(mesh.add_group(Group::new("tri")).is_err());
    assert!(mesh.add_group(Group::new("other")).is_ok());
}

#[test]
fn validate_catches_oob_position() {
    let mut mesh = make_single_triangle();
    let id = mesh.group_id("tri").unwrap();
    mesh.group_mut(id)
        .add_face(Face::from_vertices(vec![VertexRef::new(PositionId(99))]));
    assert!(mesh.validate().is_err());
}

#[test]
fn validate_catches_oob_normal_and_texture() {
    let mut mesh = make_single_triangle();
    mesh.groups_mut()[0].faces_mut()[0].vertices_mut()[0].normal = Some(NormalId(0));
    assert!(mesh.validate().is_err());

    let mut mesh = make_single_triangle();
    mesh.groups_mut()[0].faces_mut()[0].vertices_mut()[0].texture = Some(TexCoordId(3));
    assert!(mesh.validate().is_err());
}

#[test]
fn validate_catches_dangling_material() {
    let mut mesh = make_single_triangle();
    mesh.groups_mut()[0].set_material(Some(MaterialId(0)));
    assert!(mesh.validate().is_err());

    mesh.add_material(Material::new("red"));
    assert!(mesh.validate().is_ok());
}

#[test]
fn validate_catches_empty_face() {
    let mut mesh = make_single_triangle();
    mesh.groups_mut()[0].add_face(Face::new());
    assert!(mesh.validate().is_err());
}

#[test]
fn remove_group_shifts_later_ids() {
    let mut mesh = make_single_triangle();
    mesh.add_group(Group::new("second")).unwrap();
    let removed = mesh.remove_group(mesh.group_id("tri").unwrap());
    assert_eq!(removed.face_count(), 1);
    assert_eq!(mesh.group_id("second").map(|g| g.index()), Some(0));
}

#[test]
fn group_lookup_by_name() {
    let mut mesh = make_single_triangle();
    assert!(mesh.group_by_name("tri").is_some());
    assert!(mesh.group_by_name("nope").is_none());

    mesh.group_by_name_mut("tri")
        .unwrap()
        .set_material(None);
    assert_eq!(mesh.group_id("tri").map(|g| g.index()), Some(0));
}

#[test]
fn material_index_returns_first_match() {
    let mut mesh = SurfaceMesh::new();
    mesh.add_material(Material::new("a"));
    mesh.add_material(Material::new("b"));
    mesh.add_material(Material::new("a"));
    assert_eq!(mesh.material_index("a"), Some(MaterialId(0)));
    assert_eq!(mesh.material_index("b"), Some(MaterialId(1)));
    assert_eq!(mesh.material_index("c"), None);
}

#[test]
fn material_defaults() {
    let m = Material::new("m");
    assert_eq!(m.ka, DVec3::splat(0.1));
    assert_eq!(m.kd, DVec3::splat(0.5));
    assert_eq!(m.ks, DVec3::ZERO);
    assert_eq!(m.shininess, 65.0);
    assert_eq!(m.alpha, 1.0);
    assert!(!m.has_texture());
}

#[test]
fn vertex_ref_builders() {
    let v = VertexRef::new(PositionId(2)).with_normal(NormalId(1));
    assert!(v.has_normal());
    assert!(!v.has_texture());
    let v = v.with_texture(TexCoordId(0));
    assert!(v.has_texture());
}

#[test]
fn bounding_box() {
    assert!(SurfaceMesh::new().bounding_box().is_none());
    let (lo, hi) = unit_cube().bounding_box().unwrap();
    assert_eq!(lo, DVec3::ZERO);
    assert_eq!(hi, DVec3::ONE);
}

#[test]
fn serde_roundtrip() {
    let mesh = quad_grid(2, 1, 1.0, 1.0);
    let json = serde_json::to_string(&mesh).unwrap();
    let back: SurfaceMesh = serde_json::from_str(&json).unwrap();
    assert_eq!(back, mesh);
}

// ─── Generator Tests ──────────────────────────────────────────

#[test]
fn quad_grid_counts() {
    let mesh = quad_grid(4, 3, 2.0, 1.5);
    assert_eq!(mesh.vertex_count(), 5 * 4);
    assert_eq!(mesh.texture_coordinate_count(), 5 * 4);
    assert_eq!(mesh.normal_count(), 1);
    assert_eq!(mesh.face_count(), 12);
    assert!(mesh.group_by_name("default").is_some());
    assert!(mesh.validate().is_ok());
}

#[test]
fn quad_grid_extent() {
    let (lo, hi) = quad_grid(4, 4, 2.0, 1.0).bounding_box().unwrap();
    assert!((lo - DVec3::new(-1.0, -0.5, 0.0)).length() < 1e-12);
    assert!((hi - DVec3::new(1.0, 0.5, 0.0)).length() < 1e-12);
}

#[test]
fn unit_cube_is_valid() {
    let mesh = unit_cube();
    assert_eq!(mesh.vertex_count(), 8);
    assert_eq!(mesh.face_count(), 6);
    assert!(mesh.groups()[0].faces().iter().all(|f| f.vertex_count() == 4));
    assert!(mesh.validate().is_ok());
}

// ─── Normal Tests ─────────────────────────────────────────────

#[test]
fn flat_grid_normals_point_up() {
    let mut mesh = quad_grid(3, 3, 1.0, 1.0);
    compute_vertex_normals(&mut mesh);
    assert_eq!(mesh.normal_count(), mesh.vertex_count());
    for n in mesh.normals() {
        assert!((*n - DVec3::Z).length() < 1e-12, "normal {n:?}");
    }
    assert!(mesh.validate().is_ok());
}

#[test]
fn cube_corner_normals_point_outward() {
    let mut mesh = unit_cube();
    compute_vertex_normals(&mut mesh);
    let center = DVec3::splat(0.5);
    for (p, n) in mesh.positions().iter().zip(mesh.normals()) {
        let expected = (*p - center).normalize();
        assert!((*n - expected).length() < 1e-12);
    }
}

#[test]
fn normals_are_referenced_by_position() {
    let mut mesh = make_single_triangle();
    compute_vertex_normals(&mut mesh);
    for v in mesh.groups()[0].faces()[0].vertices() {
        assert_eq!(v.normal.map(|n| n.0), Some(v.position.0));
    }
}
