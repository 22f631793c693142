//! Line-directed OBJ parser.
//!
//! Recognized directives: `v`, `vn`, `vt`, `g`, `f`/`fo`, `usemtl`,
//! `mtllib` and `#` comments. Unknown directives are skipped.
//!
//! Indices on the wire are 1-based and stored 0-based. Faces that appear
//! before any `g` land in a group named `default`. A `usemtl` issued after
//! the current group already received faces splits off a clone group named
//! `<source>.<k>`, so every group keeps a single material. `<source>` is
//! the last group created by `g` (or the implicit `default`); switching back
//! to an existing group does not change it. Groups that `usemtl` created on
//! its own (clones, or a `default` group for a leading `usemtl`) are removed
//! once the stream is exhausted if they never received a face.

use std::collections::HashMap;
use std::io::BufRead;
use std::str::SplitWhitespace;

use physkit_math::{DVec2, DVec3};
use physkit_mesh::{Face, Group, SurfaceMesh, VertexRef};
use physkit_types::constants::DEFAULT_GROUP_NAME;
use physkit_types::{
    GroupId, MaterialId, NormalId, PhysError, PhysResult, PositionId, Scalar, TexCoordId,
};

use crate::mtl::MtlIo;
use crate::paths;

/// Parses an OBJ stream into a new mesh.
///
/// `base_dir` is the directory `mtllib` references are resolved against.
/// The resulting mesh is validated before it is returned.
pub fn read_obj<R: BufRead>(reader: R, base_dir: &str) -> PhysResult<SurfaceMesh> {
    let mut state = ObjReader::new(base_dir);
    for (idx, line) in reader.lines().enumerate() {
        state.parse_line(&line?, idx + 1)?;
    }
    let mesh = state.finish();
    mesh.validate()?;
    Ok(mesh)
}

/// Incremental OBJ parser state.
struct ObjReader<'a> {
    base_dir: &'a str,
    mesh: SurfaceMesh,
    current_group: Option<GroupId>,
    current_material: Option<MaterialId>,
    /// Group that `usemtl` clones are named after.
    source_name: String,
    clone_counters: HashMap<String, u32>,
    /// Groups created by `usemtl` rather than `g` or `f`, in creation order.
    implicit_groups: Vec<GroupId>,
}

impl<'a> ObjReader<'a> {
    fn new(base_dir: &'a str) -> Self {
        Self {
            base_dir,
            mesh: SurfaceMesh::new(),
            current_group: None,
            current_material: None,
            source_name: String::new(),
            clone_counters: HashMap::new(),
            implicit_groups: Vec::new(),
        }
    }

    /// Drops groups created by `usemtl` that never received a face. These
    /// come from `usemtl` lines directly followed by a `g` switch, which
    /// is how the writer emits every group with a material.
    fn finish(mut self) -> SurfaceMesh {
        for &id in self.implicit_groups.iter().rev() {
            if self.mesh.group(id).is_empty() {
                self.mesh.remove_group(id);
            }
        }
        self.mesh
    }

    fn parse_line(&mut self, line: &str, line_no: usize) -> PhysResult<()> {
        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else {
            return Ok(());
        };

        match keyword {
            "v" => {
                let p = read_vec3(&mut tokens, line_no, "position")?;
                self.mesh.add_position(p);
            }
            "vn" => {
                let n = read_vec3(&mut tokens, line_no, "normal")?;
                self.mesh.add_normal(n);
            }
            "vt" => {
                let u = next_scalar(&mut tokens, line_no, "texture coordinate")?;
                let v = next_scalar(&mut tokens, line_no, "texture coordinate")?;
                self.mesh.add_texture_coordinate(DVec2::new(u, v));
            }
            "g" => {
                self.begin_group(tokens.next().unwrap_or(DEFAULT_GROUP_NAME))?;
            }
            "f" | "fo" => self.add_face(tokens, line_no)?,
            "usemtl" => {
                let name = tokens
                    .next()
                    .ok_or_else(|| PhysError::parse(line_no, "usemtl without a material name"))?;
                self.use_material(name, line_no)?;
            }
            "mtllib" => {
                let file = tokens
                    .next()
                    .ok_or_else(|| PhysError::parse(line_no, "mtllib without a file name"))?;
                MtlIo::load(paths::join(self.base_dir, file), &mut self.mesh)?;
            }
            _ if keyword.starts_with('#') => {}
            _ => tracing::trace!(line = line_no, keyword, "ignoring unknown OBJ directive"),
        }
        Ok(())
    }

    /// `g name`: reuse the group if it exists, otherwise create it with
    /// the material currently in effect. Only a new group becomes the
    /// clone source.
    fn begin_group(&mut self, name: &str) -> PhysResult<GroupId> {
        let id = match self.mesh.group_id(name) {
            Some(id) => id,
            None => {
                let id = self
                    .mesh
                    .add_group(Group::with_material(name, self.current_material))?;
                self.source_name = name.to_string();
                id
            }
        };
        self.current_group = Some(id);
        Ok(id)
    }

    fn ensure_group(&mut self) -> PhysResult<GroupId> {
        match self.current_group {
            Some(id) => Ok(id),
            None => self.begin_group(DEFAULT_GROUP_NAME),
        }
    }

    fn add_face(&mut self, tokens: SplitWhitespace<'_>, line_no: usize) -> PhysResult<()> {
        let group = self.ensure_group()?;
        let mut face = Face::new();
        for token in tokens {
            face.add_vertex(parse_vertex_ref(token, line_no)?);
        }
        if face.vertex_count() == 0 {
            return Err(PhysError::parse(line_no, "face without vertex references"));
        }
        self.mesh.group_mut(group).add_face(face);
        Ok(())
    }

    fn use_material(&mut self, name: &str, line_no: usize) -> PhysResult<()> {
        let material = self
            .mesh
            .material_index(name)
            .ok_or_else(|| PhysError::parse(line_no, format!("unknown material '{name}'")))?;

        let group = match self.current_group {
            Some(current) if !self.mesh.group(current).is_empty() => {
                let clone = self.next_clone_name();
                let id = self.mesh.add_group(Group::new(clone))?;
                self.implicit_groups.push(id);
                self.current_group = Some(id);
                id
            }
            Some(current) => current,
            None => {
                let created = self.mesh.group_id(DEFAULT_GROUP_NAME).is_none();
                let id = self.begin_group(DEFAULT_GROUP_NAME)?;
                if created {
                    self.implicit_groups.push(id);
                }
                id
            }
        };
        self.mesh.group_mut(group).set_material(Some(material));
        self.current_material = Some(material);
        Ok(())
    }

    /// Next unused `<source>.<k>` name for the current source group.
    fn next_clone_name(&mut self) -> String {
        let counter = self
            .clone_counters
            .entry(self.source_name.clone())
            .or_insert(0);
        loop {
            let candidate = format!("{}.{}", self.source_name, counter);
            *counter += 1;
            if self.mesh.group_id(&candidate).is_none() {
                return candidate;
            }
        }
    }
}

/// Parses `p`, `p/t`, `p/t/n` or `p//n`.
fn parse_vertex_ref(token: &str, line_no: usize) -> PhysResult<VertexRef> {
    let mut parts = token.split('/');
    let position = parse_index(parts.next().unwrap_or_default(), token, line_no)?;

    let mut vertex = VertexRef::new(PositionId(position));
    match (parts.next(), parts.next(), parts.next()) {
        (None, None, None) => {}
        (Some(t), None, None) => {
            vertex = vertex.with_texture(TexCoordId(parse_index(t, token, line_no)?));
        }
        (Some(t), Some(n), None) => {
            if !t.is_empty() {
                vertex = vertex.with_texture(TexCoordId(parse_index(t, token, line_no)?));
            }
            vertex = vertex.with_normal(NormalId(parse_index(n, token, line_no)?));
        }
        _ => {
            return Err(PhysError::parse(
                line_no,
                format!("invalid vertex reference '{token}'"),
            ))
        }
    }
    Ok(vertex)
}

/// Converts a 1-based wire index to a 0-based one.
fn parse_index(field: &str, token: &str, line_no: usize) -> PhysResult<u32> {
    match field.parse::<u32>() {
        Ok(i) if i >= 1 => Ok(i - 1),
        _ => Err(PhysError::parse(
            line_no,
            format!("invalid index '{field}' in vertex reference '{token}'"),
        )),
    }
}

fn next_scalar(tokens: &mut SplitWhitespace<'_>, line_no: usize, what: &str) -> PhysResult<Scalar> {
    let token = tokens
        .next()
        .ok_or_else(|| PhysError::parse(line_no, format!("missing {what} component")))?;
    token
        .parse::<Scalar>()
        .map_err(|_| PhysError::parse(line_no, format!("invalid {what} component '{token}'")))
}

fn read_vec3(tokens: &mut SplitWhitespace<'_>, line_no: usize, what: &str) -> PhysResult<DVec3> {
    let x = next_scalar(tokens, line_no, what)?;
    let y = next_scalar(tokens, line_no, what)?;
    let z = next_scalar(tokens, line_no, what)?;
    Ok(DVec3::new(x, y, z))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_ref_forms() {
        let v = parse_vertex_ref("3", 1).unwrap();
        assert_eq!(v.position, PositionId(2));
        assert!(!v.has_texture() && !v.has_normal());

        let v = parse_vertex_ref("3/4", 1).unwrap();
        assert_eq!(v.texture, Some(TexCoordId(3)));
        assert!(!v.has_normal());

        let v = parse_vertex_ref("3/4/5", 1).unwrap();
        assert_eq!(v.texture, Some(TexCoordId(3)));
        assert_eq!(v.normal, Some(NormalId(4)));

        let v = parse_vertex_ref("3//5", 1).unwrap();
        assert!(!v.has_texture());
        assert_eq!(v.normal, Some(NormalId(4)));
    }

    #[test]
    fn bad_vertex_refs() {
        for token in ["x", "0", "-1", "1/2/3/4", "1/a", "/1", "1//"] {
            assert!(parse_vertex_ref(token, 7).is_err(), "{token} accepted");
        }
    }

    #[test]
    fn clone_names_skip_existing_groups() {
        let text = "v 0 0 0\ng a.0\nf 1\ng a\nf 1\nusemtl m\nf 1\n";
        let mut reader = ObjReader::new(".");
        reader.mesh.add_material(physkit_mesh::Material::new("m"));
        for (i, line) in text.lines().enumerate() {
            reader.parse_line(line, i + 1).unwrap();
        }
        let mesh = reader.finish();
        assert!(mesh.group_by_name("a.1").is_some());
    }

    #[test]
    fn reused_group_does_not_become_clone_source() {
        let text = "v 0 0 0\ng a\nf 1\ng b\nf 1\ng a\nusemtl m\nf 1\nusemtl m\nf 1\n";
        let mut reader = ObjReader::new(".");
        reader.mesh.add_material(physkit_mesh::Material::new("m"));
        for (i, line) in text.lines().enumerate() {
            reader.parse_line(line, i + 1).unwrap();
        }
        let mesh = reader.finish();
        let names: Vec<&str> = mesh.groups().iter().map(|g| g.name()).collect();
        assert_eq!(names, ["a", "b", "b.0", "b.1"]);
    }

    #[test]
    fn leading_usemtl_default_is_dropped_when_unused() {
        let text = "v 0 0 0\nusemtl m\ng a\nf 1\n";
        let mut reader = ObjReader::new(".");
        reader.mesh.add_material(physkit_mesh::Material::new("m"));
        for (i, line) in text.lines().enumerate() {
            reader.parse_line(line, i + 1).unwrap();
        }
        let mesh = reader.finish();
        let names: Vec<&str> = mesh.groups().iter().map(|g| g.name()).collect();
        assert_eq!(names, ["a"]);
        assert_eq!(mesh.group_by_name("a").unwrap().material(), Some(MaterialId(0)));
    }

    #[test]
    fn empty_clones_are_dropped() {
        let text = "v 0 0 0\ng a\nf 1\nusemtl m\ng b\nf 1\n";
        let mut reader = ObjReader::new(".");
        reader.mesh.add_material(physkit_mesh::Material::new("m"));
        for (i, line) in text.lines().enumerate() {
            reader.parse_line(line, i + 1).unwrap();
        }
        let mesh = reader.finish();
        let names: Vec<&str> = mesh.groups().iter().map(|g| g.name()).collect();
        assert_eq!(names, ["a", "b"]);
        assert!(mesh.group_by_name("b").unwrap().material().is_some());
    }
}
