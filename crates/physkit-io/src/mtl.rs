//! Wavefront MTL material library codec.
//!
//! Directives are dispatched on the first character of their keyword:
//!
//! | Keyword | Effect |
//! |---|---|
//! | `newmtl name` | commit the material in progress, start a new one with defaults |
//! | `Ns s` | shininess, stored as `s / NS_WIRE_SCALE` |
//! | `Ka`/`Kd`/`Ks r g b` | reflectance triples |
//! | `map_Kd [opts] file` | diffuse texture, resolved against the `.mtl` directory |
//! | `d [-halo] a` | opacity |
//!
//! Anything else is ignored.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::str::SplitWhitespace;

use physkit_math::DVec3;
use physkit_mesh::{Material, SurfaceMesh};
use physkit_types::constants::NS_WIRE_SCALE;
use physkit_types::{PhysError, PhysResult, Scalar};

use crate::paths;

/// File-level MTL load/save.
pub struct MtlIo;

impl MtlIo {
    /// Reads every material of `path` and appends them to `mesh`.
    ///
    /// Texture references are resolved against the directory of `path`.
    /// Returns the number of materials added.
    pub fn load<P: AsRef<Path>>(path: P, mesh: &mut SurfaceMesh) -> PhysResult<usize> {
        let path_str = path.as_ref().to_string_lossy();
        let file = File::open(path.as_ref())?;
        let added = read_materials(BufReader::new(file), paths::dir_name(&path_str), mesh)?;
        tracing::debug!(path = %path_str, materials = added, "loaded material library");
        Ok(added)
    }

    /// Writes all materials of `mesh` to `path`, truncating it.
    pub fn save<P: AsRef<Path>>(path: P, mesh: &SurfaceMesh) -> PhysResult<()> {
        let mut out = BufWriter::new(File::create(path.as_ref())?);
        write_materials(&mut out, mesh)?;
        out.flush()?;
        tracing::debug!(
            path = %path.as_ref().display(),
            materials = mesh.material_count(),
            "saved material library"
        );
        Ok(())
    }
}

/// Parses an MTL stream and appends the materials to `mesh`.
///
/// `base_dir` is prepended (textually) to `map_Kd` file names.
pub fn read_materials<R: BufRead>(
    reader: R,
    base_dir: &str,
    mesh: &mut SurfaceMesh,
) -> PhysResult<usize> {
    let mut current: Option<Material> = None;
    let mut added = 0;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else {
            continue;
        };

        let mut chars = keyword.chars();
        let first = chars.next();
        let second = chars.next();

        if first == Some('n') {
            if let Some(done) = current.take() {
                mesh.add_material(done);
                added += 1;
            }
            let name = tokens
                .next()
                .ok_or_else(|| PhysError::parse(line_no, "newmtl without a material name"))?;
            current = Some(Material::new(name));
            continue;
        }

        let Some(material) = current.as_mut() else {
            if first != Some('#') {
                tracing::trace!(line = line_no, keyword, "directive before any newmtl ignored");
            }
            continue;
        };

        match (first, second) {
            (Some('N'), Some('s')) => {
                let ns = next_scalar(&mut tokens, line_no, "Ns")?;
                material.shininess = ns / NS_WIRE_SCALE;
            }
            (Some('K'), Some(channel @ ('a' | 'd' | 's'))) => {
                let Some(rgb) = read_triple(&mut tokens, line_no, keyword)? else {
                    continue;
                };
                match channel {
                    'a' => material.ka = rgb,
                    'd' => material.kd = rgb,
                    _ => material.ks = rgb,
                }
            }
            (Some('m'), _) if keyword == "map_Kd" => {
                if let Some(file) = line.split_whitespace().last().filter(|t| *t != keyword) {
                    material.texture = Some(paths::join(base_dir, file));
                }
            }
            (Some('d'), _) => {
                let first_arg = tokens
                    .next()
                    .ok_or_else(|| PhysError::parse(line_no, "d without a value"))?;
                let value = if first_arg.starts_with('-') {
                    next_scalar(&mut tokens, line_no, "d")?
                } else {
                    parse_scalar(first_arg, line_no, "d")?
                };
                material.alpha = value;
            }
            _ => {}
        }
    }

    if let Some(done) = current {
        mesh.add_material(done);
        added += 1;
    }
    Ok(added)
}

/// Writes every material of `mesh` in MTL form.
///
/// Order per material: `newmtl`, `Ka`, `Kd`, `Ks`, `Ns`, `d`, then
/// `map_Kd` (file name only) when a texture is set.
pub fn write_materials<W: Write>(out: &mut W, mesh: &SurfaceMesh) -> PhysResult<()> {
    for m in mesh.materials() {
        writeln!(out, "newmtl {}", m.name)?;
        writeln!(out, "Ka {} {} {}", m.ka.x, m.ka.y, m.ka.z)?;
        writeln!(out, "Kd {} {} {}", m.kd.x, m.kd.y, m.kd.z)?;
        writeln!(out, "Ks {} {} {}", m.ks.x, m.ks.y, m.ks.z)?;
        writeln!(out, "Ns {}", m.shininess * NS_WIRE_SCALE)?;
        writeln!(out, "d {}", m.alpha)?;
        if let Some(texture) = m.texture.as_deref().filter(|_| m.has_texture()) {
            writeln!(out, "map_Kd {}", paths::file_name_in_path(texture))?;
        }
    }
    Ok(())
}

fn parse_scalar(token: &str, line: usize, what: &str) -> PhysResult<Scalar> {
    token
        .parse::<Scalar>()
        .map_err(|_| PhysError::parse(line, format!("invalid {what} value '{token}'")))
}

fn next_scalar(tokens: &mut SplitWhitespace<'_>, line: usize, what: &str) -> PhysResult<Scalar> {
    let token = tokens
        .next()
        .ok_or_else(|| PhysError::parse(line, format!("missing {what} value")))?;
    parse_scalar(token, line, what)
}

/// Reads `r g b`. An empty argument list yields `None` (the line is skipped);
/// a partial one is an error.
fn read_triple(
    tokens: &mut SplitWhitespace<'_>,
    line: usize,
    what: &str,
) -> PhysResult<Option<DVec3>> {
    let Some(first) = tokens.next() else {
        return Ok(None);
    };
    let r = parse_scalar(first, line, what)?;
    let g = next_scalar(tokens, line, what)?;
    let b = next_scalar(tokens, line, what)?;
    Ok(Some(DVec3::new(r, g, b)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(text: &str) -> SurfaceMesh {
        let mut mesh = SurfaceMesh::new();
        read_materials(text.as_bytes(), "assets", &mut mesh).unwrap();
        mesh
    }

    #[test]
    fn no_newmtl_commits_nothing() {
        let mesh = read("# empty\nKd 1 0 0\n");
        assert_eq!(mesh.material_count(), 0);
    }

    #[test]
    fn k_channels_do_not_leak_into_texture() {
        let mesh = read("newmtl a\nKd 1 0 0\n");
        assert!(mesh.materials()[0].texture.is_none());
        assert_eq!(mesh.materials()[0].kd, DVec3::X);
    }

    #[test]
    fn empty_k_line_is_skipped() {
        let mesh = read("newmtl a\nKa\n");
        assert_eq!(mesh.materials()[0].ka, DVec3::splat(0.1));
    }

    #[test]
    fn partial_k_line_is_an_error() {
        let mut mesh = SurfaceMesh::new();
        let err = read_materials("newmtl a\nKs 1 2\n".as_bytes(), ".", &mut mesh).unwrap_err();
        assert!(matches!(err, PhysError::Parse { line: 2, .. }));
    }

    #[test]
    fn halo_flag_is_skipped() {
        let mesh = read("newmtl a\nd -halo 0.25\nnewmtl b\nd 0.5\n");
        assert_eq!(mesh.materials()[0].alpha, 0.25);
        assert_eq!(mesh.materials()[1].alpha, 0.5);
    }

    #[test]
    fn map_kd_uses_last_token_and_base_dir() {
        let mesh = read("newmtl a\nmap_Kd -s 1 1 1 tex.png\nmap_Ks spec.png\n");
        assert_eq!(mesh.materials()[0].texture.as_deref(), Some("assets/tex.png"));
    }
}
