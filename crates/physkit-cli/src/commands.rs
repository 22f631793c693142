//! CLI command implementations.

use std::path::Path;

use physkit_driver::{CheckpointHeader, Driver, RunSummary, TelemetryPlugin};
use physkit_io::ObjMeshIo;
use physkit_mesh::normals::compute_vertex_normals;
use physkit_mesh::SurfaceMesh;
use physkit_mpm::{GridMpmDriver, MpmConfig};
use physkit_telemetry::{EventBus, JsonLinesSink};
use physkit_types::{PhysError, PhysResult};

/// Run a simulation from config file.
pub fn simulate(config_path: &Path, events_path: Option<&Path>) -> PhysResult<()> {
    println!("physkit simulation");
    println!("──────────────────");
    println!("Config: {}", config_path.display());

    let config = MpmConfig::load(config_path)?;
    let telemetry = match events_path {
        Some(path) => {
            let mut bus = EventBus::new();
            bus.add_sink(Box::new(JsonLinesSink::create(path)?));
            Some(TelemetryPlugin::with_bus(bus))
        }
        None => None,
    };

    let summary = match config.dimension {
        2 => run_driver(GridMpmDriver::<2>::new(&config)?, telemetry)?,
        3 => run_driver(GridMpmDriver::<3>::new(&config)?, telemetry)?,
        d => return Err(PhysError::Config(format!("unsupported dimension {d}"))),
    };

    println!("Frames:       {}", summary.frames);
    println!("Substeps:     {}", summary.substeps);
    println!("Sim time:     {:.4}", summary.sim_time);
    println!("Wall time:    {:.3}s", summary.wall_time);
    if let Some(path) = events_path {
        println!("Events:       {}", path.display());
    }
    if config.driver.write_to_file {
        println!("Artifacts:    {}", config.driver.output_dir.display());
    }
    Ok(())
}

fn run_driver<const D: usize>(
    mut driver: GridMpmDriver<D>,
    telemetry: Option<TelemetryPlugin>,
) -> PhysResult<RunSummary> {
    if let Some(plugin) = telemetry {
        driver.add_plugin(Box::new(plugin));
    }
    let summary = driver.run()?;
    println!("Particles:    {}", driver.particles().len());
    Ok(summary)
}

/// Convert an OBJ mesh, optionally recomputing normals.
pub fn convert(input: &Path, output: &Path, normals: bool) -> PhysResult<()> {
    let mut mesh = ObjMeshIo::load(input)?;
    if normals {
        compute_vertex_normals(&mut mesh);
    }
    ObjMeshIo::save(output, &mesh)?;
    println!(
        "{} -> {} ({} positions, {} faces, {} groups)",
        input.display(),
        output.display(),
        mesh.vertex_count(),
        mesh.face_count(),
        mesh.group_count()
    );
    Ok(())
}

/// Inspect a mesh or checkpoint.
pub fn inspect(path: &Path) -> PhysResult<()> {
    if has_extension(path, "obj") {
        let mesh = ObjMeshIo::load(path)?;
        print_mesh_stats(&mesh);
        return Ok(());
    }

    println!("physkit checkpoint inspector");
    println!("────────────────────────────");
    let size = std::fs::metadata(path)?.len();
    let header = CheckpointHeader::load(path)?;
    println!("Resume frame:      {}", header.frame);
    println!("Time within frame: {:.6}", header.time_within_frame);
    println!("Elapsed:           {:.6}", header.elapsed);
    println!("File size:         {size} bytes");
    Ok(())
}

fn print_mesh_stats(mesh: &SurfaceMesh) {
    println!("Positions:    {}", mesh.vertex_count());
    println!("Normals:      {}", mesh.normal_count());
    println!("Tex coords:   {}", mesh.texture_coordinate_count());
    println!("Materials:    {}", mesh.material_count());
    println!("Groups:       {}", mesh.group_count());
    for group in mesh.groups() {
        let material = group
            .material()
            .map_or("-", |id| mesh.material(id).name.as_str());
        println!("  {:<20} {:>6} faces  [{material}]", group.name(), group.face_count());
    }
    if let Some((min, max)) = mesh.bounding_box() {
        println!("Bounds:       {min} .. {max}");
    }
}

/// Validate a mesh or config.
pub fn validate(path: &Path) -> PhysResult<()> {
    if has_extension(path, "toml") {
        let config = MpmConfig::load(path)?;
        println!(
            "Config is valid ({}D, {} frames, {} blocks).",
            config.dimension,
            config.driver.frame_count(),
            config.blocks.len()
        );
    } else if has_extension(path, "obj") {
        let mesh = ObjMeshIo::load(path)?;
        println!(
            "Mesh is valid ({} positions, {} faces).",
            mesh.vertex_count(),
            mesh.face_count()
        );
    } else {
        return Err(PhysError::Format(format!(
            "unsupported file '{}'; use .toml (config) or .obj (mesh)",
            path.display()
        )));
    }
    Ok(())
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use physkit_mesh::generators::unit_cube;

    const SMALL_RUN: &str = r#"
dimension = 2

[driver]
end_frame = 0
frame_rate = 60.0

[grid]
cells = [8]

[[blocks]]
min_corner = [0.25, 0.5]
max_corner = [0.75, 0.75]
per_cell = 1
density = 100.0
"#;

    #[test]
    fn simulate_writes_event_log() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("run.toml");
        let events = dir.path().join("events.jsonl");
        std::fs::write(&config, SMALL_RUN).unwrap();

        simulate(&config, Some(&events)).unwrap();

        let text = std::fs::read_to_string(&events).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines.len() >= 4);
        assert!(lines[0].contains("frame_begin"));
        assert!(lines.last().unwrap().contains("frame_end"));
    }

    #[test]
    fn simulate_rejects_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        let result = simulate(&dir.path().join("absent.toml"), None);
        assert!(matches!(result, Err(PhysError::Io(_))));
    }

    #[test]
    fn convert_recomputes_normals() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("cube.obj");
        let output = dir.path().join("cube_out.obj");
        ObjMeshIo::save(&input, &unit_cube()).unwrap();

        convert(&input, &output, true).unwrap();

        let mesh = ObjMeshIo::load(&output).unwrap();
        assert_eq!(mesh.normal_count(), 8);
        assert_eq!(mesh.face_count(), 6);
        assert!(dir.path().join("cube_out.mtl").exists());
    }

    #[test]
    fn validate_dispatches_on_extension() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("run.toml");
        std::fs::write(&config, SMALL_RUN).unwrap();
        let mesh = dir.path().join("cube.obj");
        ObjMeshIo::save(&mesh, &unit_cube()).unwrap();

        assert!(validate(&config).is_ok());
        assert!(validate(&mesh).is_ok());
        assert!(matches!(
            validate(&dir.path().join("notes.txt")),
            Err(PhysError::Format(_))
        ));

        std::fs::write(&config, "cfl = 3.0\n").unwrap();
        assert!(matches!(validate(&config), Err(PhysError::Config(_))));
    }

    #[test]
    fn inspect_reads_checkpoint_header() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("run.toml");
        let out = dir.path().join("out");
        let mut config = MpmConfig::from_toml_str(SMALL_RUN).unwrap();
        config.driver.write_to_file = true;
        config.driver.output_dir = out.clone();
        std::fs::write(&config_path, config.to_toml_string().unwrap()).unwrap();

        simulate(&config_path, None).unwrap();

        let artifact = config.driver.frame_artifact_path(0, "bin");
        assert_eq!(CheckpointHeader::load(&artifact).unwrap().frame, 1);
        assert!(inspect(&artifact).is_ok());
        assert!(inspect(&dir.path().join("cube.obj")).is_err());
    }
}
