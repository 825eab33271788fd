//! Entry point for the OBJ inspector.
//! Loads a mesh through the asset pipeline and logs what came out.
//!
//! Usage: `app <model.obj> [--config=opts.toml] [--flip-v[=on|off]]
//! [--degenerate-uv=skip|fail] [--no-normals] [--no-materials] [--dump]`

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use asset::{DegenerateUvPolicy, LoadOptions, ObjModel};

#[derive(Debug, Default, PartialEq)]
struct Args {
    path: PathBuf,
    config: Option<PathBuf>,
    flip_v: Option<bool>,
    degenerate_uv: Option<DegenerateUvPolicy>,
    no_normals: bool,
    no_materials: bool,
    dump: bool,
}

fn parse_switch(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "on" | "yes"
    )
}

fn parse_args<I>(args: I) -> Result<Args>
where
    I: IntoIterator<Item = String>,
{
    let mut parsed = Args::default();
    let mut path: Option<PathBuf> = None;

    for arg in args {
        if let Some(val) = arg.strip_prefix("--config=") {
            parsed.config = Some(PathBuf::from(val));
        } else if arg == "--flip-v" {
            parsed.flip_v = Some(true);
        } else if let Some(val) = arg.strip_prefix("--flip-v=") {
            parsed.flip_v = Some(parse_switch(val));
        } else if let Some(val) = arg.strip_prefix("--degenerate-uv=") {
            parsed.degenerate_uv = Some(val.parse()?);
        } else if arg == "--no-normals" {
            parsed.no_normals = true;
        } else if arg == "--no-materials" {
            parsed.no_materials = true;
        } else if arg == "--dump" {
            parsed.dump = true;
        } else if arg.starts_with("--") {
            log::warn!("Unknown flag '{}', ignoring.", arg);
        } else if path.replace(PathBuf::from(&arg)).is_some() {
            bail!("Only one OBJ path may be given (extra: '{}')", arg);
        }
    }

    parsed.path = path.ok_or_else(|| anyhow!("Missing OBJ path. Usage: app <model.obj> [flags]"))?;
    Ok(parsed)
}

/// Config file first, then command-line overrides.
fn build_options(args: &Args) -> Result<LoadOptions> {
    let mut options = match &args.config {
        Some(path) => LoadOptions::from_toml_file(path)
            .with_context(|| format!("Failed to load options: {}", path.display()))?,
        None => LoadOptions::default(),
    };

    if let Some(flip_v) = args.flip_v {
        options.flip_v = flip_v;
    }
    if let Some(policy) = args.degenerate_uv {
        options.degenerate_uv = policy;
    }
    if args.no_normals {
        options.synthesize_normals = false;
    }
    if args.no_materials {
        options.resolve_materials = false;
    }
    Ok(options)
}

fn report(model: &ObjModel, dump: bool) {
    let mesh = &model.mesh;
    log::info!(
        "Mesh: {} vertices, {} indices ({} triangles), {} vertex bytes",
        mesh.vertex_count(),
        mesh.index_count(),
        mesh.triangle_count(),
        mesh.vertex_bytes().len()
    );

    for material in &model.materials {
        log::info!(
            "Material '{}': diffuse={:?}, normal={:?}",
            material.name,
            material.diffuse_map,
            material.normal_map
        );
    }
    if !model.material_uses.is_empty() {
        log::info!("Materials used: {}", model.material_uses.join(", "));
    }

    if dump {
        for (i, v) in mesh.vertices().iter().enumerate() {
            println!(
                "v{:<6} p={:?} uv={:?} n={:?} t={:?} b={:?}",
                i, v.position, v.texcoord, v.normal, v.tangent, v.bitangent
            );
        }
        for tri in mesh.triangles() {
            println!("f {} {} {}", tri[0], tri[1], tri[2]);
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args(std::env::args().skip(1))?;
    let options = build_options(&args)?;
    log::info!("Loading {} with {:?}", args.path.display(), options);

    let model = asset::load_obj_model_from_path(&args.path, &options)
        .with_context(|| format!("Failed to load OBJ mesh: {}", args.path.display()))?;
    report(&model, args.dump);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn parses_path_and_flags() {
        let parsed = args(&["model.obj", "--flip-v", "--degenerate-uv=fail", "--dump"]).unwrap();
        assert_eq!(parsed.path, PathBuf::from("model.obj"));
        assert_eq!(parsed.flip_v, Some(true));
        assert_eq!(parsed.degenerate_uv, Some(DegenerateUvPolicy::Fail));
        assert!(parsed.dump);
        assert!(!parsed.no_materials);
    }

    #[test]
    fn switch_values() {
        let parsed = args(&["--flip-v=off", "m.obj"]).unwrap();
        assert_eq!(parsed.flip_v, Some(false));
        assert!(parse_switch("ON"));
        assert!(!parse_switch("nope"));
    }

    #[test]
    fn path_is_required_and_unique() {
        assert!(args(&["--dump"]).is_err());
        assert!(args(&["a.obj", "b.obj"]).is_err());
        assert!(args(&["a.obj", "--degenerate-uv=clamp"]).is_err());
    }

    #[test]
    fn flags_override_defaults() {
        let parsed = args(&["m.obj", "--no-normals", "--no-materials"]).unwrap();
        let options = build_options(&parsed).unwrap();
        assert!(!options.synthesize_normals);
        assert!(!options.resolve_materials);
        assert_eq!(options.degenerate_uv, DegenerateUvPolicy::Skip);
    }
}
