// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;

use crate::scene::SceneKind;

#[derive(Parser, Debug, Clone)]
#[command(name = "prism-demo")]
#[command(about = "Rotating wireframes and meshes with rainbow borders", long_about = None)]
pub struct Cli {
    /// Scene to show
    #[arg(value_enum)]
    pub scene: SceneKind,

    /// Triangle mesh for the `mesh` scene (.stl, .gltf or .glb)
    #[arg(long, default_value = "cutedragon2.stl")]
    pub mesh: PathBuf,

    /// Run the frame loop without a window or GPU
    #[arg(long, default_value = "false")]
    pub headless: bool,

    /// Frames to run in headless mode
    #[arg(long, default_value_t = 500)]
    pub frames: u64,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_defaults() {
        let cli = Cli::try_parse_from(["prism-demo", "torus"]).unwrap();
        assert_eq!(cli.scene, SceneKind::Torus);
        assert_eq!(cli.mesh, PathBuf::from("cutedragon2.stl"));
        assert!(!cli.headless);
        assert_eq!(cli.frames, 500);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn parses_headless_mesh_run() {
        let cli = Cli::try_parse_from([
            "prism-demo", "mesh", "--mesh", "bunny.glb", "--headless", "--frames", "3", "-vv",
        ])
        .unwrap();
        assert_eq!(cli.scene, SceneKind::Mesh);
        assert_eq!(cli.mesh, PathBuf::from("bunny.glb"));
        assert!(cli.headless);
        assert_eq!(cli.frames, 3);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn rejects_unknown_scene() {
        assert!(Cli::try_parse_from(["prism-demo", "sphere"]).is_err());
    }
}
