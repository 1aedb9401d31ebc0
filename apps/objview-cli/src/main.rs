mod script;

use anyhow::Context;
use clap::{Parser, Subcommand};
use glam::Mat4;
use objview_assets::load_obj;
use objview_common::ViewerConfig;
use objview_kernel::{Accumulator, Control, Transcript};
use objview_render::{DebugTextRenderer, DrawParams, FrameStats, Renderer, SceneCamera};
use script::Step;
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "objview-cli", about = "Headless tooling for the objview mesh viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print vertex, triangle and bounds information for an OBJ file
    Info {
        /// Path to the .obj file
        mesh: PathBuf,
    },
    /// Replay a key script through the transform accumulator
    Replay {
        /// Steps of the form KEYS:FRAMES, e.g. "W:10,Q:30" or "R+T:5"
        #[arg(short, long)]
        script: String,
        /// Print the final matrices as JSON instead of the transcript
        #[arg(long)]
        json: bool,
        /// Viewer config (YAML) supplying step sizes and camera settings
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Mesh whose vertex count is reported in the final frame
        #[arg(short, long)]
        mesh: Option<PathBuf>,
    },
    /// List the transform controls and their keys
    Controls,
}

/// Final state of a replay, as emitted by `replay --json`.
#[derive(Debug, Serialize)]
struct ReplayReport {
    frames: u64,
    active_frames: u64,
    /// Accumulated transform, row-major.
    matrix: [[f32; 4]; 4],
    /// Full draw matrix for the final frame, row-major.
    mvp: [[f32; 4]; 4],
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Info { mesh } => info(&mesh)?,
        Commands::Replay {
            script,
            json,
            config,
            mesh,
        } => replay(&script, json, config.as_deref(), mesh.as_deref())?,
        Commands::Controls => {
            for control in Control::ALL {
                println!("{}  {}", control.label(), control.description());
            }
        }
    }

    Ok(())
}

fn info(path: &Path) -> anyhow::Result<()> {
    let mesh = load_obj(path).with_context(|| format!("failed to load {}", path.display()))?;
    println!("mesh: {}", path.display());
    println!("models: {}", mesh.model_count);
    println!("vertices: {}", mesh.vertex_count());
    println!("triangles: {}", mesh.triangle_count());
    println!(
        "normals: {}",
        if mesh.has_file_normals() {
            "from file"
        } else {
            "default (0, 0, 1)"
        }
    );
    if let Some(bounds) = mesh.bounds() {
        println!("bounds min: {:?}", bounds.min.to_array());
        println!("bounds max: {:?}", bounds.max.to_array());
        println!("size: {:?}", bounds.size().to_array());
    }
    Ok(())
}

fn replay(
    script: &str,
    json: bool,
    config: Option<&Path>,
    mesh: Option<&Path>,
) -> anyhow::Result<()> {
    let config = match config {
        Some(path) => ViewerConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ViewerConfig::default(),
    };
    let vertex_count = match mesh {
        Some(path) => {
            let mesh =
                load_obj(path).with_context(|| format!("failed to load {}", path.display()))?;
            u32::try_from(mesh.vertex_count()).context("mesh has too many vertices")?
        }
        None => 0,
    };
    let steps = script::parse(script).context("invalid key script")?;

    let run = if json {
        run_replay(&steps, &config, &mut Transcript::new(io::sink()))?
    } else {
        let mut transcript = Transcript::new(io::stdout().lock());
        let run = run_replay(&steps, &config, &mut transcript)?;
        transcript.flush()?;
        run
    };

    let params = run.draw_params(&config);
    if json {
        println!("{}", serde_json::to_string_pretty(&run.report(&params))?);
    } else {
        let stats = FrameStats {
            frame: run.frames,
            vertex_count,
        };
        print!("{}", DebugTextRenderer::new().render(&params, &stats));
    }

    tracing::info!(
        frames = run.frames,
        active_frames = run.active_frames,
        "replay complete"
    );
    Ok(())
}

/// Outcome of driving the accumulator through a key script.
#[derive(Debug)]
struct ReplayRun {
    accumulator: Accumulator,
    frames: u64,
    active_frames: u64,
}

impl ReplayRun {
    fn draw_params(&self, config: &ViewerConfig) -> DrawParams {
        DrawParams {
            mvp: SceneCamera::from_config(config).mvp(self.accumulator.matrix()),
            color: config.mesh_color,
            wireframe: config.wireframe,
        }
    }

    fn report(&self, params: &DrawParams) -> ReplayReport {
        ReplayReport {
            frames: self.frames,
            active_frames: self.active_frames,
            matrix: row_major(&self.accumulator.matrix()),
            mvp: row_major(&params.mvp),
        }
    }
}

/// Apply every scripted frame and record active ones to `transcript`.
fn run_replay<W: Write>(
    steps: &[Step],
    config: &ViewerConfig,
    transcript: &mut Transcript<W>,
) -> io::Result<ReplayRun> {
    let mut run = ReplayRun {
        accumulator: Accumulator::new(config.steps),
        frames: 0,
        active_frames: 0,
    };

    for step in steps {
        tracing::debug!(?step.held, step.frames, "replaying step");
        // Scripts list controls in any order; the frame applies them in fixed order.
        let mut held = step.held.clone();
        held.sort();
        held.dedup();

        for _ in 0..step.frames {
            run.frames += 1;
            run.accumulator.apply_frame(held.as_slice());
            if !held.is_empty() {
                run.active_frames += 1;
            }
            transcript.record(&held, &run.accumulator.matrix())?;
        }
    }
    Ok(run)
}

fn row_major(m: &Mat4) -> [[f32; 4]; 4] {
    m.transpose().to_cols_array_2d()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn replay_script(script: &str) -> (ReplayRun, String) {
        let steps = script::parse(script).unwrap();
        let mut transcript = Transcript::new(Vec::new());
        let run = run_replay(&steps, &ViewerConfig::default(), &mut transcript).unwrap();
        (run, String::from_utf8(transcript.into_inner()).unwrap())
    }

    #[test]
    fn replay_moves_then_rolls() {
        let (run, text) = replay_script("W:10,Q:30");
        assert_eq!(run.frames, 40);
        assert_eq!(run.active_frames, 40);
        let expected = Mat4::from_translation(Vec3::new(0.0, 0.1, 0.0))
            * Mat4::from_rotation_z(90f32.to_radians());
        assert!(run.accumulator.matrix().abs_diff_eq(expected, 1e-4));
        assert_eq!(text.matches("Current Transformation Matrix:").count(), 40);

        let report = run.report(&run.draw_params(&ViewerConfig::default()));
        assert!((report.matrix[1][3] - 0.1).abs() < 1e-4);
    }

    #[test]
    fn replay_orders_chords_and_skips_idle_frames() {
        let (run, text) = replay_script("Q+W+W:1,-:3");
        assert_eq!(run.frames, 4);
        assert_eq!(run.active_frames, 1);
        assert_eq!(text.matches("Pressed W").count(), 1);
        assert_eq!(text.matches("Pressed Q").count(), 1);
        let w = text.find("Pressed W").unwrap();
        let q = text.find("Pressed Q").unwrap();
        assert!(w < q);

        let expected = Mat4::from_translation(Vec3::new(0.0, 0.01, 0.0))
            * Mat4::from_rotation_z(3f32.to_radians());
        assert!(run.accumulator.matrix().abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn row_major_puts_translation_in_last_column() {
        let m = Mat4::from_translation(glam::Vec3::new(1.0, 2.0, 3.0));
        let rows = row_major(&m);
        assert_eq!(rows[0], [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(rows[1], [0.0, 1.0, 0.0, 2.0]);
        assert_eq!(rows[2], [0.0, 0.0, 1.0, 3.0]);
        assert_eq!(rows[3], [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn report_serializes_matrix_rows() {
        let report = ReplayReport {
            frames: 2,
            active_frames: 1,
            matrix: row_major(&Mat4::IDENTITY),
            mvp: row_major(&Mat4::IDENTITY),
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["frames"], 2);
        assert_eq!(value["matrix"][0][0], 1.0);
        assert_eq!(value["matrix"][0][3], 0.0);
    }

    #[test]
    fn cli_parses_replay_flags() {
        let cli = Cli::try_parse_from(["objview-cli", "replay", "--script", "W:10", "--json"])
            .unwrap();
        match cli.command {
            Commands::Replay { script, json, .. } => {
                assert_eq!(script, "W:10");
                assert!(json);
            }
            _ => panic!("expected replay"),
        }
    }
}
