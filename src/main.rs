mod cli;
mod logger;

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use cgmath::{Point3, Vector3};
use chrono::Local;
use clap::Parser;
use log::{error, info};

use rusty_csg_tracer::float::*;
use rusty_csg_tracer::{
    prefab, Camera, Color, DebugMode, Primitive, RenderConfig, RenderMode, Renderer, Result,
    Scene,
};

use crate::cli::{Args, DemoScene, Mode};

fn spheres_scene() -> Scene {
    let floor = Primitive::plane()
        .rotate(Vector3::unit_x(), cgmath::Deg(-90.0))
        .translate(0.0, -1.0, 0.0)
        .with_color(Color::new(0.6, 0.6, 0.5));
    Scene::new()
        .with_primitive(floor)
        .with_primitive(
            Primitive::sphere()
                .translate(-1.2, 0.0, 0.0)
                .with_color(Color::new(0.9, 0.9, 0.9))
                .with_reflectivity(0.8),
        )
        .with_primitive(
            Primitive::sphere()
                .translate(1.2, 0.0, 0.0)
                .with_color(Color::new(0.9, 1.0, 0.9))
                .with_transparency(0.9, 1.5),
        )
        .with_primitive(
            Primitive::torus(1.6, 0.4)
                .scale_uniform(0.5)
                .rotate(Vector3::unit_x(), cgmath::Deg(60.0))
                .translate(0.0, 0.0, -2.0)
                .with_color(Color::new(0.8, 0.3, 0.2)),
        )
        .with_light(Point3::new(-4.0, 6.0, 4.0))
        .with_background(Color::new(0.3, 0.4, 0.6))
}

fn build_config(args: &Args) -> RenderConfig {
    let mut config = RenderConfig {
        supersampling: args.supersampling,
        max_depth: args.depth,
        num_shadow_rays: args.shadow_rays,
        light_radius: args.light_radius.to_float(),
        render_mode: match args.mode {
            Mode::Shaded => RenderMode::Shaded,
            Mode::Normals => RenderMode::Debug(DebugMode::Normals),
            Mode::ForwardNormals => RenderMode::Debug(DebugMode::ForwardNormals),
        },
        ..RenderConfig::preview()
    }
    .with_dimensions(args.width, args.height);
    if let Some(threads) = args.threads {
        config.max_threads = threads;
    }
    if config.max_threads == 1 {
        config = config.single_threaded();
    }
    config
}

fn output_path(args: &Args) -> Result<PathBuf> {
    if let Some(path) = &args.output {
        return Ok(path.clone());
    }
    let save_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("results");
    std::fs::create_dir_all(&save_dir)?;
    Ok(save_dir.join(Local::now().format("render_%F_%H%M%S.png").to_string()))
}

fn run(args: Args) -> Result<()> {
    let scene = match args.scene {
        DemoScene::Showcase => prefab::demo_scene(),
        DemoScene::CarvedSphere => prefab::carved_sphere_scene(),
        DemoScene::Spheres => spheres_scene(),
    };
    let camera = Camera::looking_at(
        Point3::new(0.0, 1.5, 6.0),
        Vector3::new(0.0, -0.25, -1.0),
        Vector3::unit_y(),
    )?;
    let renderer = Renderer::new(build_config(&args))?;
    let job = renderer.spawn(&Arc::new(scene), &camera)?;
    while !job.is_finished() {
        thread::sleep(Duration::from_millis(500));
        info!("{:.1}% done", job.progress());
    }
    let output = job.wait()?;
    output.summary.table().printstd();

    let path = output_path(&args)?;
    output.canvas.save_png(&path)?;
    info!("Saved {}", path.display());
    Ok(())
}

fn main() {
    let args = Args::parse();
    logger::init_logger(args.log_level.into());
    if let Err(e) = run(args) {
        error!("{}", e);
        std::process::exit(1);
    }
}
