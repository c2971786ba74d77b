use std::path::Path;
use std::time::Duration;

use anyhow::{Result, anyhow};
use raylib::prelude::*;

use grid_raycaster::config::EngineConfig;
use grid_raycaster::core::level::LevelSpec;
use grid_raycaster::core::maze::{default_map, load_map};
use grid_raycaster::core::player::Player;
use grid_raycaster::core::process_events::process_events;
use grid_raycaster::engine::Engine;
use grid_raycaster::render::framebuffer::Framebuffer;
use grid_raycaster::render::render3d::draw_frame;
use grid_raycaster::render::textures::TextureManager;

const CONFIG_PATH: &str = "assets/engine.json";
const MAP_PATH: &str = "assets/maze.txt";
const LEVEL_PATH: &str = "assets/level.json";
const TEXTURE_DIR: &str = "assets/textures";
const SPRITE_DIR: &str = "assets/sprites";

fn main() -> Result<()> {
    env_logger::init();

    let cfg = if Path::new(CONFIG_PATH).exists() {
        EngineConfig::load(CONFIG_PATH)?
    } else {
        log::info!("{CONFIG_PATH} not found, using defaults");
        EngineConfig::default()
    };
    let map = if Path::new(MAP_PATH).exists() {
        load_map(MAP_PATH, cfg.fallback_texture)?
    } else {
        log::info!("{MAP_PATH} not found, using built-in map");
        default_map()
    };
    let level = if Path::new(LEVEL_PATH).exists() {
        LevelSpec::load(LEVEL_PATH)?
    } else {
        LevelSpec::builtin()
    };

    // Image loading goes through raylib, so the window comes first.
    let (mut window, thread) = raylib::init()
        .size(cfg.width as i32, cfg.height as i32)
        .title("Grid Raycaster")
        .build();
    window.disable_cursor();
    window.set_target_fps(60);

    let mut textures = TextureManager::for_map(cfg.texture_size, TEXTURE_DIR, &map, cfg.fallback_texture);
    let mut objects = level.populate(&mut textures, SPRITE_DIR, Duration::ZERO)?;
    let mut player = Player::new(level.player_start.x, level.player_start.y, level.player_angle);
    let mut engine = Engine::for_map(cfg, &map, &textures)?;

    let (w, h) = (engine.config().width, engine.config().height);
    let mut framebuffer = Framebuffer::new(w, h);
    let img = Image::gen_image_color(w as i32, h as i32, Color::BLACK);
    let mut screen = window
        .load_texture_from_image(&thread, &img)
        .map_err(|e| anyhow!("screen texture: {e}"))?;

    log::info!("running at {w}x{h}, {} sprites", objects.len());
    while !window.window_should_close() {
        process_events(&window, &mut player, &map);

        let now = Duration::from_secs_f64(window.get_time());
        engine.update(&player, &map, &mut objects, &textures, now);
        draw_frame(&mut framebuffer, &textures, engine.objects_to_render());
        framebuffer.upload_to_texture(&mut screen);

        let fps = window.get_fps();
        let mut d = window.begin_drawing(&thread);
        d.clear_background(Color::BLACK);
        d.draw_texture(&screen, 0, 0, Color::WHITE);
        d.draw_text(&format!("FPS: {fps}"), 10, 10, 20, Color::WHITE);
    }
    Ok(())
}
