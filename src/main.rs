use anyhow::Result;
use glam::Vec2;
use log::info;
use std::sync::Arc;
use winit::{
    event::{Event, WindowEvent},
    event_loop::EventLoop,
    window::WindowBuilder,
};

mod core;
mod engine;
mod game;

use engine::assets::ImageLoader;
use engine::game_loop::FrameClock;
use engine::input::{Action, InputManager};
use engine::renderer::Renderer;
use game::{Level, Player};

const TILE_SIZE: f32 = 16.0;
const PLAYER_SIZE: f32 = 16.0;
const CAMERA_ZOOM: f32 = 4.0;

/// A bordered arena of solid tiles
fn arena() -> Level {
    let mut grid = [[0u8; 20]; 12];
    for col in 0..20 {
        grid[0][col] = 1;
        grid[11][col] = 1;
    }
    for row in 0..12 {
        grid[row][0] = 1;
        grid[row][19] = 1;
    }
    Level::from_tile_grid(&grid, TILE_SIZE)
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting Lancer...");

    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("Lancer")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720))
            .with_resizable(true)
            .build(&event_loop)?,
    );

    let mut renderer = pollster::block_on(Renderer::new(window.clone()))?;
    renderer.camera_mut().set_zoom(CAMERA_ZOOM);

    let loader = ImageLoader::new("assets");
    let mut player = Player::new(Vec2::new(96.0, 80.0), PLAYER_SIZE, &loader);
    let level = arena();

    let mut input = InputManager::new();
    let mut clock = FrameClock::new();

    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    info!("Close requested, shutting down...");
                    elwt.exit();
                }
                WindowEvent::Resized(physical_size) => {
                    renderer.resize(physical_size);
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    input.process_keyboard_event(&event);
                }
                WindowEvent::Focused(false) => {
                    // Keys released while unfocused would otherwise stick
                    input.reset();
                }
                WindowEvent::RedrawRequested => {
                    let dt = clock.begin_frame();

                    player.poll_assets(|image| renderer.upload_texture(image));

                    if input.just_pressed(Action::Attack) {
                        player.attack();
                    }
                    player.handle_input(&input.directional());
                    player.update(dt, level.blocks());

                    renderer.camera_mut().center_on(player.center);
                    renderer.begin_frame();
                    player.draw(renderer.draw_surface());

                    match renderer.render() {
                        Ok(()) => {}
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            renderer.reconfigure();
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            log::error!("GPU out of memory, shutting down");
                            elwt.exit();
                        }
                        Err(e) => log::warn!("Surface error: {e}"),
                    }

                    input.update();

                    if clock.frame_count() % 600 == 0 {
                        log::debug!("fps: {:.1}", clock.fps());
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                window.request_redraw();
            }
            _ => {}
        })
        .map_err(|e| anyhow::anyhow!("Event loop error: {}", e))?;

    Ok(())
}
