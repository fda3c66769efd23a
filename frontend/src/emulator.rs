use std::time::Instant;

use cathode_core::core::machine::Machine;
use sdl2::event::Event;
use sdl2::keyboard::Scancode;

use crate::input::KeyMap;
use crate::overlay;
use crate::screenshot;
use crate::video::Video;

pub fn run(machine: &mut dyn Machine, key_map: &KeyMap, scale: u32) {
    let sdl_context = sdl2::init().expect("Failed to initialize SDL2");
    let sdl_video = sdl_context.video().expect("Failed to init SDL video");

    let (width, height) = machine.display_size();
    let mut video = Video::new(&sdl_video, "Cathode", width, height, scale);
    let mut event_pump = sdl_context.event_pump().expect("Failed to get event pump");

    let mut framebuffer = vec![0u8; (width * height * 3) as usize];
    let mut show_fps = false;
    let mut fps_text = String::new();
    let mut frames = 0u32;
    let mut last_fps_update = Instant::now();

    'main: loop {
        // Poll all pending SDL events, translate to machine input
        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => break 'main,

                Event::KeyDown {
                    scancode: Some(Scancode::Escape),
                    ..
                } => break 'main,

                Event::KeyDown {
                    scancode: Some(Scancode::F1),
                    repeat: false,
                    ..
                } => show_fps = !show_fps,

                Event::KeyDown {
                    scancode: Some(Scancode::F12),
                    repeat: false,
                    ..
                } => {
                    if let Err(e) = screenshot::save(&framebuffer, width, height) {
                        log::warn!("screenshot failed: {e}");
                    }
                }

                Event::KeyDown {
                    scancode: Some(sc),
                    repeat: false,
                    ..
                } => {
                    if let Some(button_id) = key_map.get(sc) {
                        machine.set_input(button_id, true);
                    }
                }

                Event::KeyUp {
                    scancode: Some(sc), ..
                } => {
                    if let Some(button_id) = key_map.get(sc) {
                        machine.set_input(button_id, false);
                    }
                }

                _ => {}
            }
        }

        // Run one frame of emulation, then redraw
        machine.run_frame();
        machine.render_frame(&mut framebuffer);

        frames += 1;
        let elapsed = last_fps_update.elapsed();
        if elapsed.as_secs_f64() >= 1.0 {
            fps_text = format!("{:.1}", frames as f64 / elapsed.as_secs_f64());
            frames = 0;
            last_fps_update = Instant::now();
        }
        if show_fps {
            overlay::draw_fps(&mut framebuffer, width as usize, &fps_text);
        }

        video.present(&framebuffer);
        // Frame timing handled by VSync (set in Video::new via present_vsync)
    }
}
