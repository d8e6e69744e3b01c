// Simulated playback: bright -> dark -> bright at 60 fps, printing lifecycle changes.
//
// Usage: RUST_LOG=smartgamma=debug cargo run --example simulate_scene

use image::{DynamicImage, Rgba, RgbaImage};
use smartgamma::{ExposureController, ImageFrameSource, Lifecycle, SettingsData};
use tracing_subscriber::EnvFilter;

const FPS: f32 = 60.0;

fn gray(level: u8) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(1280, 720, Rgba([level, level, level, 255])))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut settings = SettingsData::with_defaults();
    let mut controller = ExposureController::new(&mut settings);
    let mut uploads = Vec::new();

    // (seconds, gray level)
    let scenes: &[(f32, u8)] = &[(1.0, 220), (2.5, 20), (0.1, 255), (1.0, 20), (2.0, 200)];

    let mut source = ImageFrameSource::empty();
    let mut clock = 0.0f32;
    let mut last = Lifecycle::Idle;

    for &(duration, level) in scenes {
        source.set_image(gray(level));
        println!("{:7.3}s  scene -> gray {}", clock, level);

        let frames = (duration * FPS).round() as usize;
        for _ in 0..frames {
            controller.tick(1.0 / FPS);
            let report = controller.render(&mut source, &mut uploads);
            clock += report.delta_seconds;

            if report.lifecycle != last {
                println!(
                    "{:7.3}s  {:?} -> {:?} (luminance {:.3}, strength {:.3})",
                    clock, last, report.lifecycle, report.smoothed_luminance, report.effect_strength
                );
                last = report.lifecycle;
            }
        }
    }

    println!(
        "\n{} frames rendered, final strength {:.3}, displayed brightness {:.1}%",
        uploads.len(),
        controller.effect_strength(),
        controller.brightness_percent()
    );
}
