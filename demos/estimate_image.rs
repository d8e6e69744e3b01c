// Print the estimated luminance of image files under every readback format.
//
// Usage: cargo run --example estimate_image -- <image> [<image> ...]

use anyhow::{bail, Result};
use smartgamma::controller::DEFAULT_DOWNSAMPLE_SIZE;
use smartgamma::{FrameSource, ImageFrameSource, LuminanceSample, SurfaceFormat};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let paths: Vec<String> = std::env::args().skip(1).collect();
    if paths.is_empty() {
        bail!("usage: estimate_image <image> [<image> ...]");
    }

    for path in &paths {
        let mut source = ImageFrameSource::open(path)?;
        let preferred = source.color_space().preferred_format();
        println!("{} (preferred {:?})", path, preferred);

        for format in [SurfaceFormat::Rgba, SurfaceFormat::Bgra, SurfaceFormat::Rgba16f] {
            let frame = source.readback(DEFAULT_DOWNSAMPLE_SIZE, format)?;
            let sample = LuminanceSample::measure(&frame);
            println!(
                "  {:<8} {:>6.2}%",
                format!("{:?}", sample.encoding),
                sample.value * 100.0
            );
        }
    }

    Ok(())
}
