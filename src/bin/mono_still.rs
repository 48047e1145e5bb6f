//! Apply the monochrome look to a still image.
//!
//! Usage: mono_still <INPUT> <OUTPUT> [--contrast 1.35] [--grain 0.18]
//!        [--width W --height H] [--seed N]

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use anyhow::{Context, Result, bail};
    use clap::Parser;
    use image::RgbaImage;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::path::PathBuf;

    use mono_cam::image_io;
    use mono_cam::pipeline::{MonoFilter, PipelineParams};

    #[derive(Parser, Debug)]
    #[command(name = "mono_still", about = "Monochrome tone curve + film grain for still images")]
    struct Args {
        input: PathBuf,
        output: PathBuf,

        #[arg(long, default_value_t = PipelineParams::default().contrast)]
        contrast: f64,

        #[arg(long, default_value_t = PipelineParams::default().grain_amount)]
        grain: f64,

        /// Output width; crops to fill when combined with --height.
        #[arg(long, requires = "height")]
        width: Option<u32>,

        #[arg(long, requires = "width")]
        height: Option<u32>,

        /// Seed the grain for reproducible output.
        #[arg(long)]
        seed: Option<u64>,
    }

    pub fn run() -> Result<()> {
        env_logger::init();
        let args = Args::parse();

        let source = image_io::load_image(&args.input)
            .with_context(|| format!("loading {}", args.input.display()))?
            .to_rgba8();

        let mut frame = match (args.width, args.height) {
            (Some(w), Some(h)) => {
                if w == 0 || h == 0 {
                    bail!("output size must be non-zero, got {w}x{h}");
                }
                let mut dest = RgbaImage::new(w, h);
                let fit = image_io::draw_cover(&source, &mut dest)?;
                log::info!("cover crop {:?} -> {w}x{h}", fit.source);
                dest
            }
            _ => source,
        };

        let params = PipelineParams {
            contrast: args.contrast,
            grain_amount: args.grain,
        };
        let mut filter = MonoFilter::default();
        let start = web_time::Instant::now();
        match args.seed {
            Some(seed) => {
                filter.process_with_rng(&mut frame, &params, &mut StdRng::seed_from_u64(seed))?
            }
            None => filter.process(&mut frame, &params)?,
        }
        log::info!(
            "processed {}x{} in {:.1}ms",
            frame.width(),
            frame.height(),
            start.elapsed().as_secs_f64() * 1000.0
        );

        image_io::save_image(&frame, &args.output)
            .with_context(|| format!("saving {}", args.output.display()))?;
        println!("{} -> {}", args.input.display(), args.output.display());
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    cli::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {}
