use clap::{Parser, Subcommand};
use dreamframe::display::{self, DisplaySink, PanelSpec, PngPreviewSink};
use dreamframe::library::{self, LibraryConfig};
use dreamframe::output;
use dreamframe::pipeline::{self, RunConfig};
use dreamframe::synth::SdProcess;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dreamframe")]
#[command(about = "Generative-art picture frame pipeline")]
#[command(long_about = "\
Generative-art picture frame pipeline

One generate run picks a random prompt and style, asks an external Stable
Diffusion process (OnnxStream's sd) to paint it, stamps the prompt text onto
a copy, and publishes everything under deterministic filenames:

  output/
  ├── <prompt>_seed_42_steps_5_size_800x480.png              # raw raster
  ├── <prompt>_seed_42_steps_5_size_800x480_with_prompt.png  # annotated copy
  ├── <prompt>_seed_42_steps_5_size_800x480.txt              # prompt sidecar
  └── output.png                                             # stable alias

Prompt files are JSON string lists. An entry that is an http(s) URL is a
live feed: one entry title becomes the prompt and the feed URL is recorded
as its source.

The display consumer reads output.png on a timer; 'dreamframe adapt'
rotates and resizes any raster to the panel resolution for it.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args)]
struct GenerateArgs {
    /// Directory to save the output images
    output_dir: PathBuf,

    /// The prompts file to use (JSON list of strings)
    #[arg(long, default_value = "prompts/flowers.json")]
    prompts: PathBuf,

    /// The styles file to use (JSON list of strings)
    #[arg(long, default_value = "prompts/styles.json")]
    styles: PathBuf,

    /// Use this prompt verbatim instead of the prompt/style files
    #[arg(long, default_value = "")]
    prompt: String,

    /// The seed to use (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// The number of diffusion steps to perform
    #[arg(long, default_value_t = 5)]
    steps: u32,

    /// The width of the image to generate
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// The height of the image to generate
    #[arg(long, default_value_t = 480)]
    height: u32,

    /// Path to the stable diffusion binary
    #[arg(long, default_value = "OnnxStream/src/build/sd")]
    sd: String,

    /// Path to the stable diffusion model to use
    #[arg(long, default_value = "models/stable-diffusion-xl-turbo-1.0-anyshape-onnxstream")]
    model: String,
}

#[derive(clap::Args)]
struct AdaptArgs {
    /// Path to the image file to adapt
    image: PathBuf,

    /// Where to write the adapted frame
    #[arg(long, default_value = "preview.png")]
    output: PathBuf,

    /// Panel width
    #[arg(long, default_value_t = PanelSpec::INKY_IMPRESSION_7.width)]
    width: u32,

    /// Panel height
    #[arg(long, default_value_t = PanelSpec::INKY_IMPRESSION_7.height)]
    height: u32,

    /// Saturation level for the display, 0 to 1
    #[arg(short, long, default_value_t = 0.5)]
    saturation: f32,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a new random picture
    Generate(GenerateArgs),
    /// Rotate and resize a raster to the display panel resolution
    Adapt(AdaptArgs),
    /// Download one random photo from the configured Immich library
    Fetch,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Generate(args) => {
            // Chosen once here, threaded explicitly everywhere below
            let seed = args
                .seed
                .unwrap_or_else(|| rand::thread_rng().gen_range(1..=10_000));
            let mut rng = StdRng::seed_from_u64(seed);

            let config = RunConfig {
                output_dir: args.output_dir,
                prompts_file: args.prompts,
                styles_file: args.styles,
                explicit_prompt: args.prompt,
                seed,
                steps: args.steps,
                width: args.width,
                height: args.height,
                synthesizer_path: args.sd,
                model_path: args.model,
            };

            println!("==> Generating with seed {seed}");
            let result = pipeline::run(&config, &SdProcess::new(), &mut rng)?;
            output::print_run_result(&result);
        }
        Command::Adapt(args) => {
            let saturation = display::validate_saturation(args.saturation)?;
            let panel = PanelSpec {
                width: args.width,
                height: args.height,
            };
            let frame = display::adapt_file(&args.image, panel)?;
            let sink = PngPreviewSink {
                path: args.output.clone(),
            };
            sink.show(&frame, saturation)?;
            println!(
                "==> Adapted {} to {}x{} at {}",
                args.image.display(),
                panel.width,
                panel.height,
                args.output.display()
            );
        }
        Command::Fetch => {
            let config = LibraryConfig::from_env()?;
            let mut rng = StdRng::from_entropy();
            let path = library::fetch_random(&config, &mut rng)?;
            println!("==> Downloaded {}", path.display());
        }
    }

    Ok(())
}
