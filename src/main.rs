use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use themeweave::{compose, load_rgba, save_image, CustomProfile, Rgb, Strategy, TargetProfile};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Weave two theme-specific images into one that reads on both light and dark backgrounds"
)]
struct Args {
    /// Application to generate the ambivalent image for
    #[arg(
        long,
        value_enum,
        default_value = "discord",
        conflicts_with_all = ["dark_background", "light_background", "max_width"]
    )]
    application: Application,

    /// Custom color for dark-theme viewers, as r,g,b
    #[arg(long, requires_all = ["light_background", "max_width"])]
    dark_background: Option<Rgb>,

    /// Custom color for light-theme viewers, as r,g,b
    #[arg(long, requires_all = ["dark_background", "max_width"])]
    light_background: Option<Rgb>,

    /// Custom upper bound on output width
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..),
          requires_all = ["dark_background", "light_background"])]
    max_width: Option<u32>,

    /// How the two sources are interleaved
    #[arg(long, value_enum, default_value = "weave")]
    strategy: StrategyArg,

    /// Image drawn for dark-theme users
    #[arg(long)]
    input_dark: Option<PathBuf>,

    /// Image drawn for light-theme users
    #[arg(long)]
    input_light: Option<PathBuf>,

    /// Output file
    #[arg(long, default_value = "output.png")]
    output: PathBuf,

    /// Output format
    #[arg(long, default_value = "png")]
    output_format: String,

    /// Print all applications and exit
    #[arg(long)]
    applications: bool,

    /// Print all strategies and exit
    #[arg(long)]
    strategies: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum Application {
    Discord,
}

impl Application {
    fn profile(self) -> TargetProfile {
        match self {
            Application::Discord => TargetProfile::Discord,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum StrategyArg {
    Weave,
    Fair,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Weave => Strategy::Weave,
            StrategyArg::Fair => Strategy::Fair,
        }
    }
}

fn list_variants<T: ValueEnum>() {
    for variant in T::value_variants() {
        if let Some(v) = variant.to_possible_value() {
            println!("{}", v.get_name());
        }
    }
}

fn run(args: &Args, input_dark: &Path, input_light: &Path) -> Result<()> {
    let dark = load_rgba(input_dark)?;
    let light = load_rgba(input_light)?;

    let profile = match (args.dark_background, args.light_background, args.max_width) {
        (Some(dark_color), Some(light_color), Some(max_width)) => {
            TargetProfile::Custom(CustomProfile {
                dark_color,
                light_color,
                max_width,
            })
        }
        _ => args.application.profile(),
    };

    let result = compose(dark, light, &profile, args.strategy.into())?;
    println!("Output will be {} x {}!", result.width(), result.height());

    save_image(&result, &args.output, &args.output_format)?;
    println!("Output written to {}!", args.output.display());
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    if args.applications {
        list_variants::<Application>();
        return ExitCode::SUCCESS;
    }
    if args.strategies {
        list_variants::<StrategyArg>();
        return ExitCode::SUCCESS;
    }

    let (Some(input_dark), Some(input_light)) = (args.input_dark.clone(), args.input_light.clone())
    else {
        eprintln!("Input options are required!");
        return ExitCode::from(2);
    };

    match run(&args, &input_dark, &input_light) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
