use atwood::{ScenarioConfig, Scenario, View};
use atwood::{run_2d, run_headless, bench_runs};

use clap::Parser;
use anyhow::{Context, Result};

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about = "Interactive Atwood machine")]
struct Args {
    /// Scenario file under `scenarios/`
    #[arg(short, default_value = "default.yaml")]
    file_name: String,

    /// Run without a window and log readouts instead
    #[arg(long)]
    headless: bool,

    /// Frame cap for headless runs
    #[arg(long, default_value_t = 5000)]
    max_frames: u64,

    /// Time runs to rope exhaustion for a grid of masses and exit
    #[arg(long)]
    bench: bool,
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name);
    let file = File::open(&config_path)
        .with_context(|| format!("failed to open scenario {}", config_path.display()))?;
    let reader = BufReader::new(file);
    let scenario_cfg: ScenarioConfig = serde_yaml::from_reader(reader)
        .with_context(|| format!("failed to parse scenario {}", config_path.display()))?;

    scenario_cfg.validate()
        .with_context(|| format!("invalid scenario {}", config_path.display()))?;

    Ok(scenario_cfg)
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.bench {
        bench_runs();
        return Ok(());
    }

    let scenario_cfg = load_scenario_from_yaml(&args.file_name)?;
    let view = View::from_config(&scenario_cfg.display, scenario_cfg.parameters.pixels_per_meter);
    let scenario = Scenario::build_scenario(scenario_cfg);

    if args.headless {
        run_headless(scenario, args.max_frames);
    }
    else {
        run_2d(scenario, view);
    }

    Ok(())
}
