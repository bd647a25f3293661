use clap::Parser;

/// Thin driver for the Global Carbon Reward engine: parses a scenario,
/// runs it (optionally as a Monte-Carlo ensemble), and prints a summary.
/// This is not the stress-test harness (see the scenario tests for that);
/// it is the minimal surface needed to run one scenario from the shell.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[arg(long, default_value_t = 50)]
    years: u32,

    #[arg(long, default_value_t = 420.0)]
    initial_co2_ppm: f64,

    #[arg(long, default_value_t = 350.0)]
    target_co2_ppm: f64,

    #[arg(long, default_value_t = 100.0)]
    initial_price_floor_usd: f64,

    #[arg(long, default_value_t = 0.02)]
    inflation_target: f64,

    #[arg(long, default_value_t = 3.5)]
    adoption_rate_per_year: f64,

    #[arg(long, default_value_t = false)]
    disable_audits: bool,

    #[arg(long, help = "Random seed for deterministic simulation", default_value_t = 42)]
    seed: u64,

    #[arg(long, help = "Number of independent Monte-Carlo runs", default_value_t = 1)]
    monte_carlo_runs: usize,

    #[arg(long, help = "Year at which CDR buildout permanently stops")]
    cdr_buildout_stop_year: Option<u32>,

    #[arg(long, help = "Inject a one-time inflation shock at this tick")]
    shock_tick: Option<u32>,

    #[arg(long, default_value_t = 0.01)]
    shock_inflation_delta: f64,

    #[arg(long, help = "Enable debug-level tracing output", default_value_t = false)]
    verbose: bool,

    #[arg(long, help = "Write the per-year snapshot series to this JSON file")]
    output: Option<String>,
}

impl Args {
    pub fn years(&self) -> u32 {
        self.years
    }

    pub fn initial_co2_ppm(&self) -> f64 {
        self.initial_co2_ppm
    }

    pub fn target_co2_ppm(&self) -> f64 {
        self.target_co2_ppm
    }

    pub fn initial_price_floor_usd(&self) -> f64 {
        self.initial_price_floor_usd
    }

    pub fn inflation_target(&self) -> f64 {
        self.inflation_target
    }

    pub fn adoption_rate_per_year(&self) -> f64 {
        self.adoption_rate_per_year
    }

    pub fn disable_audits(&self) -> bool {
        self.disable_audits
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn monte_carlo_runs(&self) -> usize {
        self.monte_carlo_runs
    }

    pub fn cdr_buildout_stop_year(&self) -> Option<u32> {
        self.cdr_buildout_stop_year
    }

    pub fn shock_tick(&self) -> Option<u32> {
        self.shock_tick
    }

    pub fn shock_inflation_delta(&self) -> f64 {
        self.shock_inflation_delta
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }
}
