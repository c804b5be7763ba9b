use canopy_flux_core::physics::atmosphere_validation::saturation_vapor_pressure;
use canopy_flux_core::{
    CanopyFluxDriver, Celsius, Cohort, ConfigError, Forcing, Fraction, Humidity, Kelvin,
    ModelParams, OptimalityInput, OptimalityOutput, OptimalitySolver, Pascals,
    PhotosynthesisPathway, PhotosynthesisScheme, SimulationConfig, SpeciesTable,
};
use clap::Parser;
use std::f64::consts::PI;
use tracing_subscriber::EnvFilter;

/// Photons per joule of shortwave, for PAR from radiation (µmol/J)
const PAR_PER_SHORTWAVE: f64 = 2.04;

/// Canopy flux demo with a synthetic diurnal forcing series
#[derive(Parser, Debug)]
#[command(name = "canopy-flux-demo")]
#[command(about = "Cohort canopy carbon and water flux demo", long_about = None)]
struct Args {
    /// Photosynthesis scheme (gs_leuning or pmodel)
    #[arg(short, long, default_value = "gs_leuning")]
    scheme: PhotosynthesisScheme,

    /// Number of days to simulate
    #[arg(short, long, default_value_t = 3)]
    days: u32,

    /// Timestep length in hours
    #[arg(long, default_value_t = 1.0)]
    step_hours: f64,

    /// Daily mean air temperature in °C
    #[arg(short, long, default_value_t = 18.0)]
    temperature: f64,

    /// Diurnal temperature amplitude in °C
    #[arg(long, default_value_t = 6.0)]
    temperature_range: f64,

    /// Relative humidity in %
    #[arg(long, default_value_t = 65.0)]
    humidity: f64,

    /// Peak shortwave radiation in W/m²
    #[arg(long, default_value_t = 800.0)]
    peak_radiation: f64,

    /// Ambient CO2 in ppm
    #[arg(long, default_value_t = 410.0)]
    co2: f64,

    /// Soil water supply per tree per step, in kg, for every cohort
    #[arg(short, long, default_value_t = 5.0)]
    water_supply: f64,

    /// Relative soil moisture (0-1) seen by the pmodel scheme
    #[arg(long)]
    soil_moisture: Option<f64>,

    /// Light-use efficiency of the stand-in optimality solver (mol C / mol photons)
    #[arg(long, default_value_t = 0.06)]
    stub_lue: f64,

    /// Overwrite GPP with the fixed-LUE debug formula
    #[arg(long)]
    debug_fixed_lue: bool,

    /// Report every N steps
    #[arg(short, long, default_value_t = 3)]
    report_interval: u32,
}

/// Stand-in for an external least-cost optimality solver
///
/// Returns a fixed light-use efficiency and a Vcmax25 proportional to the
/// light it is given. Only for exercising the `pmodel` plumbing.
struct ConstantLueSolver {
    lue: f64,
}

impl OptimalitySolver for ConstantLueSolver {
    fn solve(&self, input: &OptimalityInput) -> OptimalityOutput {
        OptimalityOutput {
            lue: self.lue,
            vcmax25: 0.02 * input.ppfd,
        }
    }
}

fn main() -> Result<(), ConfigError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    println!("=== Canopy Flux Demo ===\n");

    let step_seconds = args.step_hours * 3600.0;
    let config = SimulationConfig {
        scheme: args.scheme,
        step_seconds,
        debug_fixed_lue: args.debug_fixed_lue,
        ..SimulationConfig::default()
    };
    let solver: Option<Box<dyn OptimalitySolver>> = match args.scheme {
        PhotosynthesisScheme::AcclimatedOptimality => {
            println!(
                "Using stand-in optimality solver (LUE {:.3}); not a least-cost solution",
                args.stub_lue
            );
            Some(Box::new(ConstantLueSolver { lue: args.stub_lue }))
        }
        PhotosynthesisScheme::ConductanceLimited => None,
    };

    let mut driver = CanopyFluxDriver::new(
        config,
        ModelParams::default(),
        SpeciesTable::with_defaults(),
        solver,
    )?;

    let mut cohorts = build_stand(args.water_supply);
    println!(
        "Stand: {} cohorts, scheme {}, dt = {:.0} s\n",
        cohorts.len(),
        args.scheme,
        step_seconds
    );

    let steps_per_day = (24.0 / args.step_hours).round().max(1.0) as u32;
    let total_steps = steps_per_day * args.days;
    let mut gpp_total = vec![0.0; cohorts.len()];
    let mut transp_total = vec![0.0; cohorts.len()];

    println!("Step | Hour | Rad(W/m²) | T(°C) | Cohort | GPP(kgC/tree) | Resl(kgC/tree) | Transp(kg/tree) | w_scale");
    println!("-----|------|-----------|-------|--------|---------------|----------------|-----------------|--------");

    for step in 0..total_steps {
        let hour = f64::from(step % steps_per_day) * args.step_hours;
        let forcing = diurnal_forcing(&args, hour);
        driver.step(&forcing, &mut cohorts, step == 0);

        for (i, cohort) in cohorts.iter().enumerate() {
            gpp_total[i] += cohort.fluxes.gpp * cohort.n_individuals;
            transp_total[i] += cohort.fluxes.transp * cohort.n_individuals;
        }

        if step % args.report_interval.max(1) == 0 {
            for (i, cohort) in cohorts.iter().enumerate() {
                println!(
                    "{:4} | {:4.1} | {:9.1} | {:5.1} | {:6} | {:13.3e} | {:14.3e} | {:15.3e} | {:7.3}",
                    step,
                    hour,
                    forcing.radiation,
                    *forcing.air_temperature_celsius(),
                    i,
                    cohort.fluxes.gpp,
                    cohort.fluxes.resl,
                    cohort.fluxes.transp,
                    cohort.fluxes.w_scale
                );
            }
        }
    }

    println!("\n=== Simulation Complete ===");
    println!("Steps run: {}", driver.steps_run());
    let light = driver.light();
    for layer in 1..=3 {
        println!(
            "Layer {}: light {:.3}, LAI {:.2}, fAPAR {:.3}",
            layer,
            light.light_at_layer(layer),
            light.layer_lai(layer),
            light.layer_fapar(layer)
        );
    }
    for (i, cohort) in cohorts.iter().enumerate() {
        println!(
            "Cohort {} (species {}, layer {}): GPP {:.4} kgC/m², transpiration {:.2} kg/m²",
            i, cohort.species, cohort.layer, gpp_total[i], transp_total[i]
        );
    }
    if let Some(memory) = driver.memory() {
        println!(
            "Acclimated environment: CO2 {:.1} ppm, T {}, VPD {}",
            memory.co2_ppm, memory.temperature, memory.vpd
        );
    }

    Ok(())
}

/// Canopy trees over a sub-canopy of needleleaf trees and a C4 grass layer
fn build_stand(water_supply: f64) -> Vec<Cohort> {
    vec![
        Cohort::new(0, PhotosynthesisPathway::C3, 1, 60.0, 15.0, 0.03).with_water_supply(water_supply),
        Cohort::new(1, PhotosynthesisPathway::C3, 2, 12.0, 4.0, 0.1).with_water_supply(water_supply),
        Cohort::new(2, PhotosynthesisPathway::C4, 3, 0.3, 0.15, 4.0)
            .with_water_supply(water_supply * 0.05),
    ]
}

/// Sinusoidal day: daylight from 06:00 to 18:00, temperature peaking at 15:00
fn diurnal_forcing(args: &Args, hour: f64) -> Forcing {
    let radiation = (args.peak_radiation * (PI * (hour - 6.0) / 12.0).sin()).max(0.0);
    let temperature = Celsius::new(args.temperature + args.temperature_range * (PI * (hour - 9.0) / 12.0).sin());
    let relative_humidity = Fraction::clamped(args.humidity / 100.0);
    let vpd = saturation_vapor_pressure(temperature) * *relative_humidity.complement();

    Forcing {
        radiation,
        par: radiation * PAR_PER_SHORTWAVE,
        air_temperature: Kelvin::from(temperature),
        humidity: Humidity::Relative(relative_humidity),
        pressure: Pascals::SEA_LEVEL,
        co2: args.co2 * 1.0e-6,
        vpd,
        soil_moisture: args.soil_moisture.map(Fraction::clamped),
    }
}
