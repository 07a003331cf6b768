//! rk-gear CLI - Spur gear synthesis from the terminal
//!
//! Writes gear configuration files, prints synthesized tooth profiles, and
//! performs dry-run builds against the in-memory collaborator.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rk_gear::{
    GearBuildOrchestrator, GearConfig, GearInputs, GearParameters, InMemoryCollaborator,
    ProfileSynthesizer,
};

#[derive(Parser)]
#[command(name = "rk-gear")]
#[command(about = "Parametric spur gear profile synthesis", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a gear configuration file
    Init {
        /// Output .ron file
        path: PathBuf,
        /// Tooth count
        #[arg(short = 'z', long, default_value_t = 20)]
        teeth: u32,
        /// Module
        #[arg(short, long, default_value_t = 2.0)]
        module: f64,
        /// Use stub tooth proportions instead of full depth
        #[arg(long)]
        stub: bool,
    },
    /// Synthesize and print the tooth-gap profile
    Profile(GearArgs),
    /// Run a full build against the in-memory collaborator
    Build(GearArgs),
}

#[derive(Args)]
struct GearArgs {
    /// Gear configuration file (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Override the tooth count
    #[arg(short = 'z', long)]
    teeth: Option<u32>,
    /// Override the module
    #[arg(short, long)]
    module: Option<f64>,
    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

impl GearArgs {
    fn load_config(&self) -> Result<GearConfig> {
        let mut config = match &self.config {
            Some(path) => GearConfig::load(path)
                .with_context(|| format!("Failed to load {}", path.display()))?,
            None => GearConfig::default(),
        };
        if let Some(teeth) = self.teeth {
            config.gear.teeth = teeth;
        }
        if let Some(module) = self.module {
            config.gear.module = module;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rk_gear=info,rk_gear_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init {
            path,
            teeth,
            module,
            stub,
        } => {
            init_config(&path, teeth, module, stub)?;
        }
        Commands::Profile(args) => {
            show_profile(&args)?;
        }
        Commands::Build(args) => {
            dry_run_build(&args)?;
        }
    }

    Ok(())
}

fn init_config(path: &Path, teeth: u32, module: f64, stub: bool) -> Result<()> {
    let inputs = if stub {
        GearInputs::stub(teeth, module)
    } else {
        GearInputs::standard(teeth, module)
    };
    // Reject inputs that could never build before writing them out
    GearParameters::new(inputs)?;

    GearConfig::new(inputs).save(path)?;
    println!("Wrote gear configuration to {}", path.display());
    Ok(())
}

fn show_profile(args: &GearArgs) -> Result<()> {
    let config = args.load_config()?;
    let params = GearParameters::new(config.gear)?;
    let profile = ProfileSynthesizer::with_settings(config.synthesis).build_cut_profile(&params)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
        return Ok(());
    }

    println!("Spur gear z={} m={}", params.teeth(), params.module());
    println!("  pressure angle     {:>10.4}", params.pressure_angle());
    println!("  profile shift      {:>10.4}", params.profile_shift());
    println!("  rotation angle     {:>10.4}", params.rotation_angle());
    println!("  dividing diameter  {:>10.4}", params.dividing_diameter());
    println!("  base diameter      {:>10.4}", params.base_diameter());
    println!("  addendum diameter  {:>10.4}", params.addendum_diameter());
    println!("  dedendum diameter  {:>10.4}", params.dedendum_diameter());
    println!("  whole depth        {:>10.4}", params.whole_depth());
    println!("  fillet radius      {:>10.4}", params.fillet_radius());
    println!("Root: {:?}", profile.root_kind);
    println!(
        "Fillets: {:?} (delta {:.4})",
        profile.fillet_topology, profile.delta
    );
    println!("Right flank ({} points):", profile.right_flank.len());
    for p in &profile.right_flank {
        println!("  {:>12.6} {:>12.6}", p.x, p.y);
    }
    Ok(())
}

fn dry_run_build(args: &GearArgs) -> Result<()> {
    let config = args.load_config()?;
    let params = GearParameters::new(config.gear)?;
    let collaborator = InMemoryCollaborator::new();

    let report = GearBuildOrchestrator::from_config(&collaborator, &config).build(&params)?;

    if args.json {
        let output = serde_json::json!({
            "report": serde_json::to_value(&report)?,
            "commands": serde_json::to_value(collaborator.journal())?,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Build {} finished", report.id);
    for record in &report.stages {
        match record.commit {
            Some(mode) => println!("  {:<16} commit {:?}", record.stage.to_string(), mode),
            None => println!("  {}", record.stage),
        }
    }
    let calls = collaborator.op_names();
    println!(
        "{} collaborator calls, {} commits:",
        calls.len(),
        collaborator.execution_count()
    );
    for op in calls {
        println!("  {}", op);
    }
    Ok(())
}
