mod args;

use std::fs::File;
use std::path::Path;
use anyhow::Context;
use clap::Parser;
use log::info;
use serde::Serialize;
use mp2rage_sim::config::{Config, ConfigFile, SimulationConfig};
use mp2rage_sim::report;
use mp2rage_sim::simulator::Mp2rageSimulator;
use mp2rage_sim::sweep::{t1_sweep, SweepSpec};
use mp2rage_sim::timing::derive_timing;
use args::{Action, OutputFormat, SimArgs, SimulateArgs, SweepArgs, TimingArgs};

fn main() -> anyhow::Result<()> {
    let args = SimArgs::parse();

    env_logger::Builder::from_default_env()
        .filter_level(if args.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .init();

    match args.action {
        Action::NewConfig(args) => {
            let path = SimulationConfig::default().to_file(&args.destination)
                .with_context(|| format!("writing template to {:?}", args.destination))?;
            info!("wrote template config to {:?}", path);
            Ok(())
        }
        Action::Timing(args) => timing(args),
        Action::Simulate(args) => simulate(args),
        Action::Sweep(args) => sweep(args),
    }
}

fn load(config:&Path) -> anyhow::Result<SimulationConfig> {
    SimulationConfig::from_file(config).with_context(|| format!("loading config {:?}", config))
}

fn build(config:&SimulationConfig,strict:bool) -> anyhow::Result<Mp2rageSimulator> {
    let sim = match strict {
        true => Mp2rageSimulator::strict(config.protocol),
        false => Mp2rageSimulator::new(config.protocol),
    };
    Ok(sim?)
}

fn timing(args:TimingArgs) -> anyhow::Result<()> {
    let c = load(&args.config)?;
    let t = derive_timing(&c.protocol);
    println!("TA={:.1}ms TB={:.1}ms TC={:.1}ms", t.ta, t.tb, t.tc);
    println!("readout train: {} x {}ms = {}ms", c.protocol.n, c.protocol.tr_gre, c.protocol.readout_duration());
    for v in c.protocol.timing_violations() {
        println!("warning: {}", v);
    }
    Ok(())
}

fn simulate(args:SimulateArgs) -> anyhow::Result<()> {
    let c = load(&args.config)?;
    let sim = build(&c,args.strict)?;
    let outcomes = sim.simulate_batch(&c.tissues);
    let n_failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    info!("simulated {} tissue(s), {} failed", outcomes.len(), n_failed);
    let rows = report::rows(&outcomes);
    emit(&rows,&report::table_header(),args.format,args.output.as_deref())
}

fn sweep(args:SweepArgs) -> anyhow::Result<()> {
    let c = load(&args.config)?;
    let sim = build(&c,args.strict)?;
    let spec = SweepSpec {
        t1_min: args.t1_min,
        t1_max: args.t1_max,
        steps: args.steps,
        pd: args.pd,
        t2star: args.t2star,
        b1minus: args.b1minus,
    };
    let rows = t1_sweep(&sim,&spec)?;
    let header = format!("{:>10}{:>12}{:>12}{:>12}{:>12}", "T1", "Mzss", "INV1", "INV2", "UNI");
    emit(&rows,&header,args.format,args.output.as_deref())
}

fn emit<R:Serialize + std::fmt::Display>(rows:&[R],header:&str,format:OutputFormat,output:Option<&Path>) -> anyhow::Result<()> {
    let text = match format {
        OutputFormat::Table => Some(report::to_table(header,rows)),
        OutputFormat::Json => Some(report::to_json(rows)?),
        OutputFormat::Csv => None,
    };
    match (text, output) {
        (Some(t), Some(path)) => {
            std::fs::write(path,t).with_context(|| format!("writing {:?}", path))?;
        }
        (Some(t), None) => println!("{}", t),
        (None, Some(path)) => {
            let f = File::create(path).with_context(|| format!("creating {:?}", path))?;
            report::write_csv(f,rows)?;
        }
        (None, None) => report::write_csv(std::io::stdout(),rows)?,
    }
    if let Some(path) = output {
        info!("results written to {:?}", path);
    }
    Ok(())
}

