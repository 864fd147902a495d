use clap;
use std::path::PathBuf;

#[derive(clap::Parser,Debug)]
pub struct SimArgs {
    /// debug level logging
    #[clap(short, long, global = true)]
    pub verbose:bool,
    #[command(subcommand)]
    pub action: Action,
}

#[derive(clap::Subcommand,Debug)]
pub enum Action {
    /// write a template simulation config to modify
    NewConfig(NewConfigArgs),
    /// print the relaxation intervals of a protocol
    Timing(TimingArgs),
    /// simulate every tissue in a config
    Simulate(SimulateArgs),
    /// simulate a range of T1 values under the config's protocol
    Sweep(SweepArgs),
}

#[derive(clap::ValueEnum,Clone,Copy,Debug,PartialEq)]
pub enum OutputFormat {
    Table,
    Csv,
    Json,
}

#[derive(clap::Args,Debug)]
pub struct NewConfigArgs {
    pub destination:PathBuf,
}

#[derive(clap::Args,Debug)]
pub struct TimingArgs {
    pub config:PathBuf,
}

#[derive(clap::Args,Debug)]
pub struct SimulateArgs {
    pub config:PathBuf,
    #[clap(short, long, value_enum, default_value = "table")]
    pub format:OutputFormat,
    /// write results here instead of stdout
    #[clap(short, long)]
    pub output:Option<PathBuf>,
    /// fail if the readout trains do not fit between the inversions
    #[clap(long)]
    pub strict:bool,
}

#[derive(clap::Args,Debug)]
pub struct SweepArgs {
    pub config:PathBuf,
    #[clap(long)]
    pub t1_min:f64,
    #[clap(long)]
    pub t1_max:f64,
    #[clap(long, default_value_t = 100)]
    pub steps:usize,
    #[clap(long, default_value_t = 1.0)]
    pub pd:f64,
    #[clap(long, default_value_t = mp2rage_sim::tissue::DEFAULT_T2STAR)]
    pub t2star:f64,
    #[clap(long, default_value_t = mp2rage_sim::tissue::DEFAULT_B1MINUS)]
    pub b1minus:f64,
    #[clap(short, long, value_enum, default_value = "csv")]
    pub format:OutputFormat,
    #[clap(short, long)]
    pub output:Option<PathBuf>,
    #[clap(long)]
    pub strict:bool,
}
