//! tracecop CLI -- generate process traces and find resource conflicts in them.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod load;
pub mod report;

#[derive(Debug, Parser)]
#[command(
    name = "tracecop",
    about = "Resource-conflict detection for overlapping process executions"
)]
pub struct App {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate random process trace files
    Generate(GenerateArgs),
    /// List the processes captured in trace files
    Pids(PidsArgs),
    /// Analyze the executions of one process for resource conflicts
    Analyze(AnalyzeArgs),
    /// Format compact trace (.trace) files
    Fmt(FmtArgs),
    /// Print the JSON Schema for the trace file format to stdout
    Schema,
}

#[derive(Debug, Parser)]
pub struct GenerateArgs {
    /// Number of trace files to generate
    #[arg(long)]
    pub n_trace: u64,
    /// Number of distinct processes
    #[arg(long)]
    pub n_process: u64,
    /// Number of records per trace
    #[arg(long)]
    pub n_record: u64,
    /// Size of the resource pool
    #[arg(long)]
    pub n_resource: u64,
    /// Maximum number of resources per record
    #[arg(long, default_value_t = 3)]
    pub max_resources: u64,
    /// Time window, in seconds, in which records start
    #[arg(long, default_value_t = 3600)]
    pub horizon_secs: u32,
    /// Output directory for generated trace files
    #[arg(long)]
    pub output_dir: PathBuf,
}

#[derive(Debug, Parser)]
pub struct PidsArgs {
    /// Trace files (JSON) to read
    #[arg(required = true)]
    pub traces: Vec<PathBuf>,
}

#[derive(Debug, Parser)]
pub struct AnalyzeArgs {
    /// Id of the process to analyze
    pub pid: u64,
    /// Trace files (JSON) to read
    #[arg(required = true)]
    pub traces: Vec<PathBuf>,
    /// Write the per-resource summary as CSV; the pid is appended to the file name
    #[arg(long)]
    pub summary_csv: Option<PathBuf>,
    /// Write the conflict report as JSON; the pid is appended to the file name
    #[arg(long)]
    pub conflicts: Option<PathBuf>,
    /// Scan for overlaps on all cores
    #[arg(long)]
    pub parallel: bool,
    /// Print the full analysis as JSON instead of a table
    #[arg(long)]
    pub json: bool,
    /// Print every conflicting pair
    #[arg(long)]
    pub verbose: bool,
}

#[derive(Debug, Parser)]
pub struct FmtArgs {
    /// Input files or directories to format (comments are not kept)
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
    /// Check formatting without modifying files (exit 1 if unformatted)
    #[arg(long)]
    pub check: bool,
}
