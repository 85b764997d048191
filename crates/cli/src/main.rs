use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process;

use chrono::TimeDelta;
use clap::Parser;
use tracecop_cli::load::{expand_paths, load_records, Record};
use tracecop_cli::report::{
    frequency_table, pid_list, summary_table, with_pid_suffix, write_summary_csv, ConflictReport,
};
use tracecop_cli::{AnalyzeArgs, App, Command, FmtArgs, GenerateArgs, PidsArgs};
use tracecop_core::analysis::{analyze, analyze_parallel};
use tracecop_core::trace::{census, filter_by_process, format_trace, total_runtime};
use tracecop_testgen::generator::{generate_mult_traces, GeneratorParams};
use tracecop_testgen::ProcessLog;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let app = App::parse();
    match &app.command {
        Command::Generate(args) => generate(args),
        Command::Pids(args) => pids(args),
        Command::Analyze(args) => run_analysis(args),
        Command::Fmt(args) => fmt(args),
        Command::Schema => schema(),
    }
}

fn fail(message: &str) -> ! {
    eprintln!("{message}");
    process::exit(1);
}

fn load(paths: &[PathBuf]) -> Vec<Record> {
    let records = load_records(paths).unwrap_or_else(|e| fail(&e.to_string()));
    println!(
        "Read {} process log entries from {} files.",
        records.len(),
        paths.len()
    );
    records
}

fn generate(args: &GenerateArgs) {
    fs::create_dir_all(&args.output_dir).unwrap_or_else(|e| {
        fail(&format!("Failed to create output directory: {e}"));
    });

    let params = GeneratorParams::builder()
        .id(0)
        .n_process(args.n_process)
        .n_record(args.n_record)
        .n_resource(args.n_resource)
        .max_resources(args.max_resources)
        .horizon_secs(args.horizon_secs)
        .build();
    let traces = generate_mult_traces(args.n_trace, &params);

    for trace in &traces {
        tracing::debug!(
            id = trace.get_id(),
            records = trace.get_logs().len(),
            elapsed_us = trace.get_duration().num_microseconds(),
            "generated trace"
        );
        let path = args.output_dir.join(format!("{}.json", trace.get_id()));
        let file = fs::File::create(&path).unwrap_or_else(|e| {
            fail(&format!("Failed to create {}: {e}", path.display()));
        });
        serde_json::to_writer_pretty(file, trace.get_logs()).unwrap_or_else(|e| {
            fail(&format!("Failed to write {}: {e}", path.display()));
        });
    }

    println!(
        "Generated {} traces to {}",
        traces.len(),
        args.output_dir.display()
    );
}

fn pids(args: &PidsArgs) {
    let records = load(&args.traces);
    let census = census(&records);
    println!(
        "The following {} processes were captured in the log:",
        census.distinct.len()
    );
    println!("{}", pid_list(&census.distinct));
    print!("{}", frequency_table(&census.frequencies()));
}

fn run_analysis(args: &AnalyzeArgs) {
    let records = load(&args.traces);
    let census = census(&records);
    println!(
        "The following {} processes were captured in the log: {}",
        census.distinct.len(),
        pid_list(&census.distinct)
    );
    if !census.contains(args.pid) {
        fail(&format!(
            "Process {} is not captured in the input traces. Abort.",
            args.pid
        ));
    }

    let selected = filter_by_process(&records, args.pid);
    let runtime: TimeDelta = total_runtime(&selected);

    let result = if args.parallel {
        analyze_parallel(&selected)
    } else {
        analyze(&selected)
    };
    let analysis = result.unwrap_or_else(|e| fail(&format!("Analysis failed: {e}")));

    if args.json {
        let json = serde_json::to_string_pretty(&analysis)
            .unwrap_or_else(|e| fail(&format!("Failed to serialize analysis: {e}")));
        println!("{json}");
    } else {
        println!(
            "Process {}: {} executions, {} overlapping pairs, {} write-write conflicts.",
            args.pid,
            analysis.records,
            analysis.overlaps.len(),
            analysis.conflicts.len()
        );
        if args.verbose {
            for conflict in &analysis.conflicts {
                let [x, y] = conflict.pair.ids().map(|id| &selected[id.index()]);
                println!("  {x:?} <> {y:?}: {:?}", conflict.resources);
            }
        }
        print!("{}", summary_table(&analysis.summary));
    }

    if let Some(path) = &args.summary_csv {
        let path = with_pid_suffix(path, args.pid);
        let file = create(&path);
        write_summary_csv(io::BufWriter::new(file), &analysis.summary)
            .unwrap_or_else(|e| fail(&format!("Failed to write {}: {e}", path.display())));
        println!("Summary written to {}", path.display());
    }

    if let Some(path) = &args.conflicts {
        let path = with_pid_suffix(path, args.pid);
        let report = ConflictReport::new(args.pid, &selected, &analysis.conflicts, runtime);
        serde_json::to_writer_pretty(create(&path), &report)
            .unwrap_or_else(|e| fail(&format!("Failed to write {}: {e}", path.display())));
        println!("Conflict report written to {}", path.display());
    }
}

fn create(path: &Path) -> fs::File {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).unwrap_or_else(|e| {
            fail(&format!("Failed to create {}: {e}", parent.display()));
        });
    }
    fs::File::create(path)
        .unwrap_or_else(|e| fail(&format!("Failed to create {}: {e}", path.display())))
}

fn fmt(args: &FmtArgs) {
    let files = expand_paths(&args.paths, "trace")
        .unwrap_or_else(|e| fail(&format!("Failed to list input paths: {e}")));
    if files.is_empty() {
        fail("No .trace files found");
    }

    let mut unformatted = 0usize;
    for path in &files {
        let text = fs::read_to_string(path)
            .unwrap_or_else(|e| fail(&format!("Failed to read {}: {e}", path.display())));
        let records = tracecop_parser::parse_trace(&text)
            .unwrap_or_else(|e| fail(&format!("{}: {e}", path.display())));
        let formatted = format_trace(&records);
        if formatted == text {
            continue;
        }
        if args.check {
            println!("{}: not formatted", path.display());
            unformatted += 1;
        } else {
            fs::write(path, formatted)
                .unwrap_or_else(|e| fail(&format!("Failed to write {}: {e}", path.display())));
            println!("{}: formatted", path.display());
        }
    }

    if unformatted > 0 {
        process::exit(1);
    }
}

fn schema() {
    let schema = schemars::schema_for!(Vec<ProcessLog>);
    let json = serde_json::to_string_pretty(&schema)
        .unwrap_or_else(|e| fail(&format!("Failed to serialize schema: {e}")));
    println!("{json}");
}
