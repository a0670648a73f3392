//! Demo: a 2:1 multiplexer driven by a stimulus script.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gatesim::{
    components::mux::create_mux2,
    config::StimulusScript,
    dot::write_dot,
    dump::{write_gate_table, write_wire_table},
    trace::{LogTrace, NoTrace, TraceRecorder},
    vcd::VcdWriter,
    Circuit, Simulator,
};

#[derive(Parser, Debug)]
#[command(name = "gatesim", version, about = "Tick-based gate-level logic simulator demo")]
struct Cli {
    /// Number of ticks to simulate (overrides the script)
    #[arg(short, long)]
    ticks: Option<u64>,

    /// TOML stimulus script; the built-in mux stimuli are used otherwise
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Write a value change dump here
    #[arg(long)]
    vcd: Option<PathBuf>,

    /// Write a Graphviz description of the circuit here
    #[arg(long)]
    dot: Option<PathBuf>,

    /// Write the netlist as JSON here
    #[arg(long)]
    json: Option<PathBuf>,

    /// Print the wire and gate tables before simulating
    #[arg(long)]
    dump: bool,

    /// Log every signal change
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_target(false)
        .init()
}

fn build_mux() -> Result<Circuit, gatesim::SimError> {
    let mut circuit = Circuit::new();
    let a = circuit.add_wire(Some("A"));
    let d0 = circuit.add_wire(Some("D0"));
    let d1 = circuit.add_wire(Some("D1"));
    let y = circuit.add_wire(Some("Y"));
    create_mux2(&mut circuit, a, d0, d1, y)?;
    Ok(circuit)
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let circuit = build_mux()?;
    info!(
        wires = circuit.wire_count(),
        gates = circuit.gate_count(),
        "circuit built"
    );

    if cli.dump {
        let mut out = io::stdout().lock();
        write_wire_table(&circuit, &mut out)?;
        write_gate_table(&circuit, &mut out)?;
    }
    if let Some(path) = &cli.dot {
        let mut out = BufWriter::new(File::create(path)?);
        write_dot(&circuit, &mut out)?;
        out.flush()?;
        info!(path = %path.display(), "graph written");
    }
    if let Some(path) = &cli.json {
        let out = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(out, &circuit)?;
        info!(path = %path.display(), "netlist written");
    }

    let script = match &cli.script {
        Some(path) => StimulusScript::load(path)?,
        None => StimulusScript::default(),
    };
    let schedule = script.resolve(&circuit)?;
    let ticks = cli.ticks.unwrap_or(schedule.ticks);

    let mut vcd: Box<dyn TraceRecorder> = match &cli.vcd {
        Some(path) => Box::new(VcdWriter::create(path, &circuit)?),
        None => Box::new(NoTrace),
    };
    let mut sim = Simulator::new(circuit);
    sim.simulate(ticks, &mut (&mut *vcd, LogTrace), |stim, tick| {
        schedule.drive(stim, tick)
    })?;

    let circuit = sim.into_circuit();
    for name in ["A", "D0", "D1", "Y"] {
        if let Some(wire_id) = circuit.wire_named(name) {
            info!(wire = name, value = %circuit.wire_state(wire_id)?, "final");
        }
    }
    Ok(())
}
