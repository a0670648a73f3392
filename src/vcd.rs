use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::circuit::{Circuit, WireId};
use crate::circuit_sim::Tick;
use crate::signal::Signal;
use crate::trace::TraceRecorder;

/// Value change dump of every wire in a circuit.
///
/// The header declares one 1-bit variable per wire; each recorded tick
/// becomes a `#<tick>` block with one `<value><id>` line per changed wire.
/// Values use `0`, `i`, `x` and `1`.
pub struct VcdWriter<W: Write> {
    writer: W,
    ids: Vec<String>, // indexed by wire id
}

impl VcdWriter<BufWriter<File>> {
    pub fn create<P: AsRef<Path>>(path: P, circuit: &Circuit) -> io::Result<Self> {
        let file = File::create(path)?;
        Self::new(BufWriter::new(file), circuit)
    }
}

/// Reference names end at whitespace, so it is replaced with `_`.
fn reference_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}

impl<W: Write> VcdWriter<W> {
    pub fn new(mut writer: W, circuit: &Circuit) -> io::Result<Self> {
        writeln!(writer, "$date")?;
        writeln!(
            writer,
            "  {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(writer, "$end")?;
        writeln!(writer, "$version")?;
        writeln!(writer, "  gatesim {}", env!("CARGO_PKG_VERSION"))?;
        writeln!(writer, "$end")?;
        writeln!(writer, "$timescale 1ns $end")?;
        writeln!(writer, "$scope module top $end")?;

        let mut ids = Vec::with_capacity(circuit.wire_count());
        for (wire_id, wire) in circuit.wires() {
            let vcd_id = Self::generate_vcd_id(wire_id.index());
            writeln!(
                writer,
                "$var wire 1 {} {} $end",
                vcd_id,
                reference_name(wire.name())
            )?;
            ids.push(vcd_id);
        }

        writeln!(writer, "$upscope $end")?;
        writeln!(writer, "$enddefinitions $end")?;
        writeln!(writer, "$dumpvars")?;
        writeln!(writer, "$end")?;
        Ok(Self { writer, ids })
    }

    /// Shortest identifier over the printable ASCII range `!`..=`~`.
    fn generate_vcd_id(num: usize) -> String {
        let mut id = String::new();
        let mut n = num;
        loop {
            let char = ((n % 94) + 33) as u8 as char;
            id.push(char);
            if n < 94 {
                break;
            }
            n = (n / 94) - 1;
        }
        id.chars().rev().collect()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> TraceRecorder for VcdWriter<W> {
    fn record(&mut self, tick: Tick, changes: &[(WireId, Signal)], _: &Circuit) -> io::Result<()> {
        writeln!(self.writer, "#{}", tick)?;
        for (wire_id, value) in changes {
            let vcd_id = self.ids.get(wire_id.index()).ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("wire {wire_id} was not declared in the dump header"),
                )
            })?;
            writeln!(self.writer, "{}{}", value.vcd_char(), vcd_id)?;
        }
        self.writer.flush()
    }
}
