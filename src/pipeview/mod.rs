// src/pipeview/mod.rs
//! Saturn simulation log to O3PipeView trace conversion
//!
//! The vector unit logs `PipeView:` records while a kernel runs. This module
//! turns them into the trace format read by the gem5 o3-pipeview visualizer.
//! Each element group of a multi-cycle vector instruction becomes its own
//! uop; a uop "retires" when its first result is written back, the earliest
//! point at which chaining is possible.
//!
//! Loads: one uop per memory request, issued when the request leaves the
//! memory interface, retired when the first segment is written back.

use std::collections::BTreeMap;
use std::io::{self, BufRead, Write};

/// Simulator ticks per cycle used when none is given.
pub const DEFAULT_CYCLE_TIME: u64 = 1000;

#[derive(Debug, thiserror::Error)]
pub enum PipeViewError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsnKind {
    Compute,
    Load,
    Store,
}

/// Which instruction kinds to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindFilter {
    pub compute: bool,
    pub load: bool,
    pub store: bool,
}

impl KindFilter {
    pub const ALL: KindFilter = KindFilter {
        compute: true,
        load: true,
        store: true,
    };

    /// Nothing selected means everything is shown.
    pub fn from_flags(compute: bool, load: bool, store: bool) -> Self {
        if compute || load || store {
            Self { compute, load, store }
        } else {
            Self::ALL
        }
    }

    pub fn accepts(&self, kind: InsnKind) -> bool {
        match kind {
            InsnKind::Compute => self.compute,
            InsnKind::Load => self.load,
            InsnKind::Store => self.store,
        }
    }
}

impl Default for KindFilter {
    fn default() -> Self {
        Self::ALL
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipeViewOptions {
    pub cycle_time: u64,
    pub filter: KindFilter,
    pub show_unretired: bool,
}

impl Default for PipeViewOptions {
    fn default() -> Self {
        Self {
            cycle_time: DEFAULT_CYCLE_TIME,
            filter: KindFilter::ALL,
            show_unretired: false,
        }
    }
}

/// A cycle stamp for one element group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub cycle: u64,
    pub element_group: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insn {
    pub seqno: u64,
    pub disassembly: String,
    pub pc: u64,
    pub dispatch: u64,
    pub issue: Vec<Event>,
    pub retire: Vec<Event>,
    pub kind: InsnKind,
}

impl Insn {
    /// Cycle of the first writeback of `element_group`, 0 if none was seen.
    fn retire_cycle(&self, element_group: u64) -> u64 {
        self.retire
            .iter()
            .find(|event| event.element_group == element_group)
            .map_or(0, |event| event.cycle)
    }
}

fn field<'a>(fields: &[&'a str], index: usize, line: usize) -> Result<&'a str, PipeViewError> {
    fields.get(index).copied().ok_or_else(|| PipeViewError::Parse {
        line,
        reason: format!("missing field {}", index),
    })
}

fn number(fields: &[&str], index: usize, line: usize, radix: u32) -> Result<u64, PipeViewError> {
    let text = field(fields, index, line)?;
    u64::from_str_radix(text.trim(), radix).map_err(|e| PipeViewError::Parse {
        line,
        reason: format!("field {} '{}': {}", index, text, e),
    })
}

/// Collect instructions from a simulation log, keyed by sequence number.
/// Lines without the `PipeView:` prefix are ignored.
pub fn parse_log<R: BufRead>(reader: R, cycle_time: u64) -> Result<Vec<Insn>, PipeViewError> {
    let mut insns: BTreeMap<u64, Insn> = BTreeMap::new();
    let mut dispatch_order = Vec::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if !line.starts_with("PipeView:") {
            continue;
        }

        let fields: Vec<&str> = line.trim_end().split(':').collect();
        let seqno = number(&fields, 1, line_no, 10)?;
        let label = field(&fields, 2, line_no)?;
        let cycle = number(&fields, 3, line_no, 10)?
            .checked_mul(cycle_time)
            .ok_or_else(|| PipeViewError::Parse {
                line: line_no,
                reason: format!("cycle stamp overflows at {} ticks per cycle", cycle_time),
            })?;

        if label == "dispatch" {
            let pc_text = field(&fields, 4, line_no)?;
            let pc = u64::from_str_radix(pc_text.trim_start_matches("0x"), 16).map_err(|e| {
                PipeViewError::Parse {
                    line: line_no,
                    reason: format!("pc '{}': {}", pc_text, e),
                }
            })?;
            let disassembly = field(&fields, 7, line_no)?.to_string();

            // a repeated dispatch replaces the record but keeps its place
            if !insns.contains_key(&seqno) {
                dispatch_order.push(seqno);
            }
            insns.insert(
                seqno,
                Insn {
                    seqno,
                    disassembly,
                    pc,
                    dispatch: cycle,
                    issue: Vec::new(),
                    retire: Vec::new(),
                    kind: InsnKind::Compute,
                },
            );
            continue;
        }

        let insn = match insns.get_mut(&seqno) {
            Some(insn) => insn,
            None => {
                log::warn!("unknown sequence number {} (line {})", seqno, line_no);
                continue;
            }
        };

        match label {
            "vxsop" => {
                let element_group = number(&fields, 4, line_no, 10)?;
                insn.issue.push(Event { cycle, element_group });
            }
            "vssop" => {
                let element_group = number(&fields, 4, line_no, 10)?;
                insn.issue.push(Event { cycle, element_group });
                insn.kind = InsnKind::Store;
            }
            "lasop" => {
                let element_group = number(&fields, 5, line_no, 10)?;
                insn.issue.push(Event { cycle, element_group });
                insn.kind = InsnKind::Load;
            }
            "sasop" => {
                let element_group = number(&fields, 5, line_no, 10)?;
                insn.retire.push(Event { cycle, element_group });
                insn.kind = InsnKind::Store;
            }
            label if label.starts_with("write.") => {
                let element_group = number(&fields, 4, line_no, 10)?;
                insn.retire.push(Event { cycle, element_group });
            }
            _ => {}
        }
    }

    Ok(dispatch_order
        .into_iter()
        .filter_map(|seqno| insns.remove(&seqno))
        .collect())
}

fn write_record<W: Write + ?Sized>(
    out: &mut W,
    fetch: u64,
    insn: &Insn,
    uop: usize,
    label: &str,
    issue: u64,
    retire: u64,
) -> io::Result<()> {
    writeln!(
        out,
        "O3PipeView:fetch:{}:0x{:x}:{}:{}:{}",
        fetch, insn.pc, uop, insn.seqno, label
    )?;
    writeln!(out, "O3PipeView:decode:0")?;
    writeln!(out, "O3PipeView:rename:0")?;
    writeln!(out, "O3PipeView:dispatch:{}", insn.dispatch)?;
    writeln!(out, "O3PipeView:issue:{}", issue)?;
    writeln!(out, "O3PipeView:complete:0")?;
    writeln!(out, "O3PipeView:retire:{}", retire)
}

/// Render one O3PipeView record per issued element group.
pub fn render<W: Write + ?Sized>(
    insns: &[Insn],
    options: &PipeViewOptions,
    out: &mut W,
) -> io::Result<()> {
    for insn in insns {
        if !options.filter.accepts(insn.kind) {
            continue;
        }

        // Fetch is not logged; place it one tick before dispatch.
        let fetch = insn.dispatch.saturating_sub(1);

        if insn.issue.is_empty() {
            if options.show_unretired {
                write_record(out, fetch, insn, 0, &insn.disassembly, 0, 0)?;
            }
            continue;
        }

        let last = insn.issue.len() - 1;
        for (uop, issue) in insn.issue.iter().enumerate() {
            let prefix = if uop == 0 {
                "┏ "
            } else if uop < last {
                "┣ "
            } else {
                "┗ "
            };
            let label = format!("{}{}", prefix, insn.disassembly);
            let retire = insn.retire_cycle(issue.element_group);
            write_record(out, fetch, insn, uop, &label, issue.cycle, retire)?;
        }
    }
    Ok(())
}

/// Parse a log and write the trace in one step.
pub fn convert<R: BufRead, W: Write + ?Sized>(
    reader: R,
    options: &PipeViewOptions,
    out: &mut W,
) -> Result<usize, PipeViewError> {
    let insns = parse_log(reader, options.cycle_time)?;
    render(&insns, options, out)?;
    Ok(insns.len())
}
